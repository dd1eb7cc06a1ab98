use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID (UUID)
    pub username: String, // Username at issue time
    pub exp: usize,       // Expiration timestamp
}

/// Sign a new JWT token for a user.
pub fn sign(user_id: Uuid, username: &str, secret: &str, ttl_days: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(ttl_days))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_then_verify_round_trips() {
        let user_id = Uuid::new_v4();

        let token = sign(user_id, "alice", SECRET, 7).unwrap();
        let claims = verify(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let token = sign(Uuid::new_v4(), "alice", "other-secret", 7).unwrap();

        assert!(verify(&token, SECRET).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(verify("not-a-token", SECRET).is_err());
    }
}
