use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::UserResponse;

/// Request body for user registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (3-50 chars, letters, digits, and underscores).
    #[schema(example = "alice_cooks")]
    pub username: String,
    /// Contact email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6-100 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.chars().count() < 3 || username.chars().count() > 50 {
        return Err(AppError::Validation(
            "Username must be 3-50 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    validate_email(&payload.email)?;
    if payload.password.len() < 6 || payload.password.len() > 100 {
        return Err(AppError::Validation(
            "Password must be 6-100 characters".into(),
        ));
    }
    Ok(())
}

/// Syntactic sanity check, not RFC 5322. The address is only ever used
/// for display and contact.
fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = email.len() <= 255
        && !email.chars().any(char::is_whitespace)
        && matches!(
            email.split_once('@'),
            Some((local, domain))
                if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        );
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Email address is not valid".into()))
    }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Username of the account to log into.
    #[schema(example = "alice_cooks")]
    pub username: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    /// ID of the newly created user.
    pub id: Uuid,
    /// Username of the newly created user.
    #[schema(example = "alice_cooks")]
    pub username: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_a_valid_registration() {
        let req = register("alice_cooks", "alice@example.com", "hunter22");
        assert!(validate_register_request(&req).is_ok());
    }

    #[test]
    fn rejects_out_of_range_usernames() {
        for username in ["ab", &"a".repeat(51), "no spaces", "dash-ed", ""] {
            let req = register(username, "alice@example.com", "hunter22");
            assert!(
                validate_register_request(&req).is_err(),
                "accepted {username:?}"
            );
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "plainaddress", "@no-local.com", "a@nodot", "a b@x.com"] {
            let req = register("alice_cooks", email, "hunter22");
            assert!(validate_register_request(&req).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_passwords() {
        for password in ["short", &"a".repeat(101)] {
            let req = register("alice_cooks", "alice@example.com", password);
            assert!(validate_register_request(&req).is_err());
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let empty_user = LoginRequest {
            username: "  ".into(),
            password: "hunter22".into(),
        };
        let empty_password = LoginRequest {
            username: "alice_cooks".into(),
            password: "".into(),
        };

        assert!(validate_login_request(&empty_user).is_err());
        assert!(validate_login_request(&empty_password).is_err());
    }
}
