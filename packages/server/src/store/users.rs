use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::user;

/// A user record as it is allowed to leave this component. There is no
/// credential field to strip at call sites; conversion from the row
/// model drops it on every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

/// Resolves user ids to profile records.
pub struct UserDirectory<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserDirectory<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Resolve a user by primary key.
    ///
    /// Point lookup first; a miss falls back to a filter query on the
    /// id column before concluding absence. Store failures are logged
    /// and mapped to absence so that downstream treats an unknown user
    /// as not found instead of failing the whole request.
    pub async fn by_id(&self, id: Uuid) -> Option<UserProfile> {
        match user::Entity::find_by_id(id).one(self.conn).await {
            Ok(Some(model)) => return Some(model.into()),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("user lookup failed for {id}: {e}");
                return None;
            }
        }

        match user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .one(self.conn)
            .await
        {
            Ok(found) => found.map(Into::into),
            Err(e) => {
                tracing::warn!("fallback user lookup failed for {id}: {e}");
                None
            }
        }
    }

    /// Lookup for the login flow. The only path that returns the
    /// credential digest; it never leaves the auth handler.
    pub async fn by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn)
            .await
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, DbErr> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use super::*;

    fn alice() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn resolves_on_the_primary_path() {
        let alice = alice();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![alice.clone()]])
            .into_connection();

        let profile = UserDirectory::new(&db).by_id(alice.id).await.unwrap();

        assert_eq!(profile, UserProfile::from(alice));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_a_filter_query_on_a_primary_miss() {
        let alice = alice();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new(), vec![alice.clone()]])
            .into_connection();

        let profile = UserDirectory::new(&db).by_id(alice.id).await.unwrap();

        assert_eq!(profile.username, "alice");
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn absent_on_both_paths_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new(), Vec::<user::Model>::new()])
            .into_connection();

        assert!(UserDirectory::new(&db).by_id(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn store_errors_are_swallowed_as_absence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();

        assert!(UserDirectory::new(&db).by_id(Uuid::new_v4()).await.is_none());
    }
}
