use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::video::{self, Visibility};

/// Flat result cap applied when a caller does not ask for less.
pub const DEFAULT_LIST_LIMIT: u64 = 100;

/// Fields of a video record that callers supply; the catalog assigns
/// the id and the creation timestamp.
pub struct NewVideo {
    pub title: String,
    pub blob_name: String,
    pub blob_url: String,
    pub user_id: Uuid,
    pub visibility: Visibility,
    pub recipe: Option<String>,
}

/// Stores and queries video metadata records.
///
/// Validation happens at the edge; this component trusts its callers.
pub struct VideoCatalog<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VideoCatalog<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewVideo) -> Result<video::Model, DbErr> {
        video::ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(new.title),
            blob_name: Set(new.blob_name),
            blob_url: Set(new.blob_url),
            user_id: Set(new.user_id),
            visibility: Set(new.visibility),
            recipe: Set(new.recipe),
            created_at: Set(Utc::now()),
        }
        .insert(self.conn)
        .await
    }

    /// Public videos across all owners, newest first.
    pub async fn list_public(&self, limit: u64) -> Result<Vec<video::Model>, DbErr> {
        video::Entity::find()
            .filter(video::Column::Visibility.eq(Visibility::Public))
            .order_by_desc(video::Column::CreatedAt)
            .limit(limit)
            .all(self.conn)
            .await
    }

    pub async fn by_id(&self, id: Uuid) -> Result<Option<video::Model>, DbErr> {
        video::Entity::find_by_id(id).one(self.conn).await
    }

    /// All of one owner's videos regardless of visibility, newest
    /// first. Callers filter by viewer identity.
    pub async fn by_owner(&self, owner: Uuid, limit: u64) -> Result<Vec<video::Model>, DbErr> {
        video::Entity::find()
            .filter(video::Column::UserId.eq(owner))
            .order_by_desc(video::Column::CreatedAt)
            .limit(limit)
            .all(self.conn)
            .await
    }

    /// Feed query: public videos of every owner in `owners`, newest
    /// first, as one batched `IN` query. Callers must short-circuit an
    /// empty owner set; an empty `IN` list is not a valid predicate.
    pub async fn by_owners(&self, owners: &[Uuid], limit: u64) -> Result<Vec<video::Model>, DbErr> {
        video::Entity::find()
            .filter(video::Column::UserId.is_in(owners.iter().copied()))
            .filter(video::Column::Visibility.eq(Visibility::Public))
            .order_by_desc(video::Column::CreatedAt)
            .limit(limit)
            .all(self.conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn clip(title: &str, owner: Uuid, visibility: Visibility) -> video::Model {
        video::Model {
            id: Uuid::now_v7(),
            title: title.into(),
            blob_name: "1700000000-abc.mp4".into(),
            blob_url: "http://localhost:3000/media/1700000000-abc.mp4".into(),
            user_id: owner,
            visibility,
            recipe: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_persisted_record() {
        let owner = Uuid::new_v4();
        let persisted = clip("Carbonara", owner, Visibility::Public);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![persisted.clone()]])
            .into_connection();

        let created = VideoCatalog::new(&db)
            .create(NewVideo {
                title: "Carbonara".into(),
                blob_name: persisted.blob_name.clone(),
                blob_url: persisted.blob_url.clone(),
                user_id: owner,
                visibility: Visibility::Public,
                recipe: None,
            })
            .await
            .unwrap();

        assert_eq!(created, persisted);
    }

    #[tokio::test]
    async fn by_owners_is_a_single_batched_query() {
        let (b, c) = (Uuid::new_v4(), Uuid::new_v4());
        let v3 = clip("Focaccia", c, Visibility::Public);
        let v1 = clip("Ragu", b, Visibility::Public);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![v3.clone(), v1.clone()]])
            .into_connection();

        let videos = VideoCatalog::new(&db).by_owners(&[b, c], 100).await.unwrap();

        assert_eq!(videos, vec![v3, v1]);
        assert_eq!(db.into_transaction_log().len(), 1);
    }
}
