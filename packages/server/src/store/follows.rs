use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::entity::follow;

/// Persistence of directed follow edges.
///
/// The relation is addressed by follower for writes and deletes and
/// queried by either column. Pure storage: invariant checks (self
/// follow, duplicate detection) belong to the follow graph service.
pub struct FollowStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FollowStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Persist a new edge for the ordered pair.
    ///
    /// Two concurrent inserts of the same pair can both pass the
    /// caller's duplicate check; the unique index on
    /// (follower_id, following_id) catches the loser, which then
    /// returns the surviving edge.
    pub async fn put(&self, follower_id: Uuid, following_id: Uuid) -> Result<follow::Model, DbErr> {
        let edge = follow::ActiveModel {
            id: Set(Uuid::now_v7()),
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            created_at: Set(Utc::now()),
        };

        match edge.insert(self.conn).await {
            Ok(inserted) => Ok(inserted),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .find(follower_id, following_id)
                .await?
                .ok_or_else(|| {
                    DbErr::Custom("UniqueConstraintViolation but existing edge not found".to_string())
                }),
            Err(e) => Err(e),
        }
    }

    /// Point lookup by the ordered pair. Directionality matters: the
    /// edge (A, B) never matches a query for (B, A).
    pub async fn find(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<Option<follow::Model>, DbErr> {
        follow::Entity::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(self.conn)
            .await
    }

    /// Remove an edge, addressed by id and follower (the partition key
    /// of the relation). Callers resolve the edge via `find` first.
    pub async fn delete(&self, edge_id: Uuid, follower_id: Uuid) -> Result<(), DbErr> {
        follow::Entity::delete_many()
            .filter(follow::Column::Id.eq(edge_id))
            .filter(follow::Column::FollowerId.eq(follower_id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    /// IDs of every user that `user_id` follows.
    pub async fn list_following(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        follow::Entity::find()
            .select_only()
            .column(follow::Column::FollowingId)
            .filter(follow::Column::FollowerId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(self.conn)
            .await
    }

    /// IDs of every user following `user_id`.
    pub async fn list_followers(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        follow::Entity::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(follow::Column::FollowingId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(self.conn)
            .await
    }

    pub async fn count_following(&self, user_id: Uuid) -> Result<u64, DbErr> {
        follow::Entity::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.conn)
            .await
    }

    pub async fn count_followers(&self, user_id: Uuid) -> Result<u64, DbErr> {
        follow::Entity::find()
            .filter(follow::Column::FollowingId.eq(user_id))
            .count(self.conn)
            .await
    }
}
