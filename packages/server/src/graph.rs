use futures::future::join_all;
use sea_orm::{ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::entity::follow;
use crate::store::follows::FollowStore;
use crate::store::users::{UserDirectory, UserProfile};

/// Outcome of a follow attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge was created.
    Followed(follow::Model),
    /// The edge already existed and is returned unchanged.
    AlreadyFollowing(follow::Model),
    /// Follower and target are the same user.
    SelfFollow,
    /// The target user does not exist.
    TargetNotFound,
}

/// Outcome of an unfollow attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Unfollowed,
    /// No edge existed for the ordered pair. Deliberately not treated
    /// as a no-op: follow is idempotent, unfollow is not.
    NotFollowing,
}

/// Stateless orchestrator over the relationship store and the user
/// directory.
///
/// Every ordered pair (follower, target) is either Following or
/// NotFollowing; `follow` and `unfollow` are the only transitions.
/// Neither touches the video catalog.
pub struct FollowGraph<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FollowGraph<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create the (follower, target) edge.
    ///
    /// Refuses self-follows, verifies that the target exists, and
    /// treats a repeated follow as success carrying the existing edge.
    pub async fn follow(&self, follower: Uuid, target: Uuid) -> Result<FollowOutcome, DbErr> {
        if follower == target {
            return Ok(FollowOutcome::SelfFollow);
        }

        let store = FollowStore::new(self.conn);
        if let Some(existing) = store.find(follower, target).await? {
            return Ok(FollowOutcome::AlreadyFollowing(existing));
        }

        if UserDirectory::new(self.conn).by_id(target).await.is_none() {
            return Ok(FollowOutcome::TargetNotFound);
        }

        let edge = store.put(follower, target).await?;
        Ok(FollowOutcome::Followed(edge))
    }

    /// Remove the (follower, target) edge if it exists.
    pub async fn unfollow(&self, follower: Uuid, target: Uuid) -> Result<UnfollowOutcome, DbErr> {
        let store = FollowStore::new(self.conn);
        match store.find(follower, target).await? {
            Some(edge) => {
                store.delete(edge.id, edge.follower_id).await?;
                Ok(UnfollowOutcome::Unfollowed)
            }
            None => Ok(UnfollowOutcome::NotFollowing),
        }
    }

    /// Pure query, no state change.
    pub async fn is_following(&self, follower: Uuid, target: Uuid) -> Result<bool, DbErr> {
        Ok(FollowStore::new(self.conn)
            .find(follower, target)
            .await?
            .is_some())
    }

    /// Profiles of everyone following `user`. Ids that no longer
    /// resolve are dropped silently.
    pub async fn followers_of(&self, user: Uuid) -> Result<Vec<UserProfile>, DbErr> {
        let ids = FollowStore::new(self.conn).list_followers(user).await?;
        Ok(self.resolve_profiles(ids).await)
    }

    /// Profiles of everyone `user` follows.
    pub async fn following_of(&self, user: Uuid) -> Result<Vec<UserProfile>, DbErr> {
        let ids = FollowStore::new(self.conn).list_following(user).await?;
        Ok(self.resolve_profiles(ids).await)
    }

    /// Fan out one directory lookup per id, preserving input order.
    /// Concurrency is bounded by the size of the id list.
    async fn resolve_profiles(&self, ids: Vec<Uuid>) -> Vec<UserProfile> {
        let directory = UserDirectory::new(self.conn);
        let lookups: Vec<_> = ids.into_iter().map(|id| directory.by_id(id)).collect();
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;
    use crate::entity::user;

    fn edge(follower: Uuid, following: Uuid) -> follow::Model {
        follow::Model {
            id: Uuid::now_v7(),
            follower_id: follower,
            following_id: following,
            created_at: Utc::now(),
        }
    }

    fn profile_row(id: Uuid, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".into(),
            created_at: Utc::now(),
        }
    }

    fn id_row(column: &'static str, id: Uuid) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([(column, Value::from(id))])
    }

    #[tokio::test]
    async fn follow_self_is_rejected_without_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let a = Uuid::new_v4();

        let outcome = FollowGraph::new(&db).follow(a, a).await.unwrap();

        assert_eq!(outcome, FollowOutcome::SelfFollow);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn repeated_follow_returns_the_existing_edge() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let existing = edge(a, b);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();

        let outcome = FollowGraph::new(&db).follow(a, b).await.unwrap();

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing(existing));
        // The point lookup is the only statement; no insert happened.
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn follow_resolves_the_target_then_creates_the_edge() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let created = edge(a, b);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<follow::Model>::new()])
            .append_query_results([vec![profile_row(b, "bob")]])
            .append_query_results([vec![created.clone()]])
            .into_connection();

        let outcome = FollowGraph::new(&db).follow(a, b).await.unwrap();

        assert_eq!(outcome, FollowOutcome::Followed(created));
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn follow_of_a_missing_target_creates_nothing() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<follow::Model>::new()])
            .append_query_results([Vec::<user::Model>::new(), Vec::<user::Model>::new()])
            .into_connection();

        let outcome = FollowGraph::new(&db).follow(a, b).await.unwrap();

        assert_eq!(outcome, FollowOutcome::TargetNotFound);
        // Edge lookup plus the two-tier target resolution; no insert.
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn unfollow_removes_an_existing_edge() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![edge(a, b)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let outcome = FollowGraph::new(&db).unfollow(a, b).await.unwrap();

        assert_eq!(outcome, UnfollowOutcome::Unfollowed);
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn unfollow_without_an_edge_reports_not_following() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<follow::Model>::new()])
            .into_connection();

        let outcome = FollowGraph::new(&db).unfollow(a, b).await.unwrap();

        assert_eq!(outcome, UnfollowOutcome::NotFollowing);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn is_following_observes_direction() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![edge(a, b)]])
            .into_connection();

        assert!(FollowGraph::new(&db).is_following(a, b).await.unwrap());
    }

    #[tokio::test]
    async fn followers_resolve_profiles_and_drop_missing_ones() {
        let user = Uuid::new_v4();
        let (present, vanished) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                id_row("follower_id", present),
                id_row("follower_id", vanished),
            ]])
            // First lookup hits on the primary path.
            .append_query_results([vec![profile_row(present, "carol")]])
            // Second lookup misses on both tiers.
            .append_query_results([Vec::<user::Model>::new(), Vec::<user::Model>::new()])
            .into_connection();

        let followers = FollowGraph::new(&db).followers_of(user).await.unwrap();

        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].username, "carol");
    }
}
