use sea_orm::{ConnectionTrait, DbErr};
use uuid::Uuid;

use crate::entity::video;
use crate::store::follows::FollowStore;
use crate::store::videos::VideoCatalog;

/// Flat feed size when the client does not ask for less.
pub const DEFAULT_FEED_LIMIT: u64 = 100;

/// Composes a viewer's feed from the follow graph and the video
/// catalog.
///
/// Pull-based: no materialized view, no cache, no cursor. Freshness is
/// whatever the stores return at read time.
pub struct FeedComposer<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FeedComposer<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Public videos from the viewer's following set, newest first.
    ///
    /// An empty following set returns immediately: the catalog is
    /// never queried with an empty owner predicate, which some query
    /// dialects would read as no filter at all.
    pub async fn compose(&self, viewer: Uuid, limit: u64) -> Result<Vec<video::Model>, DbErr> {
        let following = FollowStore::new(self.conn).list_following(viewer).await?;
        if following.is_empty() {
            return Ok(Vec::new());
        }

        VideoCatalog::new(self.conn).by_owners(&following, limit).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;
    use crate::entity::video::Visibility;

    fn clip(title: &str, owner: Uuid, t: i64) -> video::Model {
        video::Model {
            id: Uuid::now_v7(),
            title: title.into(),
            blob_name: format!("{t}-clip.mp4"),
            blob_url: format!("http://localhost:3000/media/{t}-clip.mp4"),
            user_id: owner,
            visibility: Visibility::Public,
            recipe: None,
            created_at: Utc.timestamp_opt(t, 0).unwrap(),
        }
    }

    fn following_row(id: Uuid) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("following_id", Value::from(id))])
    }

    #[tokio::test]
    async fn empty_following_set_skips_the_catalog() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let feed = FeedComposer::new(&db)
            .compose(Uuid::new_v4(), DEFAULT_FEED_LIMIT)
            .await
            .unwrap();

        assert!(feed.is_empty());
        // Only the following-set query ran.
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn feed_passes_through_catalog_order() {
        let viewer = Uuid::new_v4();
        let (b, c) = (Uuid::new_v4(), Uuid::new_v4());
        // The catalog answers newest first and public only; v2 at t=20
        // is private and never comes back from the store.
        let v3 = clip("Focaccia", c, 15);
        let v1 = clip("Ragu", b, 10);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![following_row(b), following_row(c)]])
            .append_query_results([vec![v3.clone(), v1.clone()]])
            .into_connection();

        let feed = FeedComposer::new(&db)
            .compose(viewer, DEFAULT_FEED_LIMIT)
            .await
            .unwrap();

        assert_eq!(feed, vec![v3, v1]);
        // Following-set query plus one batched catalog query.
        assert_eq!(db.into_transaction_log().len(), 2);
    }
}
