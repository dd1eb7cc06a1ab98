use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

use crate::entity::{follow, video};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we
/// create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One edge per ordered (follower, following) pair. Two concurrent
    // follow requests can both pass the duplicate check; the losing
    // insert trips this index and is resolved to the surviving edge.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_follow_pair")
        .table(follow::Entity)
        .col(follow::Column::FollowerId)
        .col(follow::Column::FollowingId)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_follow_pair", &stmt).await;

    // Per-owner video listings:
    // SELECT * FROM video WHERE user_id = ? ORDER BY created_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_video_owner_created")
        .table(video::Entity)
        .col(video::Column::UserId)
        .col(video::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_video_owner_created", &stmt).await;

    // Public browse and feed queries filter on visibility and sort by
    // creation time.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_video_visibility_created")
        .table(video::Entity)
        .col(video::Column::Visibility)
        .col(video::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_video_visibility_created", &stmt).await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => {
            info!("Ensured index {} exists", name);
        }
        Err(e) => {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }
}
