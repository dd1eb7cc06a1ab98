use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::{follow, user};
use crate::store::users::UserProfile;

/// Public view of a user account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "alice_cooks")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for UserResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            created_at: p.created_at,
        }
    }
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

/// A user account viewed in relation to the requesting viewer.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfileResponse {
    pub id: Uuid,
    #[schema(example = "alice_cooks")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Whether the viewer currently follows this user.
    pub is_following: bool,
    #[schema(example = 12)]
    pub follower_count: u64,
    #[schema(example = 34)]
    pub following_count: u64,
}

/// A follow edge as returned to clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FollowEdgeResponse {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<follow::Model> for FollowEdgeResponse {
    fn from(m: follow::Model) -> Self {
        Self {
            id: m.id,
            follower_id: m.follower_id,
            following_id: m.following_id,
            created_at: m.created_at,
        }
    }
}

/// Successful follow response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FollowResponse {
    #[schema(example = "You are now following this user")]
    pub message: String,
    pub follow: FollowEdgeResponse,
}

/// Successful unfollow response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UnfollowResponse {
    #[schema(example = "Successfully unfollowed user")]
    pub message: String,
}
