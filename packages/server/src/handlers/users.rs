use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::graph::{FollowGraph, FollowOutcome, UnfollowOutcome};
use crate::models::user::{
    FollowResponse, UnfollowResponse, UserProfileResponse, UserResponse,
};
use crate::models::video::VideoResponse;
use crate::state::AppState;
use crate::store::follows::FollowStore;
use crate::store::users::UserDirectory;
use crate::store::videos::{DEFAULT_LIST_LIMIT, VideoCatalog};

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUserProfile",
    summary = "Get a user profile",
    description = "Returns the profile together with follower counts and whether the \
        viewer currently follows this user.",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %user_id))]
pub async fn get_user_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile = UserDirectory::new(&state.db)
        .by_id(user_id)
        .await
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    let is_following = FollowGraph::new(&state.db)
        .is_following(auth_user.user_id, user_id)
        .await?;

    let follows = FollowStore::new(&state.db);
    let follower_count = follows.count_followers(user_id).await?;
    let following_count = follows.count_following(user_id).await?;

    Ok(Json(UserProfileResponse {
        id: profile.id,
        username: profile.username,
        email: profile.email,
        created_at: profile.created_at,
        is_following,
        follower_count,
        following_count,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/videos",
    tag = "Users",
    operation_id = "getUserVideos",
    summary = "List a user's videos",
    description = "Owners see all of their videos; everyone else sees public ones only.",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's videos, newest first", body = [VideoResponse]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %user_id))]
pub async fn get_user_videos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    if UserDirectory::new(&state.db).by_id(user_id).await.is_none() {
        return Err(AppError::NotFound("user not found".into()));
    }

    let mut videos = VideoCatalog::new(&state.db)
        .by_owner(user_id, DEFAULT_LIST_LIMIT)
        .await?;
    videos.retain(|v| v.readable_by(auth_user.user_id));

    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/follow",
    tag = "Users",
    operation_id = "followUser",
    summary = "Follow a user",
    description = "Creates a follow edge from the viewer to the target. Following a user \
        you already follow succeeds and returns the existing edge.",
    params(("id" = Uuid, Path, description = "User ID to follow")),
    responses(
        (status = 200, description = "Following", body = FollowResponse),
        (status = 400, description = "Self-follow attempt (INVALID_OPERATION)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(follower = %auth_user.user_id, target = %user_id))]
pub async fn follow_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<FollowResponse>, AppError> {
    match FollowGraph::new(&state.db)
        .follow(auth_user.user_id, user_id)
        .await?
    {
        FollowOutcome::SelfFollow => Err(AppError::InvalidOperation(
            "You cannot follow yourself".into(),
        )),
        FollowOutcome::TargetNotFound => Err(AppError::NotFound("user not found".into())),
        FollowOutcome::Followed(edge) => Ok(Json(FollowResponse {
            message: "You are now following this user".into(),
            follow: edge.into(),
        })),
        FollowOutcome::AlreadyFollowing(edge) => Ok(Json(FollowResponse {
            message: "You are already following this user".into(),
            follow: edge.into(),
        })),
    }
}

#[utoipa::path(
    delete,
    path = "/{id}/follow",
    tag = "Users",
    operation_id = "unfollowUser",
    summary = "Unfollow a user",
    description = "Removes the follow edge from the viewer to the target. Unfollowing a \
        user you do not follow is an error, unlike the idempotent follow.",
    params(("id" = Uuid, Path, description = "User ID to unfollow")),
    responses(
        (status = 200, description = "Unfollowed", body = UnfollowResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not following this user (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(follower = %auth_user.user_id, target = %user_id))]
pub async fn unfollow_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UnfollowResponse>, AppError> {
    match FollowGraph::new(&state.db)
        .unfollow(auth_user.user_id, user_id)
        .await?
    {
        UnfollowOutcome::Unfollowed => Ok(Json(UnfollowResponse {
            message: "Successfully unfollowed user".into(),
        })),
        UnfollowOutcome::NotFollowing => Err(AppError::NotFound(
            "You are not following this user".into(),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/{id}/followers",
    tag = "Users",
    operation_id = "getFollowers",
    summary = "List a user's followers",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Users following this user", body = [UserResponse]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(user_id = %user_id))]
pub async fn get_followers(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let followers = FollowGraph::new(&state.db).followers_of(user_id).await?;
    Ok(Json(followers.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}/following",
    tag = "Users",
    operation_id = "getFollowing",
    summary = "List who a user follows",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Users this user follows", body = [UserResponse]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(user_id = %user_id))]
pub async fn get_following(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let following = FollowGraph::new(&state.db).following_of(user_id).await?;
    Ok(Json(following.into_iter().map(UserResponse::from).collect()))
}
