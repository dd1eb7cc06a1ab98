use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::feed::{DEFAULT_FEED_LIMIT, FeedComposer};
use crate::models::video::VideoResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Feed",
    operation_id = "getFeed",
    summary = "Get the viewer's feed",
    description = "Public videos from accounts the viewer follows, newest first. Empty \
        when the viewer follows nobody.",
    responses(
        (status = 200, description = "The feed", body = [VideoResponse]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(viewer = %auth_user.user_id))]
pub async fn get_feed(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let videos = FeedComposer::new(&state.db)
        .compose(auth_user.user_id, DEFAULT_FEED_LIMIT)
        .await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}
