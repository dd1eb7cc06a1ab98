use std::time::Duration;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::video::{self, Visibility};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::video::{
    VideoResponse, VideoStreamResponse, parse_visibility, validate_recipe, validate_title,
};
use crate::state::AppState;
use crate::store::videos::{DEFAULT_LIST_LIMIT, NewVideo, VideoCatalog};
use crate::utils::blob_name;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(256 * 1024 * 1024) // 256 MB
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Videos",
    operation_id = "uploadVideo",
    summary = "Upload a video",
    description = "Multipart upload. The `title` and `file` fields are required; `recipe` \
        and `visibility` (default `public`) are optional. The media object is stored \
        under a server-generated blob name.",
    request_body(content_type = "multipart/form-data", description = "Video upload with metadata"),
    responses(
        (status = 201, description = "Video created", body = VideoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(owner = %auth_user.user_id))]
pub async fn upload_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut title: Option<String> = None;
    let mut recipe: Option<String> = None;
    let mut visibility = Visibility::Public;
    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("title") => {
                title = Some(read_text(field, "title").await?);
            }
            Some("recipe") => {
                recipe = Some(read_text(field, "recipe").await?);
            }
            Some("visibility") => {
                visibility = parse_visibility(&read_text(field, "visibility").await?)?;
            }
            Some("file") => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let title = title.ok_or_else(|| AppError::Validation("Missing 'title' field".into()))?;
    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    validate_title(&title)?;
    validate_recipe(recipe.as_deref())?;

    let blob_name = blob_name::generate(filename.as_deref());
    let blob_url = state
        .blob_store
        .put(&blob_name, &data, content_type.as_deref())
        .await?;

    let video = VideoCatalog::new(&state.db)
        .create(NewVideo {
            title: title.trim().to_string(),
            blob_name,
            blob_url,
            user_id: auth_user.user_id,
            visibility,
            recipe: recipe.filter(|r| !r.is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Videos",
    operation_id = "listVideos",
    summary = "List public videos",
    responses(
        (status = 200, description = "Public videos, newest first", body = [VideoResponse]),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_videos(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, AppError> {
    let videos = VideoCatalog::new(&state.db)
        .list_public(DEFAULT_LIST_LIMIT)
        .await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Videos",
    operation_id = "getVideo",
    summary = "Get a video by ID",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video details", body = VideoResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Private video of another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id))]
pub async fn get_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> Result<Json<VideoResponse>, AppError> {
    let video = find_readable(&state, video_id, auth_user.user_id).await?;
    Ok(Json(video.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/stream",
    tag = "Videos",
    operation_id = "streamVideo",
    summary = "Get a streaming URL for a video",
    description = "Returns a time-limited download URL for the media object, subject to \
        the same visibility rules as the video itself.",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Streaming URL", body = VideoStreamResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Private video of another user (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Video not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(video_id = %video_id))]
pub async fn stream_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> Result<Json<VideoStreamResponse>, AppError> {
    let video = find_readable(&state, video_id, auth_user.user_id).await?;

    let expiry = Duration::from_secs(state.config.storage.url_expiry_minutes * 60);
    let url = state.blob_store.download_url(&video.blob_name, expiry).await?;

    Ok(Json(VideoStreamResponse { url }))
}

/// Fetch a video and enforce the visibility rule for `viewer`.
async fn find_readable(
    state: &AppState,
    video_id: Uuid,
    viewer: Uuid,
) -> Result<video::Model, AppError> {
    let video = VideoCatalog::new(&state.db)
        .by_id(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("video not found".into()))?;

    if !video.readable_by(viewer) {
        return Err(AppError::PermissionDenied);
    }

    Ok(video)
}
