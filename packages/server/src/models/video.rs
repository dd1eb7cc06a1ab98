use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::video::{self, Visibility};
use crate::error::AppError;

/// A video record as returned to clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    #[schema(example = "Weeknight carbonara")]
    pub title: String,
    /// Storage key of the media object.
    pub blob_name: String,
    /// Canonical URL of the media object.
    pub blob_url: String,
    /// Owner of the video.
    pub user_id: Uuid,
    pub visibility: Visibility,
    /// Recipe text attached to the video, if any.
    pub recipe: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<video::Model> for VideoResponse {
    fn from(m: video::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            blob_name: m.blob_name,
            blob_url: m.blob_url,
            user_id: m.user_id,
            visibility: m.visibility,
            recipe: m.recipe,
            created_at: m.created_at,
        }
    }
}

/// Time-limited streaming URL for a video.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VideoStreamResponse {
    pub url: String,
}

/// Validate a trimmed video title (1-200 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 200 {
        return Err(AppError::Validation(
            "Title must be 1-200 characters".into(),
        ));
    }
    Ok(())
}

/// Validate optional recipe text (at most 5000 Unicode characters).
pub fn validate_recipe(recipe: Option<&str>) -> Result<(), AppError> {
    if let Some(recipe) = recipe
        && recipe.chars().count() > 5000
    {
        return Err(AppError::Validation(
            "Recipe must be at most 5000 characters".into(),
        ));
    }
    Ok(())
}

/// Parse the `visibility` form field.
pub fn parse_visibility(value: &str) -> Result<Visibility, AppError> {
    value.parse().map_err(|()| {
        AppError::Validation("Visibility must be 'public' or 'private'".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("Weeknight carbonara").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(201)).is_err());
        assert!(validate_title(&"a".repeat(200)).is_ok());
    }

    #[test]
    fn recipe_bounds() {
        assert!(validate_recipe(None).is_ok());
        assert!(validate_recipe(Some("boil pasta")).is_ok());
        assert!(validate_recipe(Some(&"a".repeat(5001))).is_err());
    }

    #[test]
    fn visibility_parses_only_the_two_values() {
        assert_eq!(parse_visibility("public").unwrap(), Visibility::Public);
        assert_eq!(parse_visibility("private").unwrap(), Visibility::Private);
        assert!(parse_visibility("unlisted").is_err());
        assert!(parse_visibility("Public").is_err());
    }
}
