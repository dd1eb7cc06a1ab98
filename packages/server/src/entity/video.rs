use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-video access flag gating non-owner reads.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "private")]
    Private,
}

impl std::str::FromStr for Visibility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(()),
        }
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    /// Storage key of the uploaded media object.
    pub blob_name: String,

    /// Canonical URL of the media object. Opaque to this service.
    pub blob_url: String,

    #[sea_orm(indexed)]
    pub user_id: Uuid,

    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub owner: Option<super::user::Entity>,

    #[sea_orm(indexed)]
    pub visibility: Visibility,

    /// Free-form recipe text attached to the video.
    #[sea_orm(column_type = "Text", nullable)]
    pub recipe: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether `viewer` may read this video. Owners always can;
    /// everyone else only when the video is public.
    pub fn readable_by(&self, viewer: Uuid) -> bool {
        self.visibility == Visibility::Public || self.user_id == viewer
    }
}
