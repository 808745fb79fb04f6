use chrono::{DateTime, Utc};
use serde::Serialize;

use guidebook_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use guidebook_domain::feedback::FeedbackStatus;

/// Portal account as seen by use cases.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub phone: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub is_paid: bool,
    pub is_admin: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Admins see paid content without a membership.
    pub fn has_paid_access(&self) -> bool {
        self.is_paid || self.is_admin
    }
}

/// Fields for a freshly registered account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: String,
    pub username: String,
    pub password_hash: String,
}

/// Outcome of redeeming an activation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// A new paid account was inserted.
    Created { user_id: i32 },
    /// An account with the same phone already existed and was upgraded to paid.
    Upgraded { user_id: i32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivationCode {
    pub id: i32,
    pub code: String,
    pub is_used: bool,
    pub used_by_username: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub icon_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
    pub is_published: bool,
    pub is_featured: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Everything an admin submits when creating or editing a guide.
#[derive(Debug, Clone)]
pub struct GuideDraft {
    pub category_id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub icon_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    /// Full tag set; unknown ids are ignored.
    pub tag_ids: Vec<i32>,
}

/// Reader-side listing filters. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuideFilter {
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Favorited,
    Unfavorited,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: i32,
    pub content: String,
    pub contact: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    pub user_id: Option<i32>,
    pub status: FeedbackStatus,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub content: String,
    pub contact: Option<String>,
    pub user_id: Option<i32>,
}

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: bytes::Bytes,
}

/// One object listed from the media store.
#[derive(Debug, Clone, Serialize)]
pub struct MediaObject {
    /// File name without the folder prefix.
    pub name: String,
    /// Signed URL usable for preview.
    pub url: String,
    /// Object key.
    pub path: String,
    pub size: u64,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardStats {
    pub user_count: u64,
    pub guide_count: u64,
}

/// Reader guide listing page size.
pub const GUIDE_PAGE_SIZE: u64 = 10;

/// Admin users/guides/feedback page size.
pub const ADMIN_PAGE_SIZE: u64 = 10;

/// Admin activation code page size.
pub const CODE_PAGE_SIZE: u64 = 20;

pub const ACTIVATION_CODE_LEN: usize = 8;

pub const DEFAULT_CODE_BATCH: usize = 10;

/// Batch sizes accepted by code generation.
pub const CODE_BATCH_SIZES: [usize; 2] = [10, 20];

/// Reserved category that receives guides orphaned by a category deletion.
pub const UNCATEGORIZED: &str = "Uncategorized";

pub const UNCATEGORIZED_SORT_ORDER: i32 = 99;

/// Cover used when a guide is saved without one.
pub const DEFAULT_COVER_URL: &str =
    "https://my-media-system.oss-cn-beijing.aliyuncs.com/images/default_cover.jpg";

pub const RELATED_GUIDES_LIMIT: u64 = 3;
