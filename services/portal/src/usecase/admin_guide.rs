use guidebook_domain::media::MediaKind;
use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::port::MediaStorage;
use crate::domain::repository::{CategoryRepository, GuideRepository};
use crate::domain::types::{DEFAULT_COVER_URL, Guide, GuideDraft, UploadFile};
use crate::error::PortalError;

pub struct ListAdminGuidesUseCase<G>
where
    G: GuideRepository,
{
    pub guides: G,
}

impl<G> ListAdminGuidesUseCase<G>
where
    G: GuideRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<Page<Guide>, PortalError> {
        self.guides.list_all(page.clamped()).await
    }
}

// ── save ──────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SaveGuideInput {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category_id: Option<i32>,
    /// Direct cover URL; ignored when `cover_file` is present.
    pub cover_image_url: Option<String>,
    pub cover_file: Option<UploadFile>,
    pub icon_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub tag_ids: Vec<i32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

pub struct SaveGuideUseCase<G, C, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    S: MediaStorage,
{
    pub guides: G,
    pub categories: C,
    pub storage: S,
}

impl<G, C, S> SaveGuideUseCase<G, C, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    S: MediaStorage,
{
    /// Create a guide when `id` is `None`, otherwise replace guide `id`.
    pub async fn execute(&self, id: Option<i32>, input: SaveGuideInput) -> Result<Guide, PortalError> {
        // 1. Required fields
        let title = input.title.trim();
        if title.is_empty() {
            return Err(PortalError::MissingField("title"));
        }
        if input.content.trim().is_empty() {
            return Err(PortalError::MissingField("content"));
        }
        let category_id = input
            .category_id
            .ok_or(PortalError::MissingField("category_id"))?;
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(PortalError::CategoryNotFound);
        }

        let existing = match id {
            Some(id) => Some(
                self.guides
                    .find_by_id(id)
                    .await?
                    .ok_or(PortalError::GuideNotFound)?,
            ),
            None => None,
        };

        // 2. Cover: uploaded file, then direct URL, then what the guide had
        let cover_image_url = match input.cover_file.filter(|f| !f.bytes.is_empty()) {
            Some(file) => self
                .storage
                .upload(&file, MediaKind::Image.folder(), false)
                .await?,
            None => non_blank(input.cover_image_url)
                .or_else(|| existing.as_ref().and_then(|g| g.cover_image_url.clone()))
                .unwrap_or_else(|| DEFAULT_COVER_URL.to_owned()),
        };

        let mut tag_ids = input.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let draft = GuideDraft {
            category_id,
            title: title.to_owned(),
            summary: non_blank(input.summary),
            content: input.content,
            cover_image_url: Some(cover_image_url),
            icon_url: non_blank(input.icon_url),
            audio_url: non_blank(input.audio_url),
            video_url: non_blank(input.video_url),
            is_published: input.is_published.unwrap_or(true),
            is_featured: input.is_featured.unwrap_or(false),
            tag_ids,
        };

        match existing {
            Some(guide) => self
                .guides
                .update(guide.id, &draft)
                .await?
                .ok_or(PortalError::GuideNotFound),
            None => {
                let guide = self.guides.create(&draft).await?;
                tracing::info!(guide_id = guide.id, title = %guide.title, "created guide");
                Ok(guide)
            }
        }
    }
}

// ── delete ────────────────────────────────────────────────────────────────────

pub struct DeleteGuideUseCase<G>
where
    G: GuideRepository,
{
    pub guides: G,
}

impl<G> DeleteGuideUseCase<G>
where
    G: GuideRepository,
{
    pub async fn execute(&self, id: i32) -> Result<(), PortalError> {
        if !self.guides.delete(id).await? {
            return Err(PortalError::GuideNotFound);
        }
        tracing::info!(guide_id = id, "deleted guide");
        Ok(())
    }
}
