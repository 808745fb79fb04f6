use serde::Serialize;

use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::port::MediaStorage;
use crate::domain::repository::{
    CategoryRepository, FavoriteRepository, GuideRepository, TagRepository,
};
use crate::domain::types::{Category, Guide, GuideFilter, RELATED_GUIDES_LIMIT, Tag};
use crate::error::PortalError;
use crate::markdown::render_markdown;

/// Replace the stored cover URL with a time-limited signed one.
pub(crate) fn sign_cover<S: MediaStorage>(storage: &S, ttl_secs: u64, mut guide: Guide) -> Guide {
    guide.cover_image_url = guide
        .cover_image_url
        .as_deref()
        .map(|url| storage.sign(url, ttl_secs))
        .filter(|url| !url.is_empty());
    guide
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GuideListing {
    pub guides: Page<Guide>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    /// Filters in effect, echoed back for the filter bar.
    pub filter: GuideFilter,
}

pub struct ListGuidesUseCase<G, C, T, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    T: TagRepository,
    S: MediaStorage,
{
    pub guides: G,
    pub categories: C,
    pub tags: T,
    pub storage: S,
    pub signed_url_ttl: u64,
}

impl<G, C, T, S> ListGuidesUseCase<G, C, T, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    T: TagRepository,
    S: MediaStorage,
{
    pub async fn execute(
        &self,
        mut filter: GuideFilter,
        page: PageRequest,
    ) -> Result<GuideListing, PortalError> {
        filter.q = filter
            .q
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty());

        let guides = self
            .guides
            .list_published(&filter, page.clamped())
            .await?
            .map(|g| sign_cover(&self.storage, self.signed_url_ttl, g));
        let categories = self.categories.list_ordered().await?;
        let tags = self.tags.list().await?;

        Ok(GuideListing {
            guides,
            categories,
            tags,
            filter,
        })
    }
}

// ── show ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GuideDetail {
    /// Guide with storage links in `content` and the cover already signed.
    pub guide: Guide,
    pub content_html: String,
    pub category_name: Option<String>,
    pub tags: Vec<Tag>,
    pub related: Vec<Guide>,
    pub is_favorite: bool,
}

pub struct ShowGuideUseCase<G, C, T, F, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    T: TagRepository,
    F: FavoriteRepository,
    S: MediaStorage,
{
    pub guides: G,
    pub categories: C,
    pub tags: T,
    pub favorites: F,
    pub storage: S,
    pub signed_url_ttl: u64,
}

impl<G, C, T, F, S> ShowGuideUseCase<G, C, T, F, S>
where
    G: GuideRepository,
    C: CategoryRepository,
    T: TagRepository,
    F: FavoriteRepository,
    S: MediaStorage,
{
    pub async fn execute(&self, guide_id: i32, viewer_id: i32) -> Result<GuideDetail, PortalError> {
        // 1. Count the view before anything is rendered
        if !self.guides.increment_views(guide_id).await? {
            return Err(PortalError::GuideNotFound);
        }
        let guide = self
            .guides
            .find_by_id(guide_id)
            .await?
            .ok_or(PortalError::GuideNotFound)?;

        // 2. Sign storage links inside the body, then render
        let ttl = self.signed_url_ttl;
        let content = self
            .storage
            .links()
            .rewrite(&guide.content, |url| self.storage.sign(url, ttl));
        let content_html = render_markdown(&content);

        // 3. Sidebar data
        let category_name = self
            .categories
            .find_by_id(guide.category_id)
            .await?
            .map(|c| c.name);
        let tags = self.tags.list_for_guide(guide.id).await?;
        let related = self
            .guides
            .related(&guide, RELATED_GUIDES_LIMIT)
            .await?
            .into_iter()
            .map(|g| sign_cover(&self.storage, ttl, g))
            .collect();
        let is_favorite = self.favorites.is_favorite(viewer_id, guide.id).await?;

        let guide = sign_cover(&self.storage, ttl, Guide { content, ..guide });
        Ok(GuideDetail {
            guide,
            content_html,
            category_name,
            tags,
            related,
            is_favorite,
        })
    }
}

// ── like ──────────────────────────────────────────────────────────────────────

pub struct LikeGuideUseCase<G>
where
    G: GuideRepository,
{
    pub guides: G,
}

impl<G> LikeGuideUseCase<G>
where
    G: GuideRepository,
{
    /// Returns the new like count.
    pub async fn execute(&self, guide_id: i32) -> Result<i32, PortalError> {
        self.guides
            .increment_likes(guide_id)
            .await?
            .ok_or(PortalError::GuideNotFound)
    }
}
