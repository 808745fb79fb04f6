use crate::domain::port::TextGenerator;
use crate::domain::repository::{CategoryRepository, GuideRepository, TagRepository};
use crate::domain::types::{Category, DEFAULT_COVER_URL, Guide, GuideDraft, NewCategory, Tag};
use crate::error::PortalError;
use crate::usecase::ai_polish::parse_draft;

fn seed_prompt(category: &str, tags: &[String]) -> String {
    format!(
        "You are a senior counsellor writing for a psychology guide website. \
         Write a high-quality guide about \"{category}\".\n\
         Requirements:\n\
         1. Focus on these tags: {}.\n\
         2. Tone: professional yet approachable, with a healing touch.\n\
         3. Output must be a JSON object with:\n\
         \x20  - title: a catchy title, emoji allowed.\n\
         \x20  - summary: an abstract of at most 100 words.\n\
         \x20  - content: the full article in Markdown with cases, advice and exercises.\n\
         Output the JSON directly without ```json fences.",
        tags.join(", ")
    )
}

pub struct SeedGuideInput {
    pub category: String,
    pub category_description: Option<String>,
    pub tags: Vec<String>,
}

/// Drafts a whole guide with the text generator and stores it published,
/// creating the category and tags on first use.
pub struct SeedGuideUseCase<C, T, G, A>
where
    C: CategoryRepository,
    T: TagRepository,
    G: GuideRepository,
    A: TextGenerator,
{
    pub categories: C,
    pub tags: T,
    pub guides: G,
    pub ai: A,
}

impl<C, T, G, A> SeedGuideUseCase<C, T, G, A>
where
    C: CategoryRepository,
    T: TagRepository,
    G: GuideRepository,
    A: TextGenerator,
{
    pub async fn execute(&self, input: SeedGuideInput) -> Result<Guide, PortalError> {
        let name = input.category.trim();
        if name.is_empty() {
            return Err(PortalError::MissingField("category"));
        }
        let category = self
            .category_named(name, input.category_description)
            .await?;

        let mut tags: Vec<Tag> = Vec::new();
        for tag_name in input.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            let tag = self.tag_named(tag_name).await?;
            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag);
            }
        }

        let tag_names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
        let text = self
            .ai
            .complete(&seed_prompt(&category.name, &tag_names))
            .await?;
        let draft = parse_draft(&text)?;
        let title = draft.title.trim();
        if title.is_empty() || draft.content.trim().is_empty() {
            tracing::warn!("seeded draft lacks a title or content");
            return Err(PortalError::AiResponseMalformed);
        }

        let summary = draft.summary.trim();
        let guide = self
            .guides
            .create(&GuideDraft {
                category_id: category.id,
                title: title.to_owned(),
                summary: (!summary.is_empty()).then(|| summary.to_owned()),
                content: draft.content.clone(),
                cover_image_url: Some(DEFAULT_COVER_URL.to_owned()),
                icon_url: None,
                audio_url: None,
                video_url: None,
                is_published: true,
                is_featured: false,
                tag_ids: tags.iter().map(|t| t.id).collect(),
            })
            .await?;
        tracing::info!(guide_id = guide.id, category_id = category.id, "seeded guide");
        Ok(guide)
    }

    async fn category_named(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, PortalError> {
        if let Some(existing) = self.categories.find_by_name(name).await? {
            return Ok(existing);
        }
        let created = self
            .categories
            .create(&NewCategory {
                name: name.to_owned(),
                description: description.filter(|d| !d.trim().is_empty()),
                icon_url: None,
                sort_order: 0,
            })
            .await;
        match created {
            Err(PortalError::CategoryAlreadyExists) => self
                .categories
                .find_by_name(name)
                .await?
                .ok_or(PortalError::CategoryNotFound),
            other => other,
        }
    }

    async fn tag_named(&self, name: &str) -> Result<Tag, PortalError> {
        if let Some(existing) = self.tags.find_by_name(name).await? {
            return Ok(existing);
        }
        match self.tags.create(name).await {
            Err(PortalError::TagAlreadyExists) => self
                .tags
                .find_by_name(name)
                .await?
                .ok_or(PortalError::TagNotFound),
            other => other,
        }
    }
}
