use serde::Serialize;

use crate::domain::repository::{CategoryRepository, TagRepository};
use crate::domain::types::{Category, NewCategory, Tag, UNCATEGORIZED};
use crate::error::PortalError;

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

pub struct ListTaxonomyUseCase<C, T>
where
    C: CategoryRepository,
    T: TagRepository,
{
    pub categories: C,
    pub tags: T,
}

impl<C, T> ListTaxonomyUseCase<C, T>
where
    C: CategoryRepository,
    T: TagRepository,
{
    pub async fn execute(&self) -> Result<Taxonomy, PortalError> {
        Ok(Taxonomy {
            categories: self.categories.list_ordered().await?,
            tags: self.tags.list().await?,
        })
    }
}

// ── categories ────────────────────────────────────────────────────────────────

pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub sort_order: Option<i32>,
}

pub struct CreateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    pub categories: C,
}

impl<C> CreateCategoryUseCase<C>
where
    C: CategoryRepository,
{
    /// A blank name is ignored and yields `None`.
    pub async fn execute(&self, input: CreateCategoryInput) -> Result<Option<Category>, PortalError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let category = self
            .categories
            .create(&NewCategory {
                name: name.to_owned(),
                description: non_blank(input.description),
                icon_url: non_blank(input.icon_url),
                sort_order: input.sort_order.unwrap_or(0),
            })
            .await?;
        Ok(Some(category))
    }
}

pub struct DeleteCategoryUseCase<C>
where
    C: CategoryRepository,
{
    pub categories: C,
}

impl<C> DeleteCategoryUseCase<C>
where
    C: CategoryRepository,
{
    /// Returns how many guides were moved onto the reserved category.
    pub async fn execute(&self, id: i32) -> Result<u64, PortalError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(PortalError::CategoryNotFound)?;
        if category.name == UNCATEGORIZED {
            return Err(PortalError::ReservedCategory);
        }

        let moved = self.categories.delete_reassigning(id).await?;
        tracing::info!(category_id = id, name = %category.name, moved, "deleted category");
        Ok(moved)
    }
}

// ── tags ──────────────────────────────────────────────────────────────────────

pub struct CreateTagUseCase<T>
where
    T: TagRepository,
{
    pub tags: T,
}

impl<T> CreateTagUseCase<T>
where
    T: TagRepository,
{
    /// A blank name is ignored and yields `None`.
    pub async fn execute(&self, name: &str) -> Result<Option<Tag>, PortalError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.tags.create(name).await.map(Some)
    }
}

pub struct DeleteTagUseCase<T>
where
    T: TagRepository,
{
    pub tags: T,
}

impl<T> DeleteTagUseCase<T>
where
    T: TagRepository,
{
    pub async fn execute(&self, id: i32) -> Result<(), PortalError> {
        if !self.tags.delete(id).await? {
            return Err(PortalError::TagNotFound);
        }
        Ok(())
    }
}
