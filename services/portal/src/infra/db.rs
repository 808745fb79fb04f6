use std::collections::HashSet;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, SqlErr,
    TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use guidebook_core::sea_ext::{ContainsAny, OrderByRandom};
use guidebook_domain::feedback::FeedbackStatus;
use guidebook_domain::pagination::{Page, PageRequest};
use guidebook_portal_schema::{
    activation_codes, categories, feedbacks, guide_contents, guide_tags, tags, user_favorites,
    users,
};

use crate::domain::repository::{
    ActivationCodeRepository, CategoryRepository, FavoriteRepository, FeedbackRepository,
    GuideRepository, TagRepository, UserRepository,
};
use crate::domain::types::{
    ADMIN_PAGE_SIZE, ActivationCode, CODE_PAGE_SIZE, Category, FavoriteAction, Feedback,
    GUIDE_PAGE_SIZE, Guide, GuideDraft, GuideFilter, NewCategory, NewFeedback, NewUser,
    Redemption, Tag, UNCATEGORIZED, UNCATEGORIZED_SORT_ORDER, User,
};
use crate::error::PortalError;

// ── Shared helpers ────────────────────────────────────────────────────────────

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Unwrap a transaction error, keeping use-case errors raised inside the closure.
fn flatten_txn(e: TransactionError<PortalError>, what: &'static str) -> PortalError {
    match e {
        TransactionError::Connection(db) => PortalError::Internal(anyhow::Error::new(db).context(what)),
        TransactionError::Transaction(e) => e,
    }
}

async fn fetch_page<E, T>(
    select: Select<E>,
    db: &DatabaseConnection,
    page: PageRequest,
    per_page: u64,
    map: fn(E::Model) -> T,
) -> Result<Page<T>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let page = page.clamped();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page.index()).await?;
    Ok(Page::new(
        models.into_iter().map(map).collect(),
        page.page,
        per_page,
        total,
    ))
}

// ── User repository ───────────────────────────────────────────────────────────

pub struct DbUserRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl UserRepository for DbUserRepository<'_> {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find_by_id(id)
            .one(self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, PortalError> {
        let model = users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .one(self.db)
            .await
            .context("find user by phone")?;
        Ok(model.map(user_from_model))
    }

    async fn touch_last_login(&self, id: i32) -> Result<(), PortalError> {
        users::Entity::update_many()
            .col_expr(users::Column::LastLogin, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(self.db)
            .await
            .context("touch last login")?;
        Ok(())
    }

    async fn list_members(&self, page: PageRequest) -> Result<Page<User>, PortalError> {
        let select = users::Entity::find()
            .filter(users::Column::IsAdmin.eq(false))
            .order_by_desc(users::Column::Id);
        let page = fetch_page(select, self.db, page, ADMIN_PAGE_SIZE, user_from_model)
            .await
            .context("list members")?;
        Ok(page)
    }

    async fn count_members(&self) -> Result<u64, PortalError> {
        let count = users::Entity::find()
            .filter(users::Column::IsAdmin.eq(false))
            .count(self.db)
            .await
            .context("count members")?;
        Ok(count)
    }

    async fn set_paid(&self, id: i32, is_paid: bool) -> Result<bool, PortalError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsPaid, Expr::value(is_paid))
            .filter(users::Column::Id.eq(id))
            .exec(self.db)
            .await
            .context("set user paid flag")?;
        Ok(result.rows_affected > 0)
    }

    async fn insert(
        &self,
        user: &NewUser,
        is_paid: bool,
        is_admin: bool,
    ) -> Result<User, PortalError> {
        let model = new_user_model(user, is_paid, is_admin)
            .insert(self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PortalError::PhoneAlreadyRegistered
                } else {
                    PortalError::Internal(anyhow::Error::new(e).context("insert user"))
                }
            })?;
        Ok(user_from_model(model))
    }

    async fn promote_admin(&self, phone: &str) -> Result<bool, PortalError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsAdmin, Expr::value(true))
            .col_expr(users::Column::IsPaid, Expr::value(true))
            .filter(users::Column::Phone.eq(phone))
            .exec(self.db)
            .await
            .context("promote admin")?;
        Ok(result.rows_affected > 0)
    }
}

fn new_user_model(user: &NewUser, is_paid: bool, is_admin: bool) -> users::ActiveModel {
    users::ActiveModel {
        id: NotSet,
        phone: Set(user.phone.clone()),
        username: Set(user.username.clone()),
        password_hash: Set(user.password_hash.clone()),
        is_paid: Set(is_paid),
        is_admin: Set(is_admin),
        created_at: Set(Utc::now()),
        last_login: Set(None),
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        phone: model.phone,
        username: model.username,
        password_hash: model.password_hash,
        is_paid: model.is_paid,
        is_admin: model.is_admin,
        created_at: model.created_at,
        last_login: model.last_login,
    }
}

// ── ActivationCode repository ─────────────────────────────────────────────────

pub struct DbActivationCodeRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl ActivationCodeRepository for DbActivationCodeRepository<'_> {
    async fn find_unused(&self, code: &str) -> Result<Option<ActivationCode>, PortalError> {
        let model = activation_codes::Entity::find()
            .filter(activation_codes::Column::Code.eq(code))
            .filter(activation_codes::Column::IsUsed.eq(false))
            .one(self.db)
            .await
            .context("find unused activation code")?;
        Ok(model.map(code_from_model))
    }

    async fn redeem(&self, code: &str, user: &NewUser) -> Result<Redemption, PortalError> {
        let code = code.to_owned();
        let user = user.clone();
        self.db
            .transaction::<_, Redemption, PortalError>(|txn| {
                Box::pin(async move { redeem_in(txn, &code, &user).await })
            })
            .await
            .map_err(|e| flatten_txn(e, "redeem activation code"))
    }

    async fn insert_batch(&self, candidates: &[String]) -> Result<Vec<String>, PortalError> {
        let candidates = candidates.to_vec();
        self.db
            .transaction::<_, Vec<String>, PortalError>(|txn| {
                Box::pin(async move {
                    let existing: Vec<String> = activation_codes::Entity::find()
                        .select_only()
                        .column(activation_codes::Column::Code)
                        .filter(activation_codes::Column::Code.is_in(candidates.clone()))
                        .into_tuple()
                        .all(txn)
                        .await?;
                    let mut seen: HashSet<String> = existing.into_iter().collect();
                    let fresh: Vec<String> = candidates
                        .into_iter()
                        .filter(|c| seen.insert(c.clone()))
                        .collect();
                    if fresh.is_empty() {
                        return Ok(fresh);
                    }
                    let now = Utc::now();
                    activation_codes::Entity::insert_many(fresh.iter().map(|c| {
                        activation_codes::ActiveModel {
                            id: NotSet,
                            code: Set(c.clone()),
                            is_used: Set(false),
                            used_by_username: Set(None),
                            created_at: Set(now),
                        }
                    }))
                    .exec_without_returning(txn)
                    .await?;
                    Ok(fresh)
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "insert activation code batch"))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<ActivationCode>, PortalError> {
        let select = activation_codes::Entity::find().order_by_desc(activation_codes::Column::Id);
        let page = fetch_page(select, self.db, page, CODE_PAGE_SIZE, code_from_model)
            .await
            .context("list activation codes")?;
        Ok(page)
    }

    async fn list_unused_codes(&self) -> Result<Vec<String>, PortalError> {
        let codes = activation_codes::Entity::find()
            .select_only()
            .column(activation_codes::Column::Code)
            .filter(activation_codes::Column::IsUsed.eq(false))
            .order_by_asc(activation_codes::Column::Id)
            .into_tuple()
            .all(self.db)
            .await
            .context("list unused activation codes")?;
        Ok(codes)
    }
}

/// Body of the redemption transaction.
///
/// The conditional update is the serialization point: of two racing
/// redemptions of one code, only one sees an affected row.
async fn redeem_in(
    txn: &DatabaseTransaction,
    code: &str,
    user: &NewUser,
) -> Result<Redemption, PortalError> {
    let existing = users::Entity::find()
        .filter(users::Column::Phone.eq(user.phone.as_str()))
        .one(txn)
        .await?;
    let attributed_to = existing
        .as_ref()
        .map_or_else(|| user.username.clone(), |u| u.username.clone());

    let consumed = activation_codes::Entity::update_many()
        .col_expr(activation_codes::Column::IsUsed, Expr::value(true))
        .col_expr(
            activation_codes::Column::UsedByUsername,
            Expr::value(attributed_to),
        )
        .filter(activation_codes::Column::Code.eq(code))
        .filter(activation_codes::Column::IsUsed.eq(false))
        .exec(txn)
        .await?;
    if consumed.rows_affected == 0 {
        return Err(PortalError::InvalidActivationCode);
    }

    if let Some(existing) = existing {
        users::Entity::update_many()
            .col_expr(users::Column::IsPaid, Expr::value(true))
            .filter(users::Column::Id.eq(existing.id))
            .exec(txn)
            .await?;
        return Ok(Redemption::Upgraded {
            user_id: existing.id,
        });
    }

    let inserted = new_user_model(user, true, false)
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortalError::PhoneAlreadyRegistered
            } else {
                PortalError::from(e)
            }
        })?;
    Ok(Redemption::Created {
        user_id: inserted.id,
    })
}

fn code_from_model(model: activation_codes::Model) -> ActivationCode {
    ActivationCode {
        id: model.id,
        code: model.code,
        is_used: model.is_used,
        used_by_username: model.used_by_username,
        created_at: model.created_at,
    }
}

// ── Category repository ───────────────────────────────────────────────────────

pub struct DbCategoryRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository<'_> {
    async fn list_ordered(&self) -> Result<Vec<Category>, PortalError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::SortOrder)
            .order_by_asc(categories::Column::Id)
            .all(self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, PortalError> {
        let model = categories::Entity::find_by_id(id)
            .one(self.db)
            .await
            .context("find category by id")?;
        Ok(model.map(category_from_model))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, PortalError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(self.db)
            .await
            .context("find category by name")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, category: &NewCategory) -> Result<Category, PortalError> {
        let model = categories::ActiveModel {
            id: NotSet,
            name: Set(category.name.clone()),
            icon_url: Set(category.icon_url.clone()),
            description: Set(category.description.clone()),
            sort_order: Set(category.sort_order),
            created_at: Set(Utc::now()),
        }
        .insert(self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortalError::CategoryAlreadyExists
            } else {
                PortalError::Internal(anyhow::Error::new(e).context("create category"))
            }
        })?;
        Ok(category_from_model(model))
    }

    async fn delete_reassigning(&self, id: i32) -> Result<u64, PortalError> {
        self.db
            .transaction::<_, u64, PortalError>(|txn| {
                Box::pin(async move {
                    if categories::Entity::find_by_id(id).one(txn).await?.is_none() {
                        return Err(PortalError::CategoryNotFound);
                    }

                    let dependents = guide_contents::Entity::find()
                        .filter(guide_contents::Column::CategoryId.eq(id))
                        .count(txn)
                        .await?;

                    let mut moved = 0;
                    if dependents > 0 {
                        let fallback = uncategorized_in(txn).await?;
                        moved = guide_contents::Entity::update_many()
                            .col_expr(guide_contents::Column::CategoryId, Expr::value(fallback))
                            .filter(guide_contents::Column::CategoryId.eq(id))
                            .exec(txn)
                            .await?
                            .rows_affected;
                    }

                    categories::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(moved)
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "delete category"))
    }
}

/// Id of the reserved category, inserting it on first use.
async fn uncategorized_in(txn: &DatabaseTransaction) -> Result<i32, DbErr> {
    if let Some(existing) = categories::Entity::find()
        .filter(categories::Column::Name.eq(UNCATEGORIZED))
        .one(txn)
        .await?
    {
        return Ok(existing.id);
    }
    let created = categories::ActiveModel {
        id: NotSet,
        name: Set(UNCATEGORIZED.to_owned()),
        icon_url: Set(None),
        description: Set(None),
        sort_order: Set(UNCATEGORIZED_SORT_ORDER),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;
    tracing::info!(category_id = created.id, "created reserved category");
    Ok(created.id)
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        icon_url: model.icon_url,
        description: model.description,
        sort_order: model.sort_order,
        created_at: model.created_at,
    }
}

// ── Tag repository ────────────────────────────────────────────────────────────

pub struct DbTagRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl TagRepository for DbTagRepository<'_> {
    async fn list(&self) -> Result<Vec<Tag>, PortalError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, PortalError> {
        let model = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(self.db)
            .await
            .context("find tag by name")?;
        Ok(model.map(tag_from_model))
    }

    async fn create(&self, name: &str) -> Result<Tag, PortalError> {
        let model = tags::ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
        }
        .insert(self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortalError::TagAlreadyExists
            } else {
                PortalError::Internal(anyhow::Error::new(e).context("create tag"))
            }
        })?;
        Ok(tag_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, PortalError> {
        self.db
            .transaction::<_, bool, PortalError>(|txn| {
                Box::pin(async move {
                    guide_tags::Entity::delete_many()
                        .filter(guide_tags::Column::TagId.eq(id))
                        .exec(txn)
                        .await?;
                    let result = tags::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "delete tag"))
    }

    async fn list_for_guide(&self, guide_id: i32) -> Result<Vec<Tag>, PortalError> {
        let models = tags::Entity::find()
            .join(JoinType::InnerJoin, tags::Relation::GuideTags.def())
            .filter(guide_tags::Column::GuideId.eq(guide_id))
            .order_by_asc(tags::Column::Id)
            .all(self.db)
            .await
            .context("list tags for guide")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
    }
}

// ── Guide repository ──────────────────────────────────────────────────────────

pub struct DbGuideRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl GuideRepository for DbGuideRepository<'_> {
    async fn list_published(
        &self,
        filter: &GuideFilter,
        page: PageRequest,
    ) -> Result<Page<Guide>, PortalError> {
        let page = fetch_page(
            published_select(filter),
            self.db,
            page,
            GUIDE_PAGE_SIZE,
            guide_from_model,
        )
        .await
        .context("list published guides")?;
        Ok(page)
    }

    async fn list_all(&self, page: PageRequest) -> Result<Page<Guide>, PortalError> {
        let select =
            guide_contents::Entity::find().order_by_desc(guide_contents::Column::UpdatedAt);
        let page = fetch_page(select, self.db, page, ADMIN_PAGE_SIZE, guide_from_model)
            .await
            .context("list guides")?;
        Ok(page)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Guide>, PortalError> {
        let model = guide_contents::Entity::find_by_id(id)
            .one(self.db)
            .await
            .context("find guide by id")?;
        Ok(model.map(guide_from_model))
    }

    async fn increment_views(&self, id: i32) -> Result<bool, PortalError> {
        let result = guide_contents::Entity::update_many()
            .col_expr(
                guide_contents::Column::ViewCount,
                Expr::col(guide_contents::Column::ViewCount).add(1),
            )
            .filter(guide_contents::Column::Id.eq(id))
            .exec(self.db)
            .await
            .context("increment guide views")?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_likes(&self, id: i32) -> Result<Option<i32>, PortalError> {
        let updated = guide_contents::Entity::update_many()
            .col_expr(
                guide_contents::Column::LikeCount,
                Expr::col(guide_contents::Column::LikeCount).add(1),
            )
            .filter(guide_contents::Column::Id.eq(id))
            .exec_with_returning(self.db)
            .await
            .context("increment guide likes")?;
        Ok(updated.into_iter().next().map(|m| m.like_count))
    }

    async fn related(&self, guide: &Guide, limit: u64) -> Result<Vec<Guide>, PortalError> {
        let models = guide_contents::Entity::find()
            .filter(guide_contents::Column::CategoryId.eq(guide.category_id))
            .filter(guide_contents::Column::Id.ne(guide.id))
            .filter(guide_contents::Column::IsPublished.eq(true))
            .order_by_random()
            .limit(limit)
            .all(self.db)
            .await
            .context("find related guides")?;
        Ok(models.into_iter().map(guide_from_model).collect())
    }

    async fn create(&self, draft: &GuideDraft) -> Result<Guide, PortalError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, Guide, PortalError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let mut active = guide_contents::ActiveModel {
                        id: NotSet,
                        view_count: Set(0),
                        like_count: Set(0),
                        created_at: Set(now),
                        ..Default::default()
                    };
                    apply_draft(&mut active, &draft);
                    active.updated_at = Set(now);
                    let model = active.insert(txn).await?;
                    replace_tags(txn, model.id, &draft.tag_ids).await?;
                    Ok(guide_from_model(model))
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "create guide"))
    }

    async fn update(&self, id: i32, draft: &GuideDraft) -> Result<Option<Guide>, PortalError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, Option<Guide>, PortalError>(|txn| {
                Box::pin(async move {
                    let Some(existing) = guide_contents::Entity::find_by_id(id).one(txn).await?
                    else {
                        return Ok(None);
                    };
                    let mut active: guide_contents::ActiveModel = existing.into();
                    apply_draft(&mut active, &draft);
                    active.updated_at = Set(Utc::now());
                    let model = active.update(txn).await?;
                    replace_tags(txn, model.id, &draft.tag_ids).await?;
                    Ok(Some(guide_from_model(model)))
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "update guide"))
    }

    async fn delete(&self, id: i32) -> Result<bool, PortalError> {
        let result = guide_contents::Entity::delete_by_id(id)
            .exec(self.db)
            .await
            .context("delete guide")?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, PortalError> {
        let count = guide_contents::Entity::find()
            .count(self.db)
            .await
            .context("count guides")?;
        Ok(count)
    }
}

/// Published guides matching every present filter, newest first.
fn published_select(filter: &GuideFilter) -> Select<guide_contents::Entity> {
    let mut select =
        guide_contents::Entity::find().filter(guide_contents::Column::IsPublished.eq(true));
    if let Some(category_id) = filter.category_id {
        select = select.filter(guide_contents::Column::CategoryId.eq(category_id));
    }
    if let Some(tag_id) = filter.tag_id {
        select = select
            .join(JoinType::InnerJoin, guide_contents::Relation::GuideTags.def())
            .filter(guide_tags::Column::TagId.eq(tag_id));
    }
    if let Some(q) = filter.q.as_deref() {
        select = select.filter_contains_any(
            &[
                guide_contents::Column::Title,
                guide_contents::Column::Summary,
            ],
            q,
        );
    }
    select.order_by_desc(guide_contents::Column::CreatedAt)
}

fn apply_draft(active: &mut guide_contents::ActiveModel, draft: &GuideDraft) {
    active.category_id = Set(draft.category_id);
    active.title = Set(draft.title.clone());
    active.summary = Set(draft.summary.clone());
    active.content = Set(draft.content.clone());
    active.cover_image_url = Set(draft.cover_image_url.clone());
    active.icon_url = Set(draft.icon_url.clone());
    active.audio_url = Set(draft.audio_url.clone());
    active.video_url = Set(draft.video_url.clone());
    active.is_published = Set(draft.is_published);
    active.is_featured = Set(draft.is_featured);
}

/// Replace the guide's tag set with the known ids among `tag_ids`.
async fn replace_tags(
    txn: &DatabaseTransaction,
    guide_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    guide_tags::Entity::delete_many()
        .filter(guide_tags::Column::GuideId.eq(guide_id))
        .exec(txn)
        .await?;
    if tag_ids.is_empty() {
        return Ok(());
    }
    let known: Vec<i32> = tags::Entity::find()
        .select_only()
        .column(tags::Column::Id)
        .filter(tags::Column::Id.is_in(tag_ids.to_vec()))
        .into_tuple()
        .all(txn)
        .await?;
    if known.is_empty() {
        return Ok(());
    }
    guide_tags::Entity::insert_many(known.into_iter().map(|tag_id| guide_tags::ActiveModel {
        guide_id: Set(guide_id),
        tag_id: Set(tag_id),
    }))
    .exec_without_returning(txn)
    .await?;
    Ok(())
}

fn guide_from_model(model: guide_contents::Model) -> Guide {
    Guide {
        id: model.id,
        category_id: model.category_id,
        title: model.title,
        summary: model.summary,
        content: model.content,
        icon_url: model.icon_url,
        cover_image_url: model.cover_image_url,
        audio_url: model.audio_url,
        video_url: model.video_url,
        view_count: model.view_count,
        like_count: model.like_count,
        is_published: model.is_published,
        is_featured: model.is_featured,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Favorite repository ───────────────────────────────────────────────────────

pub struct DbFavoriteRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository<'_> {
    async fn toggle(&self, user_id: i32, guide_id: i32) -> Result<FavoriteAction, PortalError> {
        self.db
            .transaction::<_, FavoriteAction, PortalError>(|txn| {
                Box::pin(async move {
                    let removed = user_favorites::Entity::delete_many()
                        .filter(user_favorites::Column::UserId.eq(user_id))
                        .filter(user_favorites::Column::GuideId.eq(guide_id))
                        .exec(txn)
                        .await?;
                    if removed.rows_affected > 0 {
                        return Ok(FavoriteAction::Unfavorited);
                    }
                    user_favorites::Entity::insert(user_favorites::ActiveModel {
                        user_id: Set(user_id),
                        guide_id: Set(guide_id),
                    })
                    .on_conflict(
                        OnConflict::columns([
                            user_favorites::Column::UserId,
                            user_favorites::Column::GuideId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;
                    Ok(FavoriteAction::Favorited)
                })
            })
            .await
            .map_err(|e| flatten_txn(e, "toggle favorite"))
    }

    async fn is_favorite(&self, user_id: i32, guide_id: i32) -> Result<bool, PortalError> {
        let count = user_favorites::Entity::find()
            .filter(user_favorites::Column::UserId.eq(user_id))
            .filter(user_favorites::Column::GuideId.eq(guide_id))
            .count(self.db)
            .await
            .context("check favorite")?;
        Ok(count > 0)
    }

    async fn find_favorites(&self, user_id: i32) -> Result<Vec<Guide>, PortalError> {
        let models = guide_contents::Entity::find()
            .join(
                JoinType::InnerJoin,
                guide_contents::Relation::UserFavorites.def(),
            )
            .filter(user_favorites::Column::UserId.eq(user_id))
            .order_by_desc(guide_contents::Column::CreatedAt)
            .all(self.db)
            .await
            .context("find favorites")?;
        Ok(models.into_iter().map(guide_from_model).collect())
    }
}

// ── Feedback repository ───────────────────────────────────────────────────────

pub struct DbFeedbackRepository<'a> {
    pub db: &'a DatabaseConnection,
}

impl FeedbackRepository for DbFeedbackRepository<'_> {
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback, PortalError> {
        let model = feedbacks::ActiveModel {
            id: NotSet,
            content: Set(feedback.content.clone()),
            contact: Set(feedback.contact.clone()),
            created_at: Set(Utc::now()),
            user_id: Set(feedback.user_id),
            status: Set(FeedbackStatus::Pending.as_i16()),
        }
        .insert(self.db)
        .await
        .context("create feedback")?;
        Ok(feedback_from_model(model))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Feedback>, PortalError> {
        let select = feedbacks::Entity::find()
            .order_by_desc(feedbacks::Column::CreatedAt)
            .order_by_desc(feedbacks::Column::Id);
        let page = fetch_page(select, self.db, page, ADMIN_PAGE_SIZE, feedback_from_model)
            .await
            .context("list feedback")?;
        Ok(page)
    }

    async fn set_status(&self, id: i32, status: FeedbackStatus) -> Result<bool, PortalError> {
        let result = feedbacks::Entity::update_many()
            .col_expr(feedbacks::Column::Status, Expr::value(status.as_i16()))
            .filter(feedbacks::Column::Id.eq(id))
            .exec(self.db)
            .await
            .context("set feedback status")?;
        Ok(result.rows_affected > 0)
    }
}

fn feedback_from_model(model: feedbacks::Model) -> Feedback {
    Feedback {
        id: model.id,
        content: model.content,
        contact: model.contact,
        created_at: model.created_at,
        user_id: model.user_id,
        status: FeedbackStatus::from_i16(model.status).unwrap_or_default(),
    }
}
