use guidebook_domain::feedback::FeedbackStatus;
use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::repository::FeedbackRepository;
use crate::domain::types::{Feedback, NewFeedback};
use crate::error::PortalError;

pub struct SubmitFeedbackInput {
    pub content: String,
    pub contact: Option<String>,
    pub user_id: Option<i32>,
}

pub struct SubmitFeedbackUseCase<F>
where
    F: FeedbackRepository,
{
    pub feedbacks: F,
}

impl<F> SubmitFeedbackUseCase<F>
where
    F: FeedbackRepository,
{
    pub async fn execute(&self, input: SubmitFeedbackInput) -> Result<Feedback, PortalError> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(PortalError::MissingField("content"));
        }
        let contact = input
            .contact
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());

        self.feedbacks
            .create(&NewFeedback {
                content: content.to_owned(),
                contact,
                user_id: input.user_id,
            })
            .await
    }
}

pub struct ListFeedbackUseCase<F>
where
    F: FeedbackRepository,
{
    pub feedbacks: F,
}

impl<F> ListFeedbackUseCase<F>
where
    F: FeedbackRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<Page<Feedback>, PortalError> {
        self.feedbacks.list(page.clamped()).await
    }
}

pub struct UpdateFeedbackStatusUseCase<F>
where
    F: FeedbackRepository,
{
    pub feedbacks: F,
}

impl<F> UpdateFeedbackStatusUseCase<F>
where
    F: FeedbackRepository,
{
    pub async fn execute(&self, id: i32, status: i16) -> Result<FeedbackStatus, PortalError> {
        let status = FeedbackStatus::from_i16(status).ok_or(PortalError::InvalidFeedbackStatus)?;
        if !self.feedbacks.set_status(id, status).await? {
            return Err(PortalError::FeedbackNotFound);
        }
        Ok(status)
    }
}
