use rand::RngExt;

use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::repository::ActivationCodeRepository;
use crate::domain::types::{ACTIVATION_CODE_LEN, ActivationCode, CODE_BATCH_SIZES};
use crate::error::PortalError;

/// Uppercase alphanumeric alphabet for activation codes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..ACTIVATION_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub struct GenerateCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub codes: C,
}

impl<C> GenerateCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    /// Returns the codes actually inserted; collisions are dropped, not retried.
    pub async fn execute(&self, batch: usize) -> Result<Vec<String>, PortalError> {
        if !CODE_BATCH_SIZES.contains(&batch) {
            return Err(PortalError::InvalidBatchSize);
        }
        let candidates: Vec<String> = (0..batch).map(|_| generate_code()).collect();
        let inserted = self.codes.insert_batch(&candidates).await?;
        tracing::info!(
            requested = batch,
            inserted = inserted.len(),
            "generated activation codes"
        );
        Ok(inserted)
    }
}

pub struct ListCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub codes: C,
}

impl<C> ListCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<Page<ActivationCode>, PortalError> {
        self.codes.list(page.clamped()).await
    }
}

pub struct AvailableCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub codes: C,
}

impl<C> AvailableCodesUseCase<C>
where
    C: ActivationCodeRepository,
{
    /// Every unused code, one per line.
    pub async fn execute(&self) -> Result<String, PortalError> {
        Ok(self.codes.list_unused_codes().await?.join("\n"))
    }
}
