use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use super::domain::Inquiry;
use super::store::{InquiryStore, StoreError};
use super::validation::{validate_submission, ValidationErrors};

/// Service composing intake validation with the configured store.
pub struct InquiryService<S> {
    store: Arc<S>,
}

impl<S> InquiryService<S>
where
    S: InquiryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate a raw payload and persist it, returning the stored record.
    pub fn submit(&self, payload: &Value) -> Result<Inquiry, InquiryServiceError> {
        let inquiry = validate_submission(payload).map_err(|errors| {
            debug!(fields = ?errors.fields(), "inquiry rejected by validation");
            errors
        })?;

        let stored = self.store.create(inquiry).map_err(|err| {
            error!(error = %err, "failed to persist inquiry");
            err
        })?;

        info!(
            inquiry_id = %stored.id,
            practice_area = %stored.practice_area,
            "inquiry accepted"
        );
        Ok(stored)
    }

    /// Every stored inquiry in creation order.
    pub fn list(&self) -> Result<Vec<Inquiry>, InquiryServiceError> {
        let inquiries = self.store.list().map_err(|err| {
            error!(error = %err, "failed to list inquiries");
            err
        })?;
        debug!(count = inquiries.len(), "listed inquiries");
        Ok(inquiries)
    }
}

/// Error raised by the inquiry service.
#[derive(Debug, thiserror::Error)]
pub enum InquiryServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}
