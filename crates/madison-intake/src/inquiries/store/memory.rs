use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::{InquiryStore, StoreError};
use crate::inquiries::domain::{Inquiry, InquiryId, NewInquiry};

/// Process-local store. Contents are lost on shutdown.
#[derive(Default, Clone)]
pub struct InMemoryInquiryStore {
    records: Arc<Mutex<Vec<Inquiry>>>,
}

impl InMemoryInquiryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InquiryStore for InMemoryInquiryStore {
    fn create(&self, inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("inquiry mutex poisoned".to_string()))?;

        // Id assignment and append share the lock so ids follow list order.
        let id = InquiryId(guard.len() as i64 + 1);
        let record = inquiry.into_inquiry(id, Utc::now());
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("inquiry mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}
