use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::inquiries::domain::{Inquiry, NewInquiry, PracticeArea};
use crate::inquiries::store::{InMemoryInquiryStore, InquiryStore, StoreError};
use crate::inquiries::{inquiry_router, AdminAccess, InquiryService};

pub(super) const ADMIN_TOKEN: &str = "partner-review-token";

pub(super) fn payload() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@example.com",
        "phone": "5551234567",
        "practiceArea": "family-law",
        "message": "I need help with a custody dispute regarding my children.",
        "termsAccepted": true,
    })
}

pub(super) fn payload_with(field: &str, value: Value) -> Value {
    let mut payload = payload();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(field.to_string(), value);
    payload
}

pub(super) fn payload_without(field: &str) -> Value {
    let mut payload = payload();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove(field);
    payload
}

pub(super) fn new_inquiry(first_name: &str) -> NewInquiry {
    NewInquiry {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "5551234567".to_string(),
        practice_area: PracticeArea::EstatePlanning,
        message: "Looking to set up a trust for my two grandchildren.".to_string(),
    }
}

pub(super) fn build_service() -> (
    InquiryService<InMemoryInquiryStore>,
    Arc<InMemoryInquiryStore>,
) {
    let store = Arc::new(InMemoryInquiryStore::default());
    let service = InquiryService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_service<S>(service: InquiryService<S>) -> axum::Router
where
    S: InquiryStore + 'static,
{
    inquiry_router(
        Arc::new(service),
        AdminAccess::Bearer(ADMIN_TOKEN.to_string()),
    )
}

pub(super) struct UnavailableStore;

impl InquiryStore for UnavailableStore {
    fn create(&self, _inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Store whose calls panic, standing in for a blocking task that never completes.
pub(super) struct PanickingStore;

impl InquiryStore for PanickingStore {
    fn create(&self, _inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        panic!("connection handle corrupted");
    }

    fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        panic!("connection handle corrupted");
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
