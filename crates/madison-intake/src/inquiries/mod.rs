//! Case-inquiry intake: the lead-capture records submitted through the website form,
//! the rules they must satisfy, and the store and HTTP surface that accept them.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Inquiry, InquiryId, NewInquiry, PracticeArea};
pub use router::{inquiry_router, AdminAccess, INQUIRIES_PATH};
pub use service::{InquiryService, InquiryServiceError};
pub use store::{InMemoryInquiryStore, InquiryStore, SqliteInquiryStore, StoreError};
pub use validation::{validate_submission, FieldError, ValidationErrors};
