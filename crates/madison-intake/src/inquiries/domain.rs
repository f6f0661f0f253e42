use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when an inquiry is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(pub i64);

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legal service category a prospective client selects on the case-inquiry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PracticeArea {
    PersonalInjury,
    FamilyLaw,
    EstatePlanning,
}

impl PracticeArea {
    pub const ALL: [PracticeArea; 3] = [
        PracticeArea::PersonalInjury,
        PracticeArea::FamilyLaw,
        PracticeArea::EstatePlanning,
    ];

    /// Wire value accepted from the form and stored in the database.
    pub const fn slug(self) -> &'static str {
        match self {
            PracticeArea::PersonalInjury => "personal-injury",
            PracticeArea::FamilyLaw => "family-law",
            PracticeArea::EstatePlanning => "estate-planning",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PracticeArea::PersonalInjury => "Personal Injury",
            PracticeArea::FamilyLaw => "Family Law",
            PracticeArea::EstatePlanning => "Estate Planning",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|area| area.slug() == value)
    }
}

impl fmt::Display for PracticeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Field set that passed validation and is ready to hand to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: PracticeArea,
    pub message: String,
}

impl NewInquiry {
    /// Attach store-generated fields, producing the persisted record.
    pub fn into_inquiry(self, id: InquiryId, created_at: DateTime<Utc>) -> Inquiry {
        Inquiry {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            practice_area: self.practice_area,
            message: self.message,
            terms_accepted: true,
            created_at,
        }
    }
}

/// A persisted lead-capture record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: PracticeArea,
    pub message: String,
    pub terms_accepted: bool,
    pub created_at: DateTime<Utc>,
}
