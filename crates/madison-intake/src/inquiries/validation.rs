use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{NewInquiry, PracticeArea};

pub const MIN_PHONE_LENGTH: usize = 10;
pub const MIN_MESSAGE_LENGTH: usize = 20;

pub const TERMS_MESSAGE: &str = "You must accept the terms and privacy policy";
const EXPECTED_STRING: &str = "Expected a string";

/// Single field-level failure reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule violation found in a submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|error| error.field).collect()
    }

    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

type Check = fn(Option<&Value>) -> Result<(), String>;

/// One entry in the intake rule table.
struct FieldRule {
    field: &'static str,
    check: Check,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "firstName",
        check: check_first_name,
    },
    FieldRule {
        field: "lastName",
        check: check_last_name,
    },
    FieldRule {
        field: "email",
        check: check_email,
    },
    FieldRule {
        field: "phone",
        check: check_phone,
    },
    FieldRule {
        field: "practiceArea",
        check: check_practice_area,
    },
    FieldRule {
        field: "message",
        check: check_message,
    },
    FieldRule {
        field: "termsAccepted",
        check: check_terms,
    },
];

/// Run every intake rule against an untyped payload.
///
/// Rules never short-circuit: the error list carries one entry per failing field so the
/// form can highlight all of them at once.
pub fn validate_submission(payload: &Value) -> Result<NewInquiry, ValidationErrors> {
    let empty = Map::new();
    let object = payload.as_object().unwrap_or(&empty);

    let errors: Vec<FieldError> = RULES
        .iter()
        .filter_map(|rule| {
            (rule.check)(present(object, rule.field))
                .err()
                .map(|message| FieldError {
                    field: rule.field,
                    message,
                })
        })
        .collect();

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let text = |field: &str| {
        object
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let practice_area = object
        .get("practiceArea")
        .and_then(Value::as_str)
        .and_then(PracticeArea::from_slug)
        .ok_or_else(|| {
            ValidationErrors(vec![FieldError {
                field: "practiceArea",
                message: "Please select a practice area".to_string(),
            }])
        })?;

    Ok(NewInquiry {
        first_name: text("firstName"),
        last_name: text("lastName"),
        email: text("email"),
        phone: text("phone"),
        practice_area,
        message: text("message"),
    })
}

/// `null` is treated the same as an absent key.
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn string_field<'a>(value: Option<&'a Value>, required: &str) -> Result<&'a str, String> {
    match value {
        None => Err(required.to_string()),
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(_) => Err(EXPECTED_STRING.to_string()),
    }
}

fn min_length(value: Option<&Value>, min: usize, message: &str) -> Result<(), String> {
    let text = string_field(value, message)?;
    if text.chars().count() < min {
        return Err(message.to_string());
    }
    Ok(())
}

fn check_first_name(value: Option<&Value>) -> Result<(), String> {
    min_length(value, 1, "First name is required")
}

fn check_last_name(value: Option<&Value>) -> Result<(), String> {
    min_length(value, 1, "Last name is required")
}

fn check_email(value: Option<&Value>) -> Result<(), String> {
    let text = string_field(value, "Email is required")?;
    if is_email_shape(text) {
        Ok(())
    } else {
        Err("Invalid email address".to_string())
    }
}

fn check_phone(value: Option<&Value>) -> Result<(), String> {
    min_length(
        value,
        MIN_PHONE_LENGTH,
        "Phone number must be at least 10 digits",
    )
}

fn check_practice_area(value: Option<&Value>) -> Result<(), String> {
    let text = string_field(value, "Please select a practice area")?;
    match PracticeArea::from_slug(text) {
        Some(_) => Ok(()),
        None => Err("Please select a practice area".to_string()),
    }
}

fn check_message(value: Option<&Value>) -> Result<(), String> {
    min_length(
        value,
        MIN_MESSAGE_LENGTH,
        "Please provide more details about your case (at least 20 characters)",
    )
}

fn check_terms(value: Option<&Value>) -> Result<(), String> {
    match value {
        Some(Value::Bool(true)) => Ok(()),
        _ => Err(TERMS_MESSAGE.to_string()),
    }
}

/// Structural email check: `local@label.label...tld`.
pub fn is_email_shape(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    // The final local character must be alphanumeric, `_`, `+` or `-`.
    let local_ok = !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'));
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let (tld, hosts) = match labels.split_last() {
        Some(parts) => parts,
        None => return false,
    };

    let hosts_ok = hosts.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    hosts_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
