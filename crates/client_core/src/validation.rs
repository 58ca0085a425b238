use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::{BodDraft, BodField};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));
static USN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{10}$").expect("valid usn regex"));

/// How strictly a draft is checked before it is submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    Off,
    /// Every field must be filled in, like the `required` inputs of the form.
    #[default]
    Required,
    /// Field formats as well: email shape, 10-digit phone, 10-char USN.
    Schema,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(ValidationMode::Off),
            "required" => Ok(ValidationMode::Required),
            "schema" | "strict" => Ok(ValidationMode::Schema),
            other => Err(format!(
                "unknown validation mode '{other}' (expected off, required or schema)"
            )),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationMode::Off => "off",
            ValidationMode::Required => "required",
            ValidationMode::Schema => "schema",
        })
    }
}

/// Checks `draft` and returns every failure message in field order.
///
/// `creating` distinguishes the create form, where a password is mandatory,
/// from the edit form, where a blank password keeps the stored one.
pub fn validate(draft: &BodDraft, mode: ValidationMode, creating: bool) -> Result<(), Vec<String>> {
    let errors = match mode {
        ValidationMode::Off => Vec::new(),
        ValidationMode::Required => required_errors(draft, creating),
        ValidationMode::Schema => schema_errors(draft, creating),
    };
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn required_errors(draft: &BodDraft, creating: bool) -> Vec<String> {
    let mut errors = Vec::new();
    for field in BodField::ALL {
        let missing = match field {
            BodField::Id => false,
            BodField::ClubId => draft.club_id.0 == 0,
            BodField::Password if !creating => false,
            _ => draft.value_of(field).trim().is_empty(),
        };
        if missing {
            errors.push(format!("{} is required", field.label()));
        }
    }
    errors
}

fn schema_errors(draft: &BodDraft, creating: bool) -> Vec<String> {
    let mut errors = Vec::new();
    if draft.first_name.trim().is_empty() {
        errors.push("First Name is required".to_string());
    }
    if draft.last_name.trim().is_empty() {
        errors.push("Last Name is required".to_string());
    }
    if !EMAIL_RE.is_match(&draft.email) {
        errors.push("Invalid email address".to_string());
    }
    if (creating || !draft.password.is_empty()) && draft.password.chars().count() < 6 {
        errors.push("Password must be at least 6 characters".to_string());
    }
    if !PHONE_RE.is_match(&draft.phone_no) {
        errors.push("Phone Number must be a 10-digit number".to_string());
    }
    if draft.branch.trim().is_empty() {
        errors.push("Branch is required".to_string());
    }
    if !USN_RE.is_match(&draft.usn) {
        errors.push("USN must be 10 alphanumeric characters".to_string());
    }
    if draft.club_id.0 < 1 {
        errors.push("Club ID must be a positive number".to_string());
    }
    errors
}
