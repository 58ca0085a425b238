//! Editable copy of a BOD record, mutated one field at a time.

use std::fmt;

use shared::{
    domain::{Bod, BodId, ClubId},
    protocol::{BodUpdate, NewBod},
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("the BOD id cannot be changed while editing an existing record")]
    IdentifierLocked,
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: BodField, value: String },
    #[error("no form is open")]
    FormClosed,
    #[error("no BOD with id {0} is loaded")]
    UnknownRecord(BodId),
}

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodField {
    Id,
    FirstName,
    LastName,
    Email,
    Password,
    PhoneNo,
    Branch,
    Usn,
    ClubId,
}

impl BodField {
    pub const ALL: [BodField; 9] = [
        BodField::Id,
        BodField::FirstName,
        BodField::LastName,
        BodField::Email,
        BodField::Password,
        BodField::PhoneNo,
        BodField::Branch,
        BodField::Usn,
        BodField::ClubId,
    ];

    /// Wire and form-input name.
    pub fn name(self) -> &'static str {
        match self {
            BodField::Id => "id",
            BodField::FirstName => "first_name",
            BodField::LastName => "last_name",
            BodField::Email => "email",
            BodField::Password => "password",
            BodField::PhoneNo => "phone_no",
            BodField::Branch => "branch",
            BodField::Usn => "usn",
            BodField::ClubId => "club_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BodField::Id => "BOD ID",
            BodField::FirstName => "First Name",
            BodField::LastName => "Last Name",
            BodField::Email => "Email",
            BodField::Password => "Password",
            BodField::PhoneNo => "Phone Number",
            BodField::Branch => "Branch",
            BodField::Usn => "USN",
            BodField::ClubId => "Club ID",
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            BodField::Id | BodField::ClubId => "number",
            BodField::Email => "email",
            BodField::Password => "password",
            _ => "text",
        }
    }
}

impl fmt::Display for BodField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One typed change to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Id(BodId),
    FirstName(String),
    LastName(String),
    Email(String),
    Password(String),
    PhoneNo(String),
    Branch(String),
    Usn(String),
    ClubId(ClubId),
}

impl DraftEdit {
    pub fn field(&self) -> BodField {
        match self {
            DraftEdit::Id(_) => BodField::Id,
            DraftEdit::FirstName(_) => BodField::FirstName,
            DraftEdit::LastName(_) => BodField::LastName,
            DraftEdit::Email(_) => BodField::Email,
            DraftEdit::Password(_) => BodField::Password,
            DraftEdit::PhoneNo(_) => BodField::PhoneNo,
            DraftEdit::Branch(_) => BodField::Branch,
            DraftEdit::Usn(_) => BodField::Usn,
            DraftEdit::ClubId(_) => BodField::ClubId,
        }
    }

    /// Builds an edit from raw form input. Numeric fields treat blank input as zero.
    pub fn parse(field: BodField, raw: &str) -> Result<Self, DraftError> {
        let number = || -> Result<i64, DraftError> {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed.parse::<i64>().map_err(|_| DraftError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
        };
        Ok(match field {
            BodField::Id => DraftEdit::Id(BodId(number()?)),
            BodField::FirstName => DraftEdit::FirstName(raw.to_string()),
            BodField::LastName => DraftEdit::LastName(raw.to_string()),
            BodField::Email => DraftEdit::Email(raw.to_string()),
            BodField::Password => DraftEdit::Password(raw.to_string()),
            BodField::PhoneNo => DraftEdit::PhoneNo(raw.to_string()),
            BodField::Branch => DraftEdit::Branch(raw.to_string()),
            BodField::Usn => DraftEdit::Usn(raw.to_string()),
            BodField::ClubId => DraftEdit::ClubId(ClubId(number()?)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodDraft {
    pub id: BodId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_no: String,
    pub branch: String,
    pub usn: String,
    pub club_id: ClubId,
}

impl BodDraft {
    /// Every field at its zero value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy of `bod`. Records never carry a password, so it starts blank.
    pub fn from_record(bod: &Bod) -> Self {
        Self {
            id: bod.id,
            first_name: bod.first_name.clone(),
            last_name: bod.last_name.clone(),
            email: bod.email.clone(),
            password: String::new(),
            phone_no: bod.phone_no.clone(),
            branch: bod.branch.clone(),
            usn: bod.usn.clone(),
            club_id: bod.club_id,
        }
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Id(v) => self.id = v,
            DraftEdit::FirstName(v) => self.first_name = v,
            DraftEdit::LastName(v) => self.last_name = v,
            DraftEdit::Email(v) => self.email = v,
            DraftEdit::Password(v) => self.password = v,
            DraftEdit::PhoneNo(v) => self.phone_no = v,
            DraftEdit::Branch(v) => self.branch = v,
            DraftEdit::Usn(v) => self.usn = v,
            DraftEdit::ClubId(v) => self.club_id = v,
        }
    }

    /// Form-input text for `field`.
    pub fn value_of(&self, field: BodField) -> String {
        match field {
            BodField::Id => self.id.0.to_string(),
            BodField::FirstName => self.first_name.clone(),
            BodField::LastName => self.last_name.clone(),
            BodField::Email => self.email.clone(),
            BodField::Password => self.password.clone(),
            BodField::PhoneNo => self.phone_no.clone(),
            BodField::Branch => self.branch.clone(),
            BodField::Usn => self.usn.clone(),
            BodField::ClubId => self.club_id.0.to_string(),
        }
    }

    pub fn to_new_bod(&self) -> NewBod {
        NewBod {
            id: Some(self.id).filter(|id| id.0 != 0),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone_no: self.phone_no.clone(),
            branch: self.branch.clone(),
            usn: self.usn.clone(),
            club_id: self.club_id,
        }
    }

    /// Full-record update; a blank password is left out so the stored one stays.
    pub fn to_update(&self) -> BodUpdate {
        BodUpdate {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
            phone_no: Some(self.phone_no.clone()),
            branch: Some(self.branch.clone()),
            usn: Some(self.usn.clone()),
            club_id: Some(self.club_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draft_matches_record;

    fn sample() -> Bod {
        Bod {
            id: BodId(3),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            phone_no: "9876543210".into(),
            branch: "CSE".into(),
            usn: "1AB23CS003".into(),
            club_id: ClubId(1),
        }
    }

    #[test]
    fn setting_first_name_touches_only_that_field() {
        let mut draft = BodDraft::empty();
        let before = draft.clone();
        draft.apply(DraftEdit::FirstName("Ada".into()));

        assert_eq!(draft.first_name, "Ada");
        assert_eq!(
            BodDraft {
                first_name: before.first_name.clone(),
                ..draft.clone()
            },
            before
        );
    }

    #[test]
    fn every_field_edit_is_isolated() {
        let original = BodDraft::from_record(&sample());
        for field in BodField::ALL {
            let raw = if matches!(field, BodField::Id | BodField::ClubId) {
                "99"
            } else {
                "changed"
            };
            let edit = DraftEdit::parse(field, raw).expect("parse");
            assert_eq!(edit.field(), field);

            let mut draft = original.clone();
            draft.apply(edit);
            for other in BodField::ALL {
                if other == field {
                    assert_eq!(draft.value_of(other), raw);
                } else {
                    assert_eq!(draft.value_of(other), original.value_of(other), "{other}");
                }
            }
        }
    }

    #[test]
    fn numeric_fields_reject_garbage_and_accept_blank() {
        assert_eq!(
            DraftEdit::parse(BodField::ClubId, "abc"),
            Err(DraftError::InvalidNumber {
                field: BodField::ClubId,
                value: "abc".into()
            })
        );
        assert_eq!(
            DraftEdit::parse(BodField::Id, " "),
            Ok(DraftEdit::Id(BodId(0)))
        );
    }

    #[test]
    fn record_copy_matches_and_converts_to_full_update() {
        let bod = sample();
        let draft = BodDraft::from_record(&bod);
        assert!(draft_matches_record(&draft, &bod));
        assert!(draft.password.is_empty());

        let update = draft.to_update();
        assert_eq!(update.password, None);
        assert_eq!(update.first_name.as_deref(), Some("Grace"));
        assert_eq!(update.club_id, Some(ClubId(1)));
    }

    #[test]
    fn zero_id_is_left_to_the_server() {
        let mut draft = BodDraft::empty();
        assert_eq!(draft.to_new_bod().id, None);
        draft.apply(DraftEdit::Id(BodId(12)));
        assert_eq!(draft.to_new_bod().id, Some(BodId(12)));
    }
}
