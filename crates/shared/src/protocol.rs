use serde::{Deserialize, Serialize};

use crate::domain::{BodId, ClubId};

pub const BODS_ROUTE: &str = "/bods";
pub const CLUBS_ROUTE: &str = "/clubs";

pub fn bod_route(bod_id: BodId) -> String {
    format!("{BODS_ROUTE}/{}", bod_id.0)
}

/// Create payload. A missing or zero `id` lets the server assign one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BodId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_no: String,
    pub branch: String,
    pub usn: String,
    pub club_id: ClubId,
}

impl NewBod {
    pub fn requested_id(&self) -> Option<BodId> {
        self.id.filter(|id| id.0 != 0)
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<ClubId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClub {
    pub name: String,
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}
