pub mod admin_page;
pub mod club_listing;
pub mod data_service;
pub mod draft;
pub mod render;
pub mod validation;

pub use admin_page::{AdminPageView, BodAdminPage, FormMode, FormState, SubmitOutcome};
pub use club_listing::ClubListing;
pub use data_service::{ClubDataService, HttpDataService};
pub use draft::{BodDraft, BodField, DraftEdit, DraftError};
pub use validation::ValidationMode;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
