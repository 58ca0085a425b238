use std::sync::Arc;

use shared::domain::Club;
use tracing::{debug, warn};

use crate::data_service::ClubDataService;

/// Student-facing list of clubs, fetched once when the page loads.
pub struct ClubListing {
    service: Arc<dyn ClubDataService>,
    clubs: Vec<Club>,
}

impl ClubListing {
    pub fn new(service: Arc<dyn ClubDataService>) -> Self {
        Self {
            service,
            clubs: Vec::new(),
        }
    }

    /// Fetches all clubs. On failure the previous list stays and the error
    /// is logged.
    pub async fn load(&mut self) -> bool {
        match self.service.list_clubs().await {
            Ok(clubs) => {
                debug!(count = clubs.len(), "club list loaded");
                self.clubs = clubs;
                true
            }
            Err(error) => {
                warn!(%error, "failed to fetch clubs");
                false
            }
        }
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }
}
