//! View-model for the BOD management page: the fetched list plus the
//! create/edit modal form bound to a single draft.

use std::sync::Arc;

use shared::domain::{Bod, BodId};
use tracing::{debug, error, info, warn};

use crate::{
    data_service::ClubDataService,
    draft::{BodDraft, BodField, DraftEdit, DraftError},
    validation::{validate, ValidationMode},
};

pub const BOD_ADDED_MESSAGE: &str = "BOD added successfully!";
pub const BOD_UPDATED_MESSAGE: &str = "BOD updated successfully!";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to process the request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BodId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Open { mode: FormMode, draft: BodDraft },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Bod),
    Updated(Bod),
    /// Rejected before reaching the data service.
    Invalid(Vec<String>),
    Failed,
    NotOpen,
}

/// Borrowed snapshot handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct AdminPageView<'a> {
    pub bods: &'a [Bod],
    pub form: &'a FormState,
    pub loading: bool,
    pub message: &'a str,
}

pub struct BodAdminPage {
    service: Arc<dyn ClubDataService>,
    validation: ValidationMode,
    bods: Vec<Bod>,
    form: FormState,
    loading: bool,
    message: String,
}

impl BodAdminPage {
    pub fn new(service: Arc<dyn ClubDataService>, validation: ValidationMode) -> Self {
        Self {
            service,
            validation,
            bods: Vec::new(),
            form: FormState::Closed,
            loading: false,
            message: String::new(),
        }
    }

    /// First load of the page.
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Replaces the list with the service's current records. A failure is
    /// logged and the previous list is kept. Returns whether the list was
    /// replaced.
    pub async fn refresh(&mut self) -> bool {
        match self.service.list_bods().await {
            Ok(bods) => {
                debug!(count = bods.len(), "bod list refreshed");
                self.bods = bods;
                true
            }
            Err(error) => {
                warn!(%error, "failed to fetch bods; keeping previous list");
                false
            }
        }
    }

    pub fn open_create(&mut self) {
        self.form = FormState::Open {
            mode: FormMode::Create,
            draft: BodDraft::empty(),
        };
    }

    pub fn open_edit(&mut self, bod: &Bod) {
        self.form = FormState::Open {
            mode: FormMode::Edit(bod.id),
            draft: BodDraft::from_record(bod),
        };
    }

    /// Opens the edit form for a record already in the list.
    pub fn open_edit_by_id(&mut self, bod_id: BodId) -> Result<(), DraftError> {
        let bod = self
            .bods
            .iter()
            .find(|bod| bod.id == bod_id)
            .cloned()
            .ok_or(DraftError::UnknownRecord(bod_id))?;
        self.open_edit(&bod);
        Ok(())
    }

    /// Cancel: drops the draft and clears the message.
    pub fn close_form(&mut self) {
        self.form = FormState::Closed;
        self.message.clear();
    }

    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), DraftError> {
        let FormState::Open { mode, draft } = &mut self.form else {
            return Err(DraftError::FormClosed);
        };
        if matches!(edit, DraftEdit::Id(_)) && matches!(mode, FormMode::Edit(_)) {
            return Err(DraftError::IdentifierLocked);
        }
        debug!(field = %edit.field(), "draft field changed");
        draft.apply(edit);
        Ok(())
    }

    /// Raw form input for one field.
    pub fn set_field(&mut self, field: BodField, raw: &str) -> Result<(), DraftError> {
        let edit = DraftEdit::parse(field, raw)?;
        self.edit(edit)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let FormState::Open { mode, draft } = &self.form else {
            return SubmitOutcome::NotOpen;
        };
        let mode = *mode;
        let draft = draft.clone();

        self.loading = true;
        self.message.clear();

        if let Err(errors) = validate(&draft, self.validation, mode == FormMode::Create) {
            self.message = errors.join(", ");
            self.loading = false;
            return SubmitOutcome::Invalid(errors);
        }

        let result = match mode {
            FormMode::Create => self
                .service
                .create_bod(draft.to_new_bod())
                .await
                .map(SubmitOutcome::Created),
            FormMode::Edit(bod_id) => self
                .service
                .update_bod(bod_id, draft.to_update())
                .await
                .map(SubmitOutcome::Updated),
        };

        let outcome = match result {
            Ok(outcome) => {
                self.message = match &outcome {
                    SubmitOutcome::Created(bod) => {
                        info!(bod_id = bod.id.0, "bod added");
                        BOD_ADDED_MESSAGE
                    }
                    _ => {
                        info!(?mode, "bod updated");
                        BOD_UPDATED_MESSAGE
                    }
                }
                .to_string();
                self.refresh().await;
                self.form = FormState::Closed;
                outcome
            }
            Err(error) => {
                error!(%error, ?mode, "failed to submit bod form");
                self.message = SUBMIT_FAILED_MESSAGE.to_string();
                SubmitOutcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    pub fn bods(&self) -> &[Bod] {
        &self.bods
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.form, FormState::Open { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.form {
            FormState::Open { mode, .. } => Some(*mode),
            FormState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&BodDraft> {
        match &self.form {
            FormState::Open { draft, .. } => Some(draft),
            FormState::Closed => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn view(&self) -> AdminPageView<'_> {
        AdminPageView {
            bods: &self.bods,
            form: &self.form,
            loading: self.loading,
            message: &self.message,
        }
    }
}

#[cfg(test)]
#[path = "tests/admin_page_tests.rs"]
mod tests;
