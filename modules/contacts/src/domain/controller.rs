use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::contract::error::ContactsError;
use crate::contract::model::{Contact, ImageBlob};
use crate::domain::error::DomainError;
use crate::domain::ports::ContactsGateway;
use crate::domain::state::{reduce, Action, AppState, FormField};
use crate::view::{self, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Loaded(usize),
    Failed(ContactsError),
    /// Torn down before the response arrived; state was left alone.
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(Contact),
    /// Guard failed; no request was sent.
    Rejected(DomainError),
    Failed(ContactsError),
    /// Not in a state that accepts a submit (loading, uploading or disposed).
    Ignored,
}

/// Owns the application state and drives the two remote operations.
///
/// Single writer: every method takes `&mut self`, so at most one request is
/// in flight. Disposal cancels the in-flight request and any response that
/// races it is dropped.
pub struct ContactListController {
    gateway: Arc<dyn ContactsGateway>,
    state: AppState,
    placeholder: ImageBlob,
    disposal: CancellationToken,
}

impl ContactListController {
    pub fn new(gateway: Arc<dyn ContactsGateway>) -> Self {
        Self::with_placeholder(gateway, ImageBlob::placeholder())
    }

    /// `placeholder` is uploaded when the user did not pick a picture.
    pub fn with_placeholder(gateway: Arc<dyn ContactsGateway>, placeholder: ImageBlob) -> Self {
        Self {
            gateway,
            state: AppState::default(),
            placeholder,
            disposal: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn render(&self) -> Screen<'_> {
        view::screen(&self.state)
    }

    /// Token that tears this controller down when cancelled, e.g. from another task.
    pub fn disposal_token(&self) -> CancellationToken {
        self.disposal.clone()
    }

    pub fn dispose(&mut self) {
        debug!("disposing contact list controller");
        self.disposal.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposal.is_cancelled()
    }

    fn dispatch(&mut self, action: Action) {
        if self.is_disposed() {
            debug!(?action, "dropping action after disposal");
            return;
        }
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    /// Load the contact list. Failures end up in the error slot with an empty list.
    #[instrument(name = "contacts.controller.mount", skip(self))]
    pub async fn mount(&mut self) -> MountOutcome {
        if self.is_disposed() {
            return MountOutcome::Disposed;
        }
        self.dispatch(Action::MountStarted);

        let gateway = Arc::clone(&self.gateway);
        let result = tokio::select! {
            biased;
            _ = self.disposal.cancelled() => return MountOutcome::Disposed,
            res = gateway.list_contacts() => res,
        };
        if self.is_disposed() {
            return MountOutcome::Disposed;
        }

        match result {
            Ok(contacts) => {
                let count = contacts.len();
                info!(count, "contacts loaded");
                self.dispatch(Action::ContactsLoaded(contacts));
                MountOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(error = %e, "contact retrieval failed");
                self.dispatch(Action::ContactsFailed(format!(
                    "ERROR: Could not retrieve contacts: {e}."
                )));
                MountOutcome::Failed(e)
            }
        }
    }

    /// Form change event for a text field.
    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(Action::FieldEdited(field, value.into()));
    }

    /// File picker change event. The extension check only warns.
    pub fn select_image(&mut self, image: ImageBlob) {
        if !image.has_allowed_extension() {
            debug!(file_name = ?image.file_name, "image extension not in allow-list; keeping it");
        }
        self.dispatch(Action::ImageSelected(image));
    }

    /// Submit the current form draft.
    #[instrument(name = "contacts.controller.submit", skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.is_disposed() || !self.state.accepts_submit() {
            debug!(phase = ?self.state.phase, "submit ignored");
            return SubmitOutcome::Ignored;
        }

        let draft = self.state.form.clone();
        let new_contact = match draft.validate() {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "submit rejected");
                self.dispatch(Action::SubmitRejected(e.to_string()));
                return SubmitOutcome::Rejected(e);
            }
        };

        let selected = self.state.pending_image.clone();
        let image = selected.clone().unwrap_or_else(|| self.placeholder.clone());
        self.dispatch(Action::SubmitStarted);

        let gateway = Arc::clone(&self.gateway);
        let result = tokio::select! {
            biased;
            _ = self.disposal.cancelled() => return SubmitOutcome::Ignored,
            res = gateway.upload_contact(&new_contact, &image) => res,
        };
        if self.is_disposed() {
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(contact) => {
                info!(contact_id = ?contact.contact_id, "contact added");
                self.dispatch(Action::UploadSucceeded(contact.clone()));
                SubmitOutcome::Added(contact)
            }
            Err(e) => {
                warn!(error = %e, "contact upload failed");
                self.dispatch(Action::UploadFailed {
                    message: format!("ERROR: Could not add contact: {e}."),
                    draft,
                    image: selected,
                });
                SubmitOutcome::Failed(e)
            }
        }
    }
}
