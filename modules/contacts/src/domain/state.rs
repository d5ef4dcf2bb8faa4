//! Application state and its reducer.
//!
//! Every mutation goes through [`reduce`], which consumes the previous state
//! and returns the next one. The controller is the only caller.

use crate::contract::model::{Contact, ImageBlob, NewContact, MAX_NAME_LEN, MAX_PHONE_LEN};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Not mounted yet.
    #[default]
    Idle,
    /// Retrieval in flight; nothing but the loading indicator is shown.
    Loading,
    Ready,
    /// Upload in flight; further submits are ignored.
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Phone,
}

/// Values typed into the add-contact form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl FormDraft {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::FirstName => self.first_name = value,
            FormField::LastName => self.last_name = value,
            FormField::Phone => self.phone = value,
        }
    }

    /// Check the submission guard and build the contact to upload.
    /// Values are sent as typed; only the emptiness check trims.
    pub fn validate(&self) -> Result<NewContact, DomainError> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(DomainError::missing_name());
        }
        for (field, value, max) in [
            ("First name", &self.first_name, MAX_NAME_LEN),
            ("Last name", &self.last_name, MAX_NAME_LEN),
            ("Phone", &self.phone, MAX_PHONE_LEN),
        ] {
            let len = value.chars().count();
            if len > max {
                return Err(DomainError::field_too_long(field, len, max));
            }
        }
        Ok(NewContact {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub phase: Phase,
    /// Display order is insertion order.
    pub contacts: Vec<Contact>,
    /// Last failure shown to the user; `None` when there is nothing to report.
    pub error_message: Option<String>,
    pub pending_image: Option<ImageBlob>,
    /// Set once a contact has been handed to the upload endpoint.
    pub data_sent: bool,
    pub form: FormDraft,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn accepts_submit(&self) -> bool {
        self.phase == Phase::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MountStarted,
    ContactsLoaded(Vec<Contact>),
    ContactsFailed(String),
    FieldEdited(FormField, String),
    ImageSelected(ImageBlob),
    SubmitRejected(String),
    SubmitStarted,
    UploadSucceeded(Contact),
    /// The submitted draft and picture come back so the form can be retried.
    UploadFailed {
        message: String,
        draft: FormDraft,
        image: Option<ImageBlob>,
    },
}

/// Pure transition function.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::MountStarted => {
            state.phase = Phase::Loading;
            state.error_message = None;
        }
        Action::ContactsLoaded(contacts) => {
            state.phase = Phase::Ready;
            state.contacts = contacts;
        }
        Action::ContactsFailed(message) => {
            state.phase = Phase::Ready;
            state.contacts.clear();
            state.error_message = Some(message);
        }
        Action::FieldEdited(field, value) => {
            state.form.set(field, value);
        }
        Action::ImageSelected(image) => {
            // Advisory only: the picture is kept even when the check fails.
            if !image.has_allowed_extension() {
                state.error_message =
                    Some(DomainError::invalid_image_extension(image.file_name.clone()).to_string());
            }
            state.pending_image = Some(image);
        }
        Action::SubmitRejected(message) => {
            state.error_message = Some(message);
        }
        Action::SubmitStarted => {
            if state.phase == Phase::Ready {
                state.phase = Phase::Submitting;
                state.form = FormDraft::default();
                state.pending_image = None;
                state.data_sent = true;
            }
        }
        Action::UploadSucceeded(contact) => {
            state.phase = Phase::Ready;
            state.contacts.push(contact);
            state.error_message = None;
        }
        Action::UploadFailed {
            message,
            draft,
            image,
        } => {
            state.phase = Phase::Ready;
            state.error_message = Some(message);
            state.form = draft;
            state.pending_image = image;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, first: &str) -> Contact {
        Contact {
            contact_id: Some(id.into()),
            first_name: first.into(),
            ..Contact::default()
        }
    }

    fn ready(contacts: Vec<Contact>) -> AppState {
        reduce(
            reduce(AppState::default(), Action::MountStarted),
            Action::ContactsLoaded(contacts),
        )
    }

    #[test]
    fn mount_goes_through_loading_to_ready() {
        let s = reduce(AppState::default(), Action::MountStarted);
        assert!(s.is_loading());

        let s = reduce(s, Action::ContactsLoaded(vec![contact("1", "Ada")]));
        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.contacts.len(), 1);
        assert_eq!(s.error_message, None);
    }

    #[test]
    fn failed_retrieval_leaves_empty_collection_and_message() {
        let s = reduce(AppState::default(), Action::MountStarted);
        let s = reduce(s, Action::ContactsFailed("ERROR: boom".into()));

        assert_eq!(s.phase, Phase::Ready);
        assert!(s.contacts.is_empty());
        assert_eq!(s.error_message.as_deref(), Some("ERROR: boom"));
    }

    #[test]
    fn remount_after_failure_drops_stale_message() {
        let s = reduce(AppState::default(), Action::MountStarted);
        let s = reduce(s, Action::ContactsFailed("ERROR: boom".into()));

        let s = reduce(s, Action::MountStarted);
        assert_eq!(s.error_message, None);
        let s = reduce(s, Action::ContactsLoaded(vec![contact("1", "Ada")]));
        assert_eq!(s.error_message, None);
        assert_eq!(s.contacts.len(), 1);
    }

    #[test]
    fn invalid_image_sets_message_but_keeps_blob() {
        let s = reduce(
            ready(vec![]),
            Action::ImageSelected(ImageBlob::new("foo.txt", vec![1])),
        );

        assert_eq!(
            s.error_message.as_deref(),
            Some("ERROR: Uploaded file can only be of type: png, jpg, gif, or jpeg.")
        );
        assert_eq!(
            s.pending_image.as_ref().and_then(|i| i.file_name.as_deref()),
            Some("foo.txt")
        );
    }

    #[test]
    fn valid_image_leaves_message_untouched() {
        let s = reduce(
            ready(vec![]),
            Action::ImageSelected(ImageBlob::new("me.jpg", vec![1])),
        );
        assert_eq!(s.error_message, None);
        assert!(s.pending_image.is_some());
    }

    #[test]
    fn submit_started_clears_form_and_image() {
        let mut s = ready(vec![]);
        s = reduce(s, Action::FieldEdited(FormField::FirstName, "Ada".into()));
        s = reduce(s, Action::ImageSelected(ImageBlob::new("a.png", vec![1])));
        s = reduce(s, Action::SubmitStarted);

        assert_eq!(s.phase, Phase::Submitting);
        assert_eq!(s.form, FormDraft::default());
        assert!(s.pending_image.is_none());
        assert!(s.data_sent);
    }

    #[test]
    fn submit_started_outside_ready_is_a_no_op() {
        let loading = reduce(AppState::default(), Action::MountStarted);
        assert_eq!(reduce(loading.clone(), Action::SubmitStarted), loading);
    }

    #[test]
    fn upload_success_appends_last_and_clears_error() {
        let mut s = ready(vec![contact("1", "Grace")]);
        s = reduce(s, Action::SubmitRejected("ERROR: old".into()));
        s = reduce(s, Action::SubmitStarted);
        s = reduce(s, Action::UploadSucceeded(contact("42", "Ada")));

        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.contacts.last().unwrap().contact_id.as_deref(), Some("42"));
        assert_eq!(s.contacts.len(), 2);
        assert_eq!(s.error_message, None);
    }

    #[test]
    fn upload_failure_keeps_collection_and_restores_form() {
        let before = ready(vec![contact("1", "Grace")]);
        let draft = FormDraft::new("Ada", "Lovelace", "555-1234");
        let image = Some(ImageBlob::new("ada.png", vec![1]));

        let s = reduce(before.clone(), Action::SubmitStarted);
        let s = reduce(
            s,
            Action::UploadFailed {
                message: "ERROR: Could not add contact.".into(),
                draft: draft.clone(),
                image: image.clone(),
            },
        );

        assert_eq!(s.contacts, before.contacts);
        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.form, draft);
        assert_eq!(s.pending_image, image);
        assert!(s.error_message.is_some());
    }

    #[test]
    fn validate_requires_a_name() {
        assert_eq!(
            FormDraft::new("", "  ", "555").validate(),
            Err(DomainError::missing_name())
        );
        assert!(FormDraft::new("", "Lovelace", "").validate().is_ok());
        assert!(FormDraft::new("Ada", "", "").validate().is_ok());
    }

    #[test]
    fn validate_enforces_lengths() {
        let long_name = "x".repeat(65);
        assert_eq!(
            FormDraft::new(long_name.as_str(), "", "").validate(),
            Err(DomainError::field_too_long("First name", 65, 64))
        );
        assert_eq!(
            FormDraft::new("Ada", "", "1".repeat(26)).validate(),
            Err(DomainError::field_too_long("Phone", 26, 25))
        );
        assert!(FormDraft::new("x".repeat(64), "", "1".repeat(25))
            .validate()
            .is_ok());
    }
}
