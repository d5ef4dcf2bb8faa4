use std::fmt;

use crate::contract::model::{ImageBlob, MAX_NAME_LEN, MAX_PHONE_LEN};
use crate::domain::state::FormDraft;

/// Shown once a contact has been handed to the upload endpoint.
pub const SENT_NOTE: &str = "(contact data sent)";

/// The add-contact form with whatever the user has typed so far.
#[derive(Debug, Clone, Copy)]
pub struct AddContactForm<'a> {
    draft: &'a FormDraft,
    image: Option<&'a ImageBlob>,
    data_sent: bool,
}

impl<'a> AddContactForm<'a> {
    pub fn new(draft: &'a FormDraft, image: Option<&'a ImageBlob>, data_sent: bool) -> Self {
        Self {
            draft,
            image,
            data_sent,
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        format!("<{placeholder}>")
    } else {
        value.to_string()
    }
}

impl fmt::Display for AddContactForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Add new contact:")?;
        if self.data_sent {
            writeln!(f, "{SENT_NOTE}")?;
        }
        let picture = self
            .image
            .and_then(|i| i.file_name.clone())
            .unwrap_or_else(|| "<Upload a picture>".to_string());
        let row = vec![
            picture,
            or_placeholder(&self.draft.first_name, "First Name"),
            or_placeholder(&self.draft.last_name, "Last Name"),
            or_placeholder(&self.draft.phone, "Phone number"),
        ];
        super::write_table(
            f,
            &["Picture", "First Name", "Last Name", "Phone Number"],
            &[row],
        )?;
        writeln!(
            f,
            "(names up to {MAX_NAME_LEN} characters, phone up to {MAX_PHONE_LEN})"
        )
    }
}
