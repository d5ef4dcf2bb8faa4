use async_trait::async_trait;

use crate::contract::error::ContactsError;
use crate::contract::model::{Contact, ImageBlob, NewContact};

/// The two remote operations the controller depends on.
#[async_trait]
pub trait ContactsGateway: Send + Sync {
    /// Fetch the current contact list, normalized to display order.
    async fn list_contacts(&self) -> Result<Vec<Contact>, ContactsError>;

    /// Upload a new contact with its picture; returns the stored record.
    async fn upload_contact(
        &self,
        contact: &NewContact,
        image: &ImageBlob,
    ) -> Result<Contact, ContactsError>;
}
