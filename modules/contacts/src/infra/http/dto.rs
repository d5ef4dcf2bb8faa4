//! Wire shapes of the remote contact services.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::contract::model::{Contact, NewContact};

/// A contact as the services send it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub contact_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl From<ContactDto> for Contact {
    fn from(dto: ContactDto) -> Self {
        Self {
            contact_id: dto.contact_id,
            first_name: dto.first_name.unwrap_or_default(),
            last_name: dto.last_name.unwrap_or_default(),
            phone: dto.phone.unwrap_or_default(),
            img_url: dto.img_url,
            thumbnail_url: dto.thumbnail_url,
        }
    }
}

/// Ids come back as strings from some deployments and as numbers from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "contact_id must be a string or number, got {other}"
        ))),
    }
}

/// The `contact` part of the upload form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContactDto<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
}

impl<'a> From<&'a NewContact> for NewContactDto<'a> {
    fn from(c: &'a NewContact) -> Self {
        Self {
            first_name: &c.first_name,
            last_name: &c.last_name,
            phone: &c.phone,
        }
    }
}

impl NewContactDto<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The list endpoint answers either with a bare array or with an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Bare(Vec<ContactDto>),
    Envelope {
        #[serde(rename = "resultCount")]
        result_count: u64,
        results: Vec<ContactDto>,
    },
}

impl ListResponse {
    /// Collapse both shapes into display order.
    pub fn into_contacts(self) -> Vec<Contact> {
        let dtos = match self {
            ListResponse::Bare(items) => items,
            ListResponse::Envelope { result_count: 0, .. } => Vec::new(),
            ListResponse::Envelope {
                result_count,
                results,
            } => {
                if result_count != results.len() as u64 {
                    debug!(
                        result_count,
                        received = results.len(),
                        "envelope count does not match results; using results"
                    );
                }
                results
            }
        };
        dtos.into_iter().map(Contact::from).collect()
    }
}
