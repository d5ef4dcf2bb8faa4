use async_trait::async_trait;
use httpkit::TracedClient;
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ContactsConfig;
use crate::contract::error::ContactsError;
use crate::contract::model::{Contact, ImageBlob, NewContact};
use crate::domain::ports::ContactsGateway;
use crate::infra::http::dto::{ContactDto, ListResponse, NewContactDto};

/// Multipart part names expected by the upload endpoint.
pub const CONTACT_PART: &str = "contact";
pub const PICTURE_PART: &str = "contactPicFile";

/// HTTP adapter for the two remote contact services.
pub struct HttpContactsGateway {
    client: TracedClient,
    list_url: Url,
    upload_url: Url,
}

impl HttpContactsGateway {
    pub fn new(client: TracedClient, list_url: Url, upload_url: Url) -> Self {
        Self {
            client,
            list_url,
            upload_url,
        }
    }

    /// Build the client (timeout, retries) and parse both endpoints.
    pub fn from_config(cfg: &ContactsConfig) -> Result<Self, ContactsError> {
        let client = TracedClient::builder()
            .timeout(cfg.timeout())
            .retry(cfg.retry_policy())
            .user_agent(concat!("contacts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ContactsError::from_client("HTTP client", &e))?;
        Ok(Self::new(
            client,
            parse_endpoint(&cfg.list_url)?,
            parse_endpoint(&cfg.upload_url)?,
        ))
    }

    /// Upload URL with `format=<ext>` appended to any existing query.
    pub fn upload_url_for(&self, image: &ImageBlob) -> Url {
        let mut url = self.upload_url.clone();
        url.query_pairs_mut()
            .append_pair("format", image.upload_format());
        url
    }

    fn upload_form(contact: &NewContact, image: &ImageBlob) -> Result<Form, ContactsError> {
        let json = NewContactDto::from(contact)
            .to_json()
            .map_err(|e| ContactsError::validation(e.to_string()))?;

        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("picture.{}", image.upload_format()));
        let picture = Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(image.mime_type())
            .map_err(|e| ContactsError::validation(e.to_string()))?;

        Ok(Form::new()
            .text(CONTACT_PART, json)
            .part(PICTURE_PART, picture))
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ContactsError> {
    let url = Url::parse(raw).map_err(|e| ContactsError::invalid_endpoint(raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ContactsError::invalid_endpoint(
            raw,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

async fn read_json_body<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ContactsError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ContactsError::status(endpoint, status.as_u16()));
    }
    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ContactsError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            ContactsError::decode(endpoint, e.to_string())
        }
    })?;
    serde_json::from_slice(&body).map_err(|e| ContactsError::decode(endpoint, e.to_string()))
}

#[async_trait]
impl ContactsGateway for HttpContactsGateway {
    #[instrument(
        name = "contacts.http.list_contacts",
        skip_all,
        fields(list_url = %self.list_url)
    )]
    async fn list_contacts(&self) -> Result<Vec<Contact>, ContactsError> {
        let endpoint = "GET contacts";
        let result = async {
            let response = self
                .client
                .get(self.list_url.as_str())
                .await
                .map_err(|e| ContactsError::from_client(endpoint, &e))?;
            let body: ListResponse = read_json_body(endpoint, response).await?;
            Ok::<_, ContactsError>(body.into_contacts())
        }
        .await;

        match &result {
            Ok(contacts) => debug!(count = contacts.len(), "retrieved contacts"),
            Err(e) => warn!(error = %e, "error while retrieving contacts"),
        }
        result
    }

    #[instrument(
        name = "contacts.http.upload_contact",
        skip_all,
        fields(format = %image.upload_format(), image_bytes = image.bytes.len())
    )]
    async fn upload_contact(
        &self,
        contact: &NewContact,
        image: &ImageBlob,
    ) -> Result<Contact, ContactsError> {
        let endpoint = "POST contact";
        let url = self.upload_url_for(image);
        let form = Self::upload_form(contact, image)?;

        let result = async {
            let response = self
                .client
                .post_multipart(url.as_str(), form)
                .await
                .map_err(|e| ContactsError::from_client(endpoint, &e))?;
            let dto: ContactDto = read_json_body(endpoint, response).await?;
            Ok::<_, ContactsError>(Contact::from(dto))
        }
        .await;

        match &result {
            Ok(stored) => debug!(contact_id = ?stored.contact_id, "contact uploaded"),
            Err(e) => warn!(error = %e, "error while uploading contact"),
        }
        result
    }
}
