#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use contacts::{ContactListController, ContactsConfig, HttpContactsGateway};
use httpmock::MockServer;

pub const LIST_PATH: &str = "/contacts";
pub const UPLOAD_PATH: &str = "/contacts/upload";

pub fn config_for(server: &MockServer) -> ContactsConfig {
    ContactsConfig {
        list_url: server.url(LIST_PATH),
        upload_url: server.url(UPLOAD_PATH),
        timeout_ms: 2_000,
        max_retries: 0,
        retry_backoff_ms: 1,
        placeholder_image: None,
    }
}

pub fn gateway_with(cfg: &ContactsConfig) -> Arc<HttpContactsGateway> {
    Arc::new(HttpContactsGateway::from_config(cfg).unwrap())
}

pub fn controller_for(server: &MockServer) -> ContactListController {
    ContactListController::new(gateway_with(&config_for(server)))
}

pub fn short_timeout(server: &MockServer, timeout: Duration) -> ContactsConfig {
    ContactsConfig {
        timeout_ms: timeout.as_millis() as u64,
        ..config_for(server)
    }
}

pub const TWO_CONTACTS: &str = r#"[
    {"contact_id":"1","first_name":"Grace","last_name":"Hopper","phone":"111",
     "thumbnail_url":"https://img/1_t.png","img_url":"https://img/1.png"},
    {"contact_id":"2","first_name":"Alan","last_name":"Turing","phone":"222",
     "thumbnail_url":"https://img/2_t.png","img_url":"https://img/2.png"}
]"#;

pub const ADA_STORED: &str = r#"{"contact_id":"42","first_name":"Ada","last_name":"Lovelace",
    "phone":"555-1234","thumbnail_url":"https://img/42_t.png","img_url":"https://img/42.png"}"#;
