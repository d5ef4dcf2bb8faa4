// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{error, model};

// === INTERNAL MODULES ===
// Exposed for the host binary and for tests; the contract is the stable surface.
pub mod config;
pub mod domain;
pub mod infra;
pub mod view;

pub use config::ContactsConfig;
pub use domain::controller::{ContactListController, MountOutcome, SubmitOutcome};
pub use domain::ports::ContactsGateway;
pub use infra::http::HttpContactsGateway;
