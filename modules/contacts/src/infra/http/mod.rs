pub mod dto;
pub mod gateway;

pub use gateway::HttpContactsGateway;
