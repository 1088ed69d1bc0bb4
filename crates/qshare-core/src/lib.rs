pub mod config;
pub mod logging;

pub mod content_disposition;
pub mod delivery;
pub mod notify;
pub mod pipeline;
pub mod probe;
pub mod store;
pub mod upload;
