//! Filesystem-backed services for the RCAP client.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::RcapPaths;
pub use storage::FileTokenStore;
