pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use config::ApiConfig;
pub use crate::core::{
    checksum::{Secrets, Signer},
    client::StudentApiClient,
    snapshot::{Snapshot, SnapshotReport},
};
pub use domain::model::{ApiResponse, StudentRef};
pub use utils::error::{Result, StudentApiError};
