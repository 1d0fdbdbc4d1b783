pub mod checksum;
pub mod client;
pub mod endpoints;
pub mod snapshot;

pub use crate::domain::model::{ApiResponse, StudentRef};
pub use crate::domain::ports::{Clock, FixedClock, Storage, SystemClock};
pub use crate::utils::error::Result;
