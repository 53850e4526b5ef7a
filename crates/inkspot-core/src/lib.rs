pub mod config;
pub mod error;
pub mod safety;

pub use config::InkspotConfig;
pub use error::{InkspotError, Result};
