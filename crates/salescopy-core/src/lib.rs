//! Shared data model and configuration for the salescopy workspace.
//!
//! Every stage of the copy pipeline produces one of the entities defined
//! here. They are plain serde structs: built once from a model response and
//! never mutated afterwards.

pub mod app_config;
pub mod channel;
pub mod config;
pub mod error;
mod lenient;
pub mod product;
pub mod provider;
pub mod records;

pub use app_config::{AppConfig, ProviderEndpoint, ProviderKeys};
pub use channel::SalesChannel;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use product::{AdaptedCopy, Copy, ProductInfo, SalesAngle};
pub use provider::ProviderKind;
pub use records::{ProfitRecord, SpendRecord};
