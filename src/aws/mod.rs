//! AWS API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - SDK configuration and credential resolution
//! - [`client`] - AWS Config backed [`crate::resource::RegistryClient`]
//!
//! # Example
//!
//! ```ignore
//! use cfginv::aws::{AwsSettings, ConfigServiceRegistry};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let registry = ConfigServiceRegistry::connect(&AwsSettings::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;

pub use auth::AwsSettings;
pub use client::ConfigServiceRegistry;
