//! cfginv - inventory dump for AWS Config
//!
//! Lists the resources AWS Config has discovered, type by type, and fetches
//! their configuration items in batches of at most 20 using a fixed pool of
//! concurrent workers.

pub mod aws;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod resource;
