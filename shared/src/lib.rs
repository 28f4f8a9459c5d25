//! Shared types and models for the Farmer KYC Platform
//!
//! This crate contains types shared between the native client, the browser
//! bindings (via WASM), and the backend wire format.

pub mod models;
pub mod storage;
pub mod types;
pub mod validation;

pub use models::*;
pub use storage::*;
pub use types::*;
pub use validation::*;
