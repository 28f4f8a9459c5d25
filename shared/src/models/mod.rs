//! Domain models for the Farmer KYC Platform

mod donation;
mod identity;
mod registration;
mod session;

pub use donation::*;
pub use identity::*;
pub use registration::*;
pub use session::*;
