//! Farmer KYC Platform - client core
//!
//! Session handling, the KYC registration wizard and the backend client
//! shared by the command-line tool and embedding applications.

pub mod config;
pub mod donations;
pub mod error;
pub mod external;
pub mod session;
pub mod storage;
pub mod wizard;

mod guard;

pub use config::Config;
pub use donations::DonationFeed;
pub use error::{ClientError, ClientResult};
pub use external::{AuthApi, BackendClient, DonationApi, KycApi};
pub use session::{LoginInput, SessionStore};
pub use storage::FileStore;
pub use wizard::{RegistrationWizard, SubmissionReceipt};
