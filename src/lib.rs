//! Browser-automation engine for insurer-portal eligibility verification.
//!
//! No public API exists for the supported insurers, so eligibility is
//! verified by driving a headless browser through each portal's UI,
//! scraping the rendered result page and normalizing it into a canonical
//! record. The clinic web application calls
//! [`EligibilityService::verify`] with portal credentials and a patient
//! query, and receives back an [`EligibilityResult`] or a typed
//! [`EligibilityError`]. Persistence, credentials storage and the web
//! frontend live outside this crate.

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::EligibilityError;
pub use models::{
    Credential, EligibilityQuery, EligibilityResult, EligibilityStatus, MemberPolicyDetails,
    RunStatus,
};
pub use providers::{EligibilityProvider, ProviderRegistry};
pub use services::{EligibilityService, RetryPolicy};
