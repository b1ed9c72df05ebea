//! Domain models and types for vsweep.
//!
//! The domain layer provides:
//! - **Identifiers** ([`HostName`])
//! - **Export targets** ([`ServerTarget`], [`UnitMode`])
//! - **Units and outcomes** ([`ExportUnit`], [`UnitOutcome`], [`FailureCategory`])
//! - **Credentials** ([`Credential`])
//! - **Error types** ([`VsweepError`], [`VaultError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! Setup failures are errors; export failures are values:
//!
//! ```rust
//! use vsweep::domain::{FailureCategory, Result, VsweepError};
//!
//! fn load() -> Result<()> {
//!     Err(VsweepError::Configuration("no servers configured".to_string()))
//! }
//!
//! assert!(load().is_err());
//! assert_eq!(FailureCategory::Timeout.label(), "timeout");
//! ```

pub mod credential;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod result;
pub mod server;
pub mod unit;

pub use credential::Credential;
pub use errors::{VaultError, VsweepError};
pub use ids::HostName;
pub use outcome::{FailureCategory, UnitOutcome};
pub use result::Result;
pub use server::{ServerTarget, UnitMode};
pub use unit::{ExportUnit, TimeoutClass};
