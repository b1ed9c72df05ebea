//! External system integrations for vsweep.
//!
//! This module provides adapters for the collaborators around the export core:
//!
//! - [`process`] - Launching the exporter with a hard timeout
//! - [`exporter`] - The exporter's command line
//! - [`vault`] - Read-only credential sources (file, environment, memory)
//! - [`reporting`] - Result reporters (log, console, JSON file)
//!
//! # Design Pattern
//!
//! Each collaborator sits behind a trait ([`process::ProcessRunner`],
//! [`vault::CredentialVault`], [`reporting::ResultReporter`]) so the core can
//! be driven by fakes in tests.

pub mod exporter;
pub mod process;
pub mod reporting;
pub mod vault;
