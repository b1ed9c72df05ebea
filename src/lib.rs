// vsweep - Chunked vCenter inventory export
// Copyright (c) 2025 vsweep Contributors
// Licensed under the MIT License

//! # vsweep - Chunked vCenter inventory export
//!
//! vsweep drives an external inventory exporter against a list of vCenter
//! servers. Instead of one long all-in-one export per server, each server is
//! exported unit by unit (one workbook per inventory category) and the unit
//! workbooks are merged into a single workbook afterwards.
//!
//! ## Overview
//!
//! - **Catalog**: the ordered list of exportable units, with a reduced fast mode
//! - **Stage**: one exporter invocation per unit, with a per-unit timeout
//! - **Merge**: unit workbooks combined, the shared metadata sheet kept once
//! - **Coordinator**: servers processed in order, credentials from a vault
//!
//! A unit failure never stops the server and a server failure never stops the
//! run. Every server ends up with a [`core::export::ServerExportResult`].
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Unit catalog, export pipeline and workbook merging
//! - [`adapters`] - Exporter process, credential vaults and result reporting
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::watch;
//! use vsweep::adapters::process::TokioProcessRunner;
//! use vsweep::adapters::reporting::create_reporter;
//! use vsweep::adapters::vault::create_vault;
//! use vsweep::config::load_config;
//! use vsweep::core::export::RunCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vsweep.toml")?;
//! let vault = create_vault(&config.vault)?;
//! let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//! let coordinator = RunCoordinator::new(
//!     &config,
//!     Arc::from(vault),
//!     Arc::new(TokioProcessRunner::new()),
//!     Arc::new(create_reporter(&config.reporting)),
//!     shutdown_rx,
//! )?;
//!
//! let summary = coordinator.run().await?;
//! println!("{}", summary.render_text());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Setup problems surface as [`domain::VsweepError`]. Export problems are
//! recorded as [`domain::UnitOutcome`] values and never abort the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
