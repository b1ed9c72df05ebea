//! Core business logic for vsweep.
//!
//! # Modules
//!
//! - [`catalog`] - The exportable units and the fast catalog
//! - [`export`] - Unit stage, per-server orchestration and run coordination
//! - [`merge`] - Workbook primitives and the artifact merger
//!
//! # Export Workflow
//!
//! For every configured server:
//!
//! 1. **Resolve Credential**: Look the host/username pair up in the vault
//! 2. **Export Units**: Run the exporter once per catalog unit into an isolated
//!    parts directory, each with its own timeout
//! 3. **Classify**: Exit code 0 counts only if the artifact is on disk
//! 4. **Merge**: Combine successful artifacts, keeping one metadata sheet
//! 5. **Clean Up**: Remove intermediates by name pattern after a good merge
//! 6. **Report**: Hand the server result to the reporter
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vsweep::adapters::process::TokioProcessRunner;
//! use vsweep::adapters::reporting::create_reporter;
//! use vsweep::adapters::vault::create_vault;
//! use vsweep::config::load_config;
//! use vsweep::core::export::RunCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vsweep.toml")?;
//! let vault = create_vault(&config.vault)?;
//! let reporter = create_reporter(&config.reporting);
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = RunCoordinator::new(
//!     &config,
//!     Arc::from(vault),
//!     Arc::new(TokioProcessRunner::new()),
//!     Arc::new(reporter),
//!     shutdown_rx,
//! )?;
//! let summary = coordinator.run().await?;
//!
//! println!("{}", summary.render_text());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod export;
pub mod merge;
