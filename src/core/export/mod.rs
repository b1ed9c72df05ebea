//! Export orchestration
//!
//! This module provides the core export logic for vsweep, including:
//! - Timeout and exit-code policies
//! - Deterministic artifact naming and cleanup
//! - The single-unit export stage
//! - Per-server chunked orchestration
//! - Run coordination across servers
//! - Result and summary types

pub mod coordinator;
pub mod naming;
pub mod orchestrator;
pub mod policy;
pub mod stage;
pub mod summary;

pub use coordinator::RunCoordinator;
pub use orchestrator::ChunkedExportOrchestrator;
pub use policy::{ExitCodePolicy, TimeoutPolicy};
pub use stage::UnitExportStage;
pub use summary::{RunSummary, ServerExportResult, ServerStatus};
