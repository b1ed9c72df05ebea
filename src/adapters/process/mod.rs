//! External process execution
//!
//! [`ProcessRunner`] is the seam between the export engine and the operating
//! system. Production code uses [`TokioProcessRunner`]; tests substitute a
//! scripted runner that writes workbooks instead of launching anything.

pub mod runner;

pub use runner::{ProcessExit, ProcessInvocation, ProcessRunner, TokioProcessRunner};
