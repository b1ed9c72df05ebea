//! Exporter command line
//!
//! Builds the argument list the inventory exporter expects:
//! `-s <server> -u <user> -p <password> -c <selector> -d <dir> -f <file>`.
//! The password argument is marked sensitive so it never reaches the logs.

use crate::adapters::process::ProcessInvocation;
use crate::domain::{Credential, HostName};
use std::path::Path;

/// Server flag
pub const SERVER_FLAG: &str = "-s";
/// Username flag
pub const USER_FLAG: &str = "-u";
/// Password (plain or encrypted) flag
pub const PASSWORD_FLAG: &str = "-p";
/// Export selector flag
pub const COMMAND_FLAG: &str = "-c";
/// Output directory flag
pub const DIRECTORY_FLAG: &str = "-d";
/// Output file name flag
pub const FILE_FLAG: &str = "-f";

/// Everything needed to export one selector from one server
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// vCenter to connect to
    pub server: &'a HostName,
    /// Login credential
    pub credential: &'a Credential,
    /// Exporter selector (e.g. `ExportvInfo2xlsx`)
    pub selector: &'a str,
    /// Directory the exporter writes into
    pub output_dir: &'a Path,
    /// File name the exporter writes
    pub file_name: &'a str,
}

/// Builds the exporter invocation for a request
pub fn build_invocation(executable: &Path, request: &ExportRequest<'_>) -> ProcessInvocation {
    ProcessInvocation::new(executable)
        .arg(SERVER_FLAG)
        .arg(request.server.as_str())
        .arg(USER_FLAG)
        .arg(request.credential.username.as_str())
        .arg(PASSWORD_FLAG)
        .sensitive_arg(request.credential.expose())
        .arg(COMMAND_FLAG)
        .arg(request.selector)
        .arg(DIRECTORY_FLAG)
        .arg(request.output_dir.display().to_string())
        .arg(FILE_FLAG)
        .arg(request.file_name)
}
