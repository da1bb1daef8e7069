use std::path::PathBuf;
use thiserror::Error;

/// Process-level failures that precede any diagnostic: there is no source
/// text yet to attach a [`crate::CompilerError`] to, so these are reported
/// to the user directly and translated into a process exit code.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read entry file '{path}': {source}")]
    EntryFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
