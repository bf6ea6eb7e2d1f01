//! External typesetting-engine invocation

use std::process::Command;

use crate::error::Error;

/// Run the external `bibtex` pass on a document basename and surface its
/// exit code unmodified
pub fn run_bibtex(basename: &str) -> Result<i32, Error> {
    tracing::info!("running bibtex {basename}");
    let status = Command::new("bibtex")
        .arg(basename)
        .status()
        .map_err(|source| Error::Engine {
            command: format!("bibtex {basename}"),
            source,
        })?;
    Ok(status.code().unwrap_or(-1))
}
