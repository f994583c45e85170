//! JSON export of the submission body.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use call_concurrency_core::ResultsSubmission;

use crate::error::ServiceError;

/// Write `submission` exactly as it would be posted, pretty-printed.
///
/// Missing parent directories are created.
pub fn write_submission_json(
    submission: &ResultsSubmission,
    path: impl AsRef<Path>,
) -> Result<(), ServiceError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, submission)?;
    writer.flush()?;
    Ok(())
}
