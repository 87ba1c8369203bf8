// src/engine/handlers.rs

//! Filesystem action handlers.
//!
//! Each handler is a blocking function from resolved arguments to an
//! [`ExecutionResult`]. OS failures are caught and turned into failed
//! results naming the path; nothing here panics or propagates.

use std::fs;

use serde_json::json;

use crate::engine::error::{ExecutorError, IoOp};
use crate::engine::ExecutionResult;

/// Create `path` (truncating any existing file) and write `content` verbatim.
pub fn create_file_with_content(path: &str, content: &str) -> ExecutionResult {
    match fs::write(path, content.as_bytes()) {
        Ok(()) => ExecutionResult::ok(format!("File created: {path}"), json!({ "path": path })),
        Err(err) => ExecutorError::io(IoOp::CreateFile, path, &err).into(),
    }
}

/// Remove the file at `path`. An absent file is reported as a failure.
pub fn delete_file(path: &str) -> ExecutionResult {
    match fs::remove_file(path) {
        Ok(()) => ExecutionResult::ok(format!("File deleted: {path}"), json!({ "path": path })),
        Err(err) => ExecutorError::io(IoOp::Delete, path, &err).into(),
    }
}

/// List entry names at `path` in enumeration order.
///
/// `read_dir` never yields `.` or `..`. A failure on any single entry
/// fails the whole listing so no name is dropped silently. The same goes
/// for names that are not valid UTF-8: they cannot be carried in a JSON
/// string without loss, so the listing fails and names the entry.
pub fn list_directory(path: &str) -> ExecutionResult {
    match read_entry_names(path) {
        Ok(files) => ExecutionResult::ok(
            format!("Listed {} entries in {path}", files.len()),
            json!({ "path": path, "files": files }),
        ),
        Err(err) => err.into(),
    }
}

fn read_entry_names(path: &str) -> Result<Vec<String>, ExecutorError> {
    let entries = fs::read_dir(path).map_err(|e| ExecutorError::io(IoOp::OpenDirectory, path, &e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExecutorError::io(IoOp::ReadDirectory, path, &e))?;
        let name = entry.file_name();
        match name.into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                return Err(ExecutorError::NonUtf8Entry {
                    path: path.to_string(),
                    entry: format!("{raw:?}"),
                })
            }
        }
    }

    Ok(names)
}
