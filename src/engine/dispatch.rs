// src/engine/dispatch.rs

//! Action dispatch.
//!
//! Turns a complete request body into an [`ExecutionResult`]:
//! parse JSON, validate `action`, resolve arguments against the configured
//! defaults, run the handler. Input errors never reach a handler, so a
//! rejected request has no side effects.

use serde_json::Value;

use crate::config::{Config, Defaults};
use crate::engine::events::{request_received, ExecutionEvent, ExecutionEventKind};
use crate::engine::handlers;
use crate::engine::launcher::Launcher;
use crate::engine::sink::EventSink;
use crate::engine::{AssembledBody, ExecutionResult, ExecutorError};
use crate::execution_id::ExecutionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateFile,
    DeleteFile,
    ListDirectory,
    OpenApplication,
}

/// One accepted `action` value: its wire name, the handler it selects and
/// where its arguments come from when the request omits them.
pub struct DispatchEntry {
    pub name: &'static str,
    pub action: Action,
    /// Configured fallback for `path` (for `open_application`, the app name).
    pub default_path: fn(&Defaults) -> Option<&str>,
    /// Configured fallback for `content`; `None` for actions that take none.
    pub default_content: fn(&Defaults) -> Option<&str>,
}

fn no_default(_: &Defaults) -> Option<&str> {
    None
}

/// The closed set of accepted `action` values.
const DISPATCH_TABLE: &[DispatchEntry] = &[
    DispatchEntry {
        name: "create_file",
        action: Action::CreateFile,
        default_path: |d| Some(d.create_file_path.as_str()),
        default_content: |d| Some(d.create_file_content.as_str()),
    },
    DispatchEntry {
        name: "delete_file",
        action: Action::DeleteFile,
        default_path: |d| Some(d.delete_file_path.as_str()),
        default_content: no_default,
    },
    DispatchEntry {
        name: "list_directory",
        action: Action::ListDirectory,
        default_path: |d| Some(d.list_directory_path.as_str()),
        default_content: no_default,
    },
    DispatchEntry {
        name: "open_application",
        action: Action::OpenApplication,
        default_path: |d| d.application.as_deref(),
        default_content: no_default,
    },
];

impl DispatchEntry {
    pub fn lookup(name: &str) -> Option<&'static DispatchEntry> {
        DISPATCH_TABLE.iter().find(|entry| entry.name == name)
    }
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::CreateFile => "create_file",
            Action::DeleteFile => "delete_file",
            Action::ListDirectory => "list_directory",
            Action::OpenApplication => "open_application",
        }
    }
}

/* ---------------- request model ---------------- */

/// Decoded `/execute` body.
///
/// `path`, `content` and `app` are `None` when absent or not strings; the
/// dispatcher then falls back to configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: String,
    pub path: Option<String>,
    pub content: Option<String>,
    /// Application name for `open_application`; `path` is accepted too.
    pub app: Option<String>,
}

impl ActionRequest {
    pub fn parse(body: &[u8]) -> Result<Self, ExecutorError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ExecutorError::InvalidJson)?;

        let action = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ExecutorError::MissingAction)?;

        Ok(Self {
            action: action.to_string(),
            path: string_field(&value, "path"),
            content: string_field(&value, "content"),
            app: string_field(&value, "app"),
        })
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/* ---------------- dispatcher ---------------- */

#[derive(Debug, Clone)]
pub struct Dispatcher {
    defaults: Defaults,
    launcher: Launcher,
    max_message_chars: usize,
}

impl Dispatcher {
    pub fn new(defaults: Defaults, launcher: Launcher, max_message_chars: usize) -> Self {
        Self {
            defaults,
            launcher,
            max_message_chars,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.defaults.clone(),
            Launcher::from_config(&cfg.launcher, cfg.limits.launch_timeout()),
            cfg.limits.max_message_chars,
        )
    }

    /// Dispatch an assembled body. Truncated bodies are rejected unparsed.
    pub async fn dispatch_body(
        &self,
        body: AssembledBody,
        execution_id: &ExecutionId,
        sink: &mut dyn EventSink,
    ) -> ExecutionResult {
        sink.emit(request_received(execution_id));

        match body.into_bytes() {
            Ok(bytes) => self.run(&bytes, execution_id, sink).await,
            Err(err) => self.reject(err, execution_id, sink),
        }
    }

    /// Reject a request whose body could not be read at all.
    pub fn reject_unread(
        &self,
        err: ExecutorError,
        execution_id: &ExecutionId,
        sink: &mut dyn EventSink,
    ) -> ExecutionResult {
        sink.emit(request_received(execution_id));
        self.reject(err, execution_id, sink)
    }

    async fn run(
        &self,
        body: &[u8],
        execution_id: &ExecutionId,
        sink: &mut dyn EventSink,
    ) -> ExecutionResult {
        let request = match ActionRequest::parse(body) {
            Ok(request) => request,
            Err(err) => return self.reject(err, execution_id, sink),
        };

        let Some(entry) = DispatchEntry::lookup(&request.action) else {
            let err = ExecutorError::UnknownAction(request.action);
            return self.reject(err, execution_id, sink);
        };
        let action = entry.action;

        sink.emit(
            ExecutionEvent::new(execution_id, ExecutionEventKind::ActionStarted)
                .with_action(action.name()),
        );

        let result = self.execute(entry, request).await.bounded(self.max_message_chars);

        let kind = if result.success {
            ExecutionEventKind::ActionSucceeded
        } else {
            ExecutionEventKind::ActionFailed
        };
        sink.emit(
            ExecutionEvent::new(execution_id, kind)
                .with_action(action.name())
                .with_detail(result.message.clone()),
        );

        result
    }

    /// Resolve arguments for `entry` and run its handler.
    pub async fn execute(&self, entry: &DispatchEntry, request: ActionRequest) -> ExecutionResult {
        let action = entry.action;
        let path = request
            .path
            .or_else(|| (entry.default_path)(&self.defaults).map(str::to_string));

        match action {
            Action::CreateFile => {
                let Some(path) = path else {
                    return ExecutorError::MissingArgument("path").into();
                };
                let content = request
                    .content
                    .or_else(|| (entry.default_content)(&self.defaults).map(str::to_string))
                    .unwrap_or_default();
                run_blocking(action, move || handlers::create_file_with_content(&path, &content)).await
            }
            Action::DeleteFile => match path {
                Some(path) => run_blocking(action, move || handlers::delete_file(&path)).await,
                None => ExecutorError::MissingArgument("path").into(),
            },
            Action::ListDirectory => match path {
                Some(path) => run_blocking(action, move || handlers::list_directory(&path)).await,
                None => ExecutorError::MissingArgument("path").into(),
            },
            Action::OpenApplication => match request.app.or(path) {
                Some(app) => self.launcher.open_application(&app).await,
                None => ExecutorError::MissingArgument("app").into(),
            },
        }
    }

    fn reject(
        &self,
        err: ExecutorError,
        execution_id: &ExecutionId,
        sink: &mut dyn EventSink,
    ) -> ExecutionResult {
        sink.emit(
            ExecutionEvent::new(execution_id, ExecutionEventKind::RequestRejected)
                .with_detail(err.code()),
        );
        ExecutionResult::from(err).bounded(self.max_message_chars)
    }
}

/// Run a filesystem handler on the blocking pool.
async fn run_blocking<F>(action: Action, handler: F) -> ExecutionResult
where
    F: FnOnce() -> ExecutionResult + Send + 'static,
{
    match tokio::task::spawn_blocking(handler).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(action = action.name(), error = %err, "handler task failed");
            ExecutorError::Internal(action.name()).into()
        }
    }
}
