//! Mock Darwin transport for testing without API access.
//!
//! Serves canned responses per operation and records every call it
//! receives, so tests can check what would have gone over the wire.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::error::TransportError;
use super::transport::{Operation, RemoteCall, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Response(Value),
    Fault(String),
}

/// Transport double answering from memory.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: HashMap<Operation, Reply>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with `response`.
    pub fn with_response(mut self, operation: Operation, response: Value) -> Self {
        self.replies.insert(operation, Reply::Response(response));
        self
    }

    /// Answer `operation` with a service fault.
    pub fn with_fault(mut self, operation: Operation, message: impl Into<String>) -> Self {
        self.replies.insert(operation, Reply::Fault(message.into()));
        self
    }

    /// Load canned responses from a directory.
    ///
    /// Expects files named after the operation they answer, e.g.
    /// `GetDepartureBoard.json`. Other files are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TransportError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            TransportError::Mock(format!("failed to read mock directory {}: {e}", dir.display()))
        })?;

        let mut mock = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|e| TransportError::Mock(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(operation) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Operation::from_name)
            else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| {
                TransportError::Mock(format!("failed to read {}: {e}", path.display()))
            })?;
            let response = serde_json::from_str(&json).map_err(|e| {
                TransportError::Mock(format!("failed to parse {}: {e}", path.display()))
            })?;
            mock = mock.with_response(operation, response);
        }

        if mock.replies.is_empty() {
            return Err(TransportError::Mock(format!(
                "no operation files found in {}",
                dir.display()
            )));
        }
        Ok(mock)
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn was_called(&self) -> bool {
        !self.calls().is_empty()
    }
}

impl Transport for MockTransport {
    async fn call(&self, call: &RemoteCall) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());

        match self.replies.get(&call.operation()) {
            Some(Reply::Response(value)) => Ok(value.clone()),
            Some(Reply::Fault(message)) => Err(TransportError::Fault {
                status: 500,
                message: message.clone(),
            }),
            None => Err(TransportError::Fault {
                status: 404,
                message: format!("no mock response for {}", call.operation()),
            }),
        }
    }
}
