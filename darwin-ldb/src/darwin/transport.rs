//! The boundary with whatever carries requests to Darwin.

use std::fmt;

use serde_json::Value;

use super::error::TransportError;

/// Remote operations offered by the Darwin LDB service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetDepartureBoard,
    GetArrivalBoard,
    GetArrivalDepartureBoard,
    GetServiceDetails,
    GetNextDepartures,
    GetNextDeparturesWithDetails,
    GetFastestDepartures,
    GetFastestDeparturesWithDetails,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::GetDepartureBoard,
        Operation::GetArrivalBoard,
        Operation::GetArrivalDepartureBoard,
        Operation::GetServiceDetails,
        Operation::GetNextDepartures,
        Operation::GetNextDeparturesWithDetails,
        Operation::GetFastestDepartures,
        Operation::GetFastestDeparturesWithDetails,
    ];

    /// Name of the operation as the service knows it.
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetDepartureBoard => "GetDepartureBoard",
            Operation::GetArrivalBoard => "GetArrivalBoard",
            Operation::GetArrivalDepartureBoard => "GetArrivalDepartureBoard",
            Operation::GetServiceDetails => "GetServiceDetails",
            Operation::GetNextDepartures => "GetNextDepartures",
            Operation::GetNextDeparturesWithDetails => "GetNextDeparturesWithDetails",
            Operation::GetFastestDepartures => "GetFastestDepartures",
            Operation::GetFastestDeparturesWithDetails => "GetFastestDeparturesWithDetails",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Arguments that identify the resource rather than filter it, in
    /// order. The REST flavour of the service takes these in the URL path.
    pub fn path_args(self) -> &'static [&'static str] {
        match self {
            Operation::GetDepartureBoard
            | Operation::GetArrivalBoard
            | Operation::GetArrivalDepartureBoard => &["crs"],
            Operation::GetServiceDetails => &["serviceID"],
            Operation::GetNextDepartures
            | Operation::GetNextDeparturesWithDetails
            | Operation::GetFastestDepartures
            | Operation::GetFastestDeparturesWithDetails => &["crs", "filterList"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One invocation of a remote operation with keyword-style arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    operation: Operation,
    args: Vec<(&'static str, String)>,
}

impl RemoteCall {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            args: Vec::new(),
        }
    }

    /// Add an argument (`crs`, `numRows`, `filterCrs`, `filterType`,
    /// `serviceID`, `filterList`).
    pub fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn args(&self) -> &[(&'static str, String)] {
        &self.args
    }

    /// Value of the named argument, if given.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Something that can execute a [`RemoteCall`] and hand back the decoded
/// response tree.
///
/// Implementations report business-level rejections as
/// [`TransportError::Fault`]; the session turns those into
/// [`DarwinError::WebService`](super::DarwinError::WebService) and passes
/// everything else through untouched. Calls are issued one at a time, so
/// implementations need not be thread-safe.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn call(&self, call: &RemoteCall) -> Result<Value, TransportError>;
}
