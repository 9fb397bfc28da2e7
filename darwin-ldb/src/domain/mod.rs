//! Entities built from Darwin responses.
//!
//! Every entity is an immutable snapshot of one wire node. Scalar fields are
//! `None` when the wire left them out, which is distinct from an empty
//! string. Collections are always vectors, empty when the wire had none, so
//! callers can iterate without checking.

mod board;
mod location;
mod service;

use serde_json::Value;

pub use board::{Departure, DepartureBoard, DepartureBoardWithDetails, StationBoard};
pub use location::{CallingPoint, CallingPointList, ServiceLocation};
pub use service::{CommonServiceFields, ServiceDetails, ServiceItem, ServiceTimes};

/// Construction from one node of a wire response.
///
/// Infallible: absence is routine in Darwin responses, so missing fields
/// become `None` and missing lists become empty. A text field holding an
/// object or array is also `None`.
pub trait FromWire: Sized {
    fn from_wire(node: &Value) -> Self;
}
