//! Places a service calls at.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::wire::{FieldTable, list_field, map_fields};

use super::FromWire;

const SERVICE_LOCATION_FIELDS: FieldTable = &[
    ("location_name", "locationName"),
    ("crs", "crs"),
    ("via", "via"),
    ("future_change_to", "futureChangeTo"),
];

const CALLING_POINT_FIELDS: FieldTable = &[
    ("location_name", "locationName"),
    ("crs", "crs"),
    ("st", "st"),
    ("et", "et"),
    ("at", "at"),
    ("length", "length"),
];

const CALLING_POINT_LIST_FIELDS: FieldTable = &[
    ("service_type", "serviceType"),
    ("service_change_required", "serviceChangeRequired"),
    ("association_is_cancelled", "assocIsCancelled"),
];

/// One origin or destination of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceLocation {
    location_name: Option<String>,
    crs: Option<String>,
    via: Option<String>,
    future_change_to: Option<String>,
}

impl ServiceLocation {
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// CRS code. `???` means Darwin knows no code for this location.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Text to show after the name to disambiguate the route, e.g.
    /// "via Bristol Parkway". Only destinations carry one.
    pub fn via(&self) -> Option<&str> {
        self.via.as_deref()
    }

    /// Service type (train, bus, ferry) this location will change to.
    pub fn future_change_to(&self) -> Option<&str> {
        self.future_change_to.as_deref()
    }
}

impl FromWire for ServiceLocation {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[SERVICE_LOCATION_FIELDS]);
        Self {
            location_name: fields.text("location_name"),
            crs: fields.text("crs"),
            via: fields.text("via"),
            future_change_to: fields.text("future_change_to"),
        }
    }
}

/// "name via" when a via text is present, otherwise just the name.
impl fmt::Display for ServiceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.location_name.as_deref().unwrap_or_default();
        match self.via.as_deref() {
            Some(via) if !via.is_empty() => write!(f, "{name} {via}"),
            _ => f.write_str(name),
        }
    }
}

/// A single stop on a route.
///
/// The times are Darwin's display strings ("10:25", "On time", "Delayed"),
/// not parsed times. Whether they refer to arrival or departure depends on
/// which list the point came from: arrivals for previous calling points,
/// departures for subsequent ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallingPoint {
    location_name: Option<String>,
    crs: Option<String>,
    st: Option<String>,
    et: Option<String>,
    at: Option<String>,
    length: Option<String>,
}

impl CallingPoint {
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Scheduled time.
    pub fn st(&self) -> Option<&str> {
        self.st.as_deref()
    }

    /// Estimated time. Present only while no actual time is known.
    pub fn et(&self) -> Option<&str> {
        self.et.as_deref()
    }

    /// Actual time. Present only once the train has called.
    pub fn at(&self) -> Option<&str> {
        self.at.as_deref()
    }

    /// Train length in coaches at this stop.
    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }
}

impl FromWire for CallingPoint {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[CALLING_POINT_FIELDS]);
        Self {
            location_name: fields.text("location_name"),
            crs: fields.text("crs"),
            st: fields.text("st"),
            et: fields.text("et"),
            at: fields.text("at"),
            length: fields.text("length"),
        }
    }
}

/// One run of calling points.
///
/// A through service has a single list. Services that join or divide have
/// one list per portion, the first being the main train.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallingPointList {
    service_type: Option<String>,
    service_change_required: Option<bool>,
    association_is_cancelled: Option<bool>,
    calling_points: Vec<CallingPoint>,
}

impl CallingPointList {
    /// Type of service (train, bus, ferry) for this portion.
    pub fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    /// Whether passengers must change to reach this portion.
    pub fn service_change_required(&self) -> Option<bool> {
        self.service_change_required
    }

    /// Whether the join/divide association for this portion is cancelled.
    pub fn association_is_cancelled(&self) -> Option<bool> {
        self.association_is_cancelled
    }

    pub fn calling_points(&self) -> &[CallingPoint] {
        &self.calling_points
    }
}

impl FromWire for CallingPointList {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[CALLING_POINT_LIST_FIELDS]);
        Self {
            service_type: fields.text("service_type"),
            service_change_required: fields.flag("service_change_required"),
            association_is_cancelled: fields.flag("association_is_cancelled"),
            calling_points: list_field(node, "callingPoint")
                .into_iter()
                .map(CallingPoint::from_wire)
                .collect(),
        }
    }
}
