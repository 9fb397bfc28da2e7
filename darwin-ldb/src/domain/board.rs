//! Top-level query results.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::wire::{FieldTable, child_list, map_fields, text_list};

use super::FromWire;
use super::service::{ServiceDetails, ServiceItem};

const STATION_BOARD_FIELDS: FieldTable = &[
    ("generated_at", "generatedAt"),
    ("crs", "crs"),
    ("location_name", "locationName"),
    ("platform_available", "platformAvailable"),
    ("are_services_available", "areServicesAvailable"),
];

const DEPARTURE_BOARD_FIELDS: FieldTable = &[
    ("generated_at", "generatedAt"),
    ("crs", "crs"),
    ("location_name", "locationName"),
];

const DEPARTURE_FIELDS: FieldTable = &[("crs", "crs")];

/// A station's departure and/or arrival board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationBoard {
    generated_at: Option<String>,
    crs: Option<String>,
    location_name: Option<String>,
    platform_available: Option<bool>,
    are_services_available: Option<bool>,
    train_services: Vec<ServiceItem>,
    bus_services: Vec<ServiceItem>,
    ferry_services: Vec<ServiceItem>,
    nrcc_messages: Vec<String>,
}

impl StationBoard {
    /// When Darwin generated the board, as sent.
    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    /// CRS code of the station the board is for.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Name of the station the board is for.
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// Whether the station shows platform numbers.
    pub fn platform_available(&self) -> Option<bool> {
        self.platform_available
    }

    /// False when disruption means services cannot be shown.
    pub fn are_services_available(&self) -> Option<bool> {
        self.are_services_available
    }

    pub fn train_services(&self) -> &[ServiceItem] {
        &self.train_services
    }

    pub fn bus_services(&self) -> &[ServiceItem] {
        &self.bus_services
    }

    pub fn ferry_services(&self) -> &[ServiceItem] {
        &self.ferry_services
    }

    /// Disruption messages for the station.
    ///
    /// These may contain HTML-like markup (paragraphs, hyperlinks, escaped
    /// entities) exactly as Darwin sent it.
    pub fn nrcc_messages(&self) -> &[String] {
        &self.nrcc_messages
    }
}

impl FromWire for StationBoard {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[STATION_BOARD_FIELDS]);
        Self {
            generated_at: fields.text("generated_at"),
            crs: fields.text("crs"),
            location_name: fields.text("location_name"),
            platform_available: fields.flag("platform_available"),
            are_services_available: fields.flag("are_services_available"),
            train_services: services(node, "trainServices"),
            bus_services: services(node, "busServices"),
            ferry_services: services(node, "ferryServices"),
            nrcc_messages: text_list(node, "nrccMessages", "message"),
        }
    }
}

impl fmt::Display for StationBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.crs.as_deref().unwrap_or_default(),
            self.location_name.as_deref().unwrap_or_default()
        )
    }
}

fn services(node: &Value, container: &str) -> Vec<ServiceItem> {
    child_list(node, container, "service")
        .into_iter()
        .map(ServiceItem::from_wire)
        .collect()
}

/// One row of a next/fastest departures board: the filter station it
/// answers for, and the service that gets there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure<S> {
    crs: Option<String>,
    service: S,
}

impl<S> Departure<S> {
    /// CRS code of the destination this row answers for.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: FromWire> FromWire for Departure<S> {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[DEPARTURE_FIELDS]);
        // A row without a service still gets one, with every field absent.
        let service = node.get("service").unwrap_or(&Value::Null);
        Self {
            crs: fields.text("crs"),
            service: S::from_wire(service),
        }
    }
}

/// Result of a next or fastest departures query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureBoard<S = ServiceItem> {
    generated_at: Option<String>,
    crs: Option<String>,
    location_name: Option<String>,
    departures: Vec<Departure<S>>,
}

/// Departures board whose rows carry calling points.
pub type DepartureBoardWithDetails = DepartureBoard<ServiceDetails>;

impl<S> DepartureBoard<S> {
    pub fn generated_at(&self) -> Option<&str> {
        self.generated_at.as_deref()
    }

    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// One row per requested destination, in the order Darwin returned them.
    pub fn departures(&self) -> &[Departure<S>] {
        &self.departures
    }
}

impl<S: FromWire> FromWire for DepartureBoard<S> {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[DEPARTURE_BOARD_FIELDS]);
        Self {
            generated_at: fields.text("generated_at"),
            crs: fields.text("crs"),
            location_name: fields.text("location_name"),
            departures: child_list(node, "departures", "destination")
                .into_iter()
                .map(Departure::from_wire)
                .collect(),
        }
    }
}
