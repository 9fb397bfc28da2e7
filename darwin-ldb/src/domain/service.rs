//! Services as they appear on a board row or in full detail.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::wire::{FieldTable, MappedFields, child_list, map_fields};

use super::FromWire;
use super::location::{CallingPoint, CallingPointList, ServiceLocation};

/// Fields every service carries for the board location.
const SERVICE_TIME_FIELDS: FieldTable = &[
    ("sta", "sta"),
    ("eta", "eta"),
    ("std", "std"),
    ("etd", "etd"),
    ("platform", "platform"),
    ("operator_name", "operator"),
    ("operator_code", "operatorCode"),
];

const SERVICE_ITEM_FIELDS: FieldTable = &[
    ("length", "length"),
    ("is_circular_route", "isCircularRoute"),
    ("service_id", "serviceID"),
];

const SERVICE_DETAILS_FIELDS: FieldTable = &[
    ("is_cancelled", "isCancelled"),
    ("disruption_reason", "disruptionReason"),
    ("overdue_message", "overdueMessage"),
    ("ata", "ata"),
    ("atd", "atd"),
    ("location_name", "locationName"),
    ("crs", "crs"),
    ("length", "length"),
];

/// Times, platform and operator of a service at the board location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonServiceFields {
    sta: Option<String>,
    eta: Option<String>,
    std: Option<String>,
    etd: Option<String>,
    platform: Option<String>,
    operator_name: Option<String>,
    operator_code: Option<String>,
}

impl CommonServiceFields {
    fn from_fields(fields: &MappedFields) -> Self {
        Self {
            sta: fields.text("sta"),
            eta: fields.text("eta"),
            std: fields.text("std"),
            etd: fields.text("etd"),
            platform: fields.text("platform"),
            operator_name: fields.text("operator_name"),
            operator_code: fields.text("operator_code"),
        }
    }
}

/// Read access to the board-location times of a service.
///
/// All times are Darwin's display strings and may not be times at all
/// ("On time", "Delayed", "Cancelled").
pub trait ServiceTimes {
    fn common(&self) -> &CommonServiceFields;

    /// Scheduled time of arrival. Only arrival and arrival/departure boards
    /// carry it, and never at the origin.
    fn sta(&self) -> Option<&str> {
        self.common().sta.as_deref()
    }

    /// Estimated time of arrival. Only present alongside `sta`.
    fn eta(&self) -> Option<&str> {
        self.common().eta.as_deref()
    }

    /// Scheduled time of departure. Only departure and arrival/departure
    /// boards carry it, and never at the destination.
    fn std(&self) -> Option<&str> {
        self.common().std.as_deref()
    }

    /// Estimated time of departure. Only present alongside `std`.
    fn etd(&self) -> Option<&str> {
        self.common().etd.as_deref()
    }

    fn platform(&self) -> Option<&str> {
        self.common().platform.as_deref()
    }

    /// Name of the train operating company.
    fn operator_name(&self) -> Option<&str> {
        self.common().operator_name.as_deref()
    }

    /// ATOC code of the train operating company.
    fn operator_code(&self) -> Option<&str> {
        self.common().operator_code.as_deref()
    }
}

/// One service row on a station board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceItem {
    #[serde(flatten)]
    common: CommonServiceFields,
    length: Option<String>,
    is_circular_route: Option<bool>,
    service_id: Option<String>,
    origins: Vec<ServiceLocation>,
    destinations: Vec<ServiceLocation>,
}

impl ServiceItem {
    /// Train length in coaches.
    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }

    /// When true the service runs a circular route and will call at this
    /// location again later in its journey.
    pub fn is_circular_route(&self) -> Option<bool> {
        self.is_circular_route
    }

    /// Identifier of the service, valid only while it is on a board.
    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    /// Origins of the service. More than one when trains join en route.
    pub fn origins(&self) -> &[ServiceLocation] {
        &self.origins
    }

    /// Destinations of the service. More than one when the train divides.
    pub fn destinations(&self) -> &[ServiceLocation] {
        &self.destinations
    }

    /// Human readable origin(s), e.g. "Liverpool Lime Street".
    pub fn origin_text(&self) -> String {
        join_locations(&self.origins)
    }

    /// Human readable destination(s), e.g. "Edinburgh, Glasgow Central".
    pub fn destination_text(&self) -> String {
        join_locations(&self.destinations)
    }
}

impl ServiceTimes for ServiceItem {
    fn common(&self) -> &CommonServiceFields {
        &self.common
    }
}

impl FromWire for ServiceItem {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[SERVICE_TIME_FIELDS, SERVICE_ITEM_FIELDS]);
        Self {
            common: CommonServiceFields::from_fields(&fields),
            length: fields.text("length"),
            is_circular_route: fields.flag("is_circular_route"),
            service_id: fields.text("service_id"),
            origins: locations(node, "origin"),
            destinations: locations(node, "destination"),
        }
    }
}

impl fmt::Display for ServiceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service {}", self.service_id.as_deref().unwrap_or_default())
    }
}

fn locations(node: &Value, container: &str) -> Vec<ServiceLocation> {
    child_list(node, container, "location")
        .into_iter()
        .map(ServiceLocation::from_wire)
        .collect()
}

fn join_locations(locations: &[ServiceLocation]) -> String {
    locations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full detail of one service at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDetails {
    #[serde(flatten)]
    common: CommonServiceFields,
    is_cancelled: Option<bool>,
    disruption_reason: Option<String>,
    overdue_message: Option<String>,
    ata: Option<String>,
    atd: Option<String>,
    location_name: Option<String>,
    crs: Option<String>,
    length: Option<String>,
    previous_calling_point_lists: Vec<CallingPointList>,
    subsequent_calling_point_lists: Vec<CallingPointList>,
}

impl ServiceDetails {
    /// Whether the service is cancelled at this location.
    pub fn is_cancelled(&self) -> Option<bool> {
        self.is_cancelled
    }

    /// Cancellation reason if cancelled, otherwise a late-running reason.
    pub fn disruption_reason(&self) -> Option<&str> {
        self.disruption_reason.as_deref()
    }

    /// Description of a missed movement report.
    pub fn overdue_message(&self) -> Option<&str> {
        self.overdue_message.as_deref()
    }

    /// Actual time of arrival. Only present with `sta` and without `eta`.
    pub fn ata(&self) -> Option<&str> {
        self.ata.as_deref()
    }

    /// Actual time of departure. Only present with `std` and without `etd`.
    pub fn atd(&self) -> Option<&str> {
        self.atd.as_deref()
    }

    /// Name of the location these details are relative to.
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// CRS code of the location these details are relative to.
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }

    /// Calling points before this location, one list per origin.
    pub fn previous_calling_point_lists(&self) -> &[CallingPointList] {
        &self.previous_calling_point_lists
    }

    /// Calling points after this location, one list per destination.
    pub fn subsequent_calling_point_lists(&self) -> &[CallingPointList] {
        &self.subsequent_calling_point_lists
    }

    /// All previous calling points, list by list.
    pub fn previous_calling_points(&self) -> Vec<&CallingPoint> {
        flatten(&self.previous_calling_point_lists)
    }

    /// All subsequent calling points, list by list.
    pub fn subsequent_calling_points(&self) -> Vec<&CallingPoint> {
        flatten(&self.subsequent_calling_point_lists)
    }
}

impl ServiceTimes for ServiceDetails {
    fn common(&self) -> &CommonServiceFields {
        &self.common
    }
}

impl FromWire for ServiceDetails {
    fn from_wire(node: &Value) -> Self {
        let fields = map_fields(node, &[SERVICE_TIME_FIELDS, SERVICE_DETAILS_FIELDS]);
        Self {
            common: CommonServiceFields::from_fields(&fields),
            is_cancelled: fields.flag("is_cancelled"),
            disruption_reason: fields.text("disruption_reason"),
            overdue_message: fields.text("overdue_message"),
            ata: fields.text("ata"),
            atd: fields.text("atd"),
            location_name: fields.text("location_name"),
            crs: fields.text("crs"),
            length: fields.text("length"),
            previous_calling_point_lists: calling_point_lists(node, "previousCallingPoints"),
            subsequent_calling_point_lists: calling_point_lists(node, "subsequentCallingPoints"),
        }
    }
}

fn calling_point_lists(node: &Value, container: &str) -> Vec<CallingPointList> {
    child_list(node, container, "callingPointList")
        .into_iter()
        .map(CallingPointList::from_wire)
        .collect()
}

fn flatten(lists: &[CallingPointList]) -> Vec<&CallingPoint> {
    lists.iter().flat_map(CallingPointList::calling_points).collect()
}
