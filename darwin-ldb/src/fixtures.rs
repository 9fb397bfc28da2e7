//! Recorded Darwin responses shared by the unit tests.

use serde_json::Value;

fn parse(json: &str) -> Value {
    serde_json::from_str(json).expect("fixture is valid JSON")
}

/// Manchester Piccadilly departures, SOAP-shaped.
pub fn departure_board() -> Value {
    parse(include_str!("../data/fixtures/departure-board.json"))
}

/// London Paddington departures, REST-shaped.
pub fn rest_departure_board() -> Value {
    parse(include_str!("../data/fixtures/rest-departure-board.json"))
}

pub fn service_details() -> Value {
    parse(include_str!("../data/fixtures/service-details.json"))
}

/// A service that divides after the board location.
pub fn service_details_splits_after() -> Value {
    parse(include_str!("../data/fixtures/service-details-splits-after.json"))
}

pub fn next_departures() -> Value {
    parse(include_str!("../data/fixtures/next-departures.json"))
}

pub fn next_departures_with_details() -> Value {
    parse(include_str!("../data/fixtures/next-departures-with-details.json"))
}
