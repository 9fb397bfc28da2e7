//! Client for the National Rail Darwin Live Departure Boards web service.
//!
//! Fetches station boards and service details and maps Darwin's loosely
//! structured responses onto a small, strongly typed domain model.

pub mod darwin;
pub mod domain;
pub mod render;
pub mod wire;

#[cfg(test)]
mod fixtures;
