//! Field extraction from schema-less wire responses.
//!
//! Darwin responses arrive as a loosely structured tree in which any field
//! may be missing. Entities describe the fields they want as static tables
//! of `(internal, wire)` name pairs and pull them out with [`map_fields`].
//! A missing field maps to `None`, never to an error, and a missing list
//! maps to an empty list.
//!
//! The same service is offered as a SOAP feed and as a JSON REST feed, which
//! nest lists differently (`trainServices.service[]` versus
//! `trainServices[]`). [`child_list`] accepts both.

mod fields;
mod lists;

pub use fields::{FieldTable, MappedFields, map_fields};
pub use lists::{child_list, list_field, text_list};
