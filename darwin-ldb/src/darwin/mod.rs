//! Darwin LDB (Live Departure Boards) client.
//!
//! A [`Session`] turns board and service queries into remote calls, sends
//! them through a [`Transport`] and wraps the responses in the entities of
//! [`crate::domain`].
//!
//! Key characteristics of Darwin:
//! - Service IDs are **ephemeral** - only valid while the service appears
//!   on a departure board (~2 minutes after expected departure)
//! - Times are display strings ("11:57", "On time", "Delayed") and are
//!   passed through as sent
//! - Business-level rejections (unknown station, expired service ID) come
//!   back as service faults

mod client;
mod config;
mod error;
mod mock;
mod session;
mod transport;

pub use client::HttpTransport;
pub use config::{API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DarwinConfig, ENDPOINT_ENV};
pub use error::{DarwinError, TransportError};
pub use mock::MockTransport;
pub use session::{BoardQuery, Session};
pub use transport::{Operation, RemoteCall, Transport};
