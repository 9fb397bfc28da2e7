//! Darwin LDB HTTP transport.
//!
//! Speaks the JSON REST flavour of the service: each operation is a GET on
//! `{endpoint}/api/20220120/{Operation}/{path args..}` with the remaining
//! arguments as query parameters, authenticated with an `x-apikey` header.

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::config::DarwinConfig;
use super::error::{DarwinError, TransportError};
use super::transport::{RemoteCall, Transport};

/// API version segment of the REST paths.
const API_PATH: [&str; 2] = ["api", "20220120"];

/// How much of an undecodable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// HTTP transport for the Darwin LDB web service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport from a resolved configuration.
    ///
    /// The access credential is attached to every request; the timeout is a
    /// hard bound on each call.
    pub fn new(config: &DarwinConfig) -> Result<Self, DarwinError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            DarwinError::Configuration(format!("invalid endpoint {}: {e}", config.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(DarwinError::Configuration(format!(
                "endpoint {} cannot carry a path",
                config.endpoint
            )));
        }

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            DarwinError::Configuration("access credential is not a valid header value".into())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-apikey"), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { http, endpoint })
    }

    /// URL for a call, with path arguments percent-encoded as segments.
    /// Service IDs routinely contain `/`.
    fn url_for(&self, call: &RemoteCall) -> Result<Url, TransportError> {
        let operation = call.operation();
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| TransportError::Request("endpoint cannot carry a path".into()))?;
            segments.pop_if_empty().extend(API_PATH).push(operation.name());
            for name in operation.path_args() {
                let value = call.get(name).ok_or_else(|| {
                    TransportError::Request(format!("{operation} requires argument {name}"))
                })?;
                segments.push(value);
            }
        }
        Ok(url)
    }

    fn query_for(call: &RemoteCall) -> Vec<(&'static str, &str)> {
        let path_args = call.operation().path_args();
        call.args()
            .iter()
            .filter(|(name, _)| !path_args.contains(name))
            .map(|(name, value)| (*name, value.as_str()))
            .collect()
    }
}

impl Transport for HttpTransport {
    async fn call(&self, call: &RemoteCall) -> Result<Value, TransportError> {
        let url = self.url_for(call)?;
        let query = Self::query_for(call);
        debug!(operation = %call.operation(), %url, ?query, "calling Darwin");

        let response = self.http.get(url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Fault {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        // Darwin answers expired service IDs with an empty document
        if body.trim().is_empty() || body.trim() == "null" {
            return Err(TransportError::Fault {
                status: status.as_u16(),
                message: format!("{} returned no data", call.operation()),
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::transport::Operation;

    fn transport(endpoint: &str) -> HttpTransport {
        HttpTransport::new(&DarwinConfig::new(endpoint, "test-key")).unwrap()
    }

    #[test]
    fn client_creation() {
        assert!(HttpTransport::new(&DarwinConfig::new("https://example.com/LDBWS", "k")).is_ok());
    }

    #[test]
    fn rejects_unusable_endpoints() {
        for endpoint in ["not a url", "mailto:darwin@example.com"] {
            let err = HttpTransport::new(&DarwinConfig::new(endpoint, "k")).unwrap_err();
            assert!(matches!(err, DarwinError::Configuration(_)), "{endpoint}");
        }
    }

    #[test]
    fn rejects_unsendable_credential() {
        let err = HttpTransport::new(&DarwinConfig::new("https://example.com", "bad\nkey"))
            .unwrap_err();
        assert!(matches!(err, DarwinError::Configuration(_)));
    }

    #[test]
    fn board_url_and_query() {
        let transport = transport("https://example.com/LDBWS/");
        let call = RemoteCall::new(Operation::GetDepartureBoard)
            .arg("crs", "MAN")
            .arg("numRows", "10")
            .arg("filterCrs", "HUD")
            .arg("filterType", "to");

        let url = transport.url_for(&call).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/LDBWS/api/20220120/GetDepartureBoard/MAN"
        );
        assert_eq!(
            HttpTransport::query_for(&call),
            [("numRows", "10"), ("filterCrs", "HUD"), ("filterType", "to")]
        );
    }

    #[test]
    fn service_id_is_one_encoded_segment() {
        let transport = transport("https://example.com/LDBWS");
        let call =
            RemoteCall::new(Operation::GetServiceDetails).arg("serviceID", "EFpoyguzo/xLlJw80uW6eA==");

        let url = transport.url_for(&call).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/LDBWS/api/20220120/GetServiceDetails/EFpoyguzo%2FxLlJw80uW6eA=="
        );
        assert!(HttpTransport::query_for(&call).is_empty());
    }

    #[test]
    fn next_departures_take_filter_list_in_path() {
        let transport = transport("https://example.com/LDBWS");
        let call = RemoteCall::new(Operation::GetNextDepartures)
            .arg("crs", "ECR")
            .arg("filterList", "CLJ,LBG");

        let url = transport.url_for(&call).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/LDBWS/api/20220120/GetNextDepartures/ECR/CLJ,LBG"
        );
    }

    #[test]
    fn missing_path_argument_is_a_request_error() {
        let transport = transport("https://example.com/LDBWS");
        let call = RemoteCall::new(Operation::GetArrivalBoard).arg("numRows", "5");

        assert!(matches!(
            transport.url_for(&call),
            Err(TransportError::Request(_))
        ));
    }

    // Calls against the live service need a real API key and network access,
    // so they are left to manual runs of the binary.
}
