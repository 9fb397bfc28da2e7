//! Query orchestration over a transport.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    DepartureBoard, DepartureBoardWithDetails, FromWire, ServiceDetails, StationBoard,
};

use super::client::HttpTransport;
use super::config::DarwinConfig;
use super::error::DarwinError;
use super::transport::{Operation, RemoteCall, Transport};

/// Rows requested when the caller does not say.
const DEFAULT_ROWS: u16 = 10;

/// Parameters of a station board query.
///
/// Defaults to the next ten departures, unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    crs: String,
    rows: u16,
    include_departures: bool,
    include_arrivals: bool,
    destination_crs: Option<String>,
    origin_crs: Option<String>,
}

impl BoardQuery {
    /// Query the board for the station with this CRS code.
    pub fn new(crs: impl Into<String>) -> Self {
        Self {
            crs: crs.into(),
            rows: DEFAULT_ROWS,
            include_departures: true,
            include_arrivals: false,
            destination_crs: None,
            origin_crs: None,
        }
    }

    /// Set the maximum number of services returned.
    pub fn rows(mut self, rows: u16) -> Self {
        self.rows = rows;
        self
    }

    pub fn departures(mut self, include: bool) -> Self {
        self.include_departures = include;
        self
    }

    pub fn arrivals(mut self, include: bool) -> Self {
        self.include_arrivals = include;
        self
    }

    /// Only include services that call at `crs` after this station.
    ///
    /// A blank `crs` leaves the query unfiltered.
    pub fn destination(mut self, crs: impl Into<String>) -> Self {
        self.destination_crs = filter_crs(crs.into());
        self
    }

    /// Only include services that called at `crs` before this station.
    ///
    /// A blank `crs` leaves the query unfiltered.
    pub fn origin(mut self, crs: impl Into<String>) -> Self {
        self.origin_crs = filter_crs(crs.into());
        self
    }

    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub fn is_arrivals_only(&self) -> bool {
        self.include_arrivals && !self.include_departures
    }

    fn operation(&self) -> Result<Operation, DarwinError> {
        match (self.include_departures, self.include_arrivals) {
            (true, true) => Ok(Operation::GetArrivalDepartureBoard),
            (true, false) => Ok(Operation::GetDepartureBoard),
            (false, true) => Ok(Operation::GetArrivalBoard),
            (false, false) => Err(DarwinError::InvalidArgument(
                "a station board must include departures, arrivals or both".into(),
            )),
        }
    }

    /// Only one filter can be sent; the destination filter takes precedence.
    fn remote_call(&self) -> Result<RemoteCall, DarwinError> {
        let call = RemoteCall::new(self.operation()?)
            .arg("crs", self.crs.as_str())
            .arg("numRows", self.rows.to_string());

        let call = match (&self.destination_crs, &self.origin_crs) {
            (Some(destination), origin) => {
                if let Some(origin) = origin {
                    warn!(
                        %destination,
                        %origin,
                        "board queries filter on one station only, using destination"
                    );
                }
                call.arg("filterCrs", destination.as_str()).arg("filterType", "to")
            }
            (None, Some(origin)) => call.arg("filterCrs", origin.as_str()).arg("filterType", "from"),
            (None, None) => call,
        };
        Ok(call)
    }
}

fn filter_crs(crs: String) -> Option<String> {
    let crs = crs.trim();
    (!crs.is_empty()).then(|| crs.to_string())
}

/// A session with the Darwin LDB web service.
///
/// Issues one request at a time and waits for it to finish; there is no
/// retry and no caching. Share across concurrent callers only with external
/// synchronisation, or give each caller its own session.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    timeout: Duration,
}

impl Session<HttpTransport> {
    /// Open a session over HTTP.
    pub fn connect(config: DarwinConfig) -> Result<Self, DarwinError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.timeout()))
    }
}

impl<T: Transport> Session<T> {
    /// Open a session over an existing transport, already configured with
    /// `timeout`.
    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Per-call timeout the transport enforces.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a departure and/or arrival board.
    ///
    /// Fails with [`DarwinError::InvalidArgument`] before any request if the
    /// query includes neither departures nor arrivals.
    pub async fn get_station_board(&self, query: &BoardQuery) -> Result<StationBoard, DarwinError> {
        let call = query.remote_call()?;
        self.fetch(call).await
    }

    /// Fetch the details of one service by the ID shown on a board.
    ///
    /// Service IDs expire shortly after the service leaves the board; an
    /// expired ID is reported by the service as a fault.
    pub async fn get_service_details(&self, service_id: &str) -> Result<ServiceDetails, DarwinError> {
        let call = RemoteCall::new(Operation::GetServiceDetails).arg("serviceID", service_id);
        self.fetch(call).await
    }

    /// Next departure from `crs` towards each of `destinations`.
    pub async fn get_next_departures(
        &self,
        crs: &str,
        destinations: &[&str],
    ) -> Result<DepartureBoard, DarwinError> {
        let call = departures_call(Operation::GetNextDepartures, crs, destinations)?;
        self.fetch(call).await
    }

    /// [`get_next_departures`](Self::get_next_departures) with calling points.
    pub async fn get_next_departures_with_details(
        &self,
        crs: &str,
        destinations: &[&str],
    ) -> Result<DepartureBoardWithDetails, DarwinError> {
        let call = departures_call(Operation::GetNextDeparturesWithDetails, crs, destinations)?;
        self.fetch(call).await
    }

    /// Earliest arrival at each of `destinations` from `crs`.
    pub async fn get_fastest_departures(
        &self,
        crs: &str,
        destinations: &[&str],
    ) -> Result<DepartureBoard, DarwinError> {
        let call = departures_call(Operation::GetFastestDepartures, crs, destinations)?;
        self.fetch(call).await
    }

    /// [`get_fastest_departures`](Self::get_fastest_departures) with calling
    /// points.
    pub async fn get_fastest_departures_with_details(
        &self,
        crs: &str,
        destinations: &[&str],
    ) -> Result<DepartureBoardWithDetails, DarwinError> {
        let call = departures_call(Operation::GetFastestDeparturesWithDetails, crs, destinations)?;
        self.fetch(call).await
    }

    async fn fetch<E: FromWire>(&self, call: RemoteCall) -> Result<E, DarwinError> {
        debug!(operation = %call.operation(), args = ?call.args(), "issuing remote call");
        // Faults become WebService errors, anything else passes through
        let response = self.transport.call(&call).await?;
        Ok(E::from_wire(&response))
    }
}

fn departures_call(
    operation: Operation,
    crs: &str,
    destinations: &[&str],
) -> Result<RemoteCall, DarwinError> {
    if destinations.is_empty() {
        return Err(DarwinError::InvalidArgument(format!(
            "{operation} needs at least one destination"
        )));
    }
    Ok(RemoteCall::new(operation)
        .arg("crs", crs)
        .arg("filterList", destinations.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::darwin::MockTransport;
    use crate::darwin::TransportError;
    use crate::domain::ServiceTimes;
    use crate::fixtures;

    fn session(mock: MockTransport) -> Session<MockTransport> {
        Session::with_transport(mock, Duration::from_secs(5))
    }

    fn board_mock() -> MockTransport {
        let board = fixtures::departure_board();
        MockTransport::new()
            .with_response(Operation::GetDepartureBoard, board.clone())
            .with_response(Operation::GetArrivalBoard, board.clone())
            .with_response(Operation::GetArrivalDepartureBoard, board)
    }

    #[test]
    fn query_defaults() {
        let call = BoardQuery::new("MAN").remote_call().unwrap();

        assert_eq!(call.operation(), Operation::GetDepartureBoard);
        assert_eq!(call.get("crs"), Some("MAN"));
        assert_eq!(call.get("numRows"), Some("10"));
        assert_eq!(call.get("filterCrs"), None);
        assert_eq!(call.get("filterType"), None);
    }

    #[test]
    fn operation_selection() {
        let both = BoardQuery::new("MAN").arrivals(true);
        assert_eq!(both.operation().unwrap(), Operation::GetArrivalDepartureBoard);

        let arrivals = BoardQuery::new("MAN").departures(false).arrivals(true);
        assert_eq!(arrivals.operation().unwrap(), Operation::GetArrivalBoard);
        assert!(arrivals.is_arrivals_only());

        let departures = BoardQuery::new("MAN");
        assert_eq!(departures.operation().unwrap(), Operation::GetDepartureBoard);
        assert!(!departures.is_arrivals_only());
    }

    #[tokio::test]
    async fn station_board_end_to_end() {
        let session = session(board_mock());
        let board = session
            .get_station_board(&BoardQuery::new("MAN").rows(5))
            .await
            .unwrap();

        assert_eq!(board.crs(), Some("MAN"));
        assert_eq!(board.location_name(), Some("Manchester Piccadilly"));
        let row = &board.train_services()[0];
        assert_eq!(row.platform(), Some("1"));
        assert_eq!(row.std(), Some("11:57"));
        assert_eq!(row.etd(), Some("On time"));
        assert_eq!(row.destinations()[0].location_name(), Some("Middlesbrough"));
        assert_eq!(row.destinations()[0].crs(), Some("MBR"));
        assert_eq!(row.origin_text(), "Manchester Airport");
        assert_eq!(row.is_circular_route(), Some(false));
        assert_eq!(row.service_id(), Some("u0bRc9iGz6QPJPk0ipljgg=="));
        assert!(board.bus_services().is_empty());
        assert!(board.ferry_services().is_empty());

        let calls = session.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get("numRows"), Some("5"));
    }

    #[tokio::test]
    async fn neither_departures_nor_arrivals_fails_before_calling() {
        let session = session(board_mock());
        let query = BoardQuery::new("MAN").departures(false).arrivals(false);

        let err = session.get_station_board(&query).await.unwrap_err();

        assert!(matches!(err, DarwinError::InvalidArgument(_)));
        assert!(!session.transport().was_called());
    }

    #[tokio::test]
    async fn each_flag_combination_calls_its_operation() {
        let cases = [
            (true, false, Operation::GetDepartureBoard),
            (false, true, Operation::GetArrivalBoard),
            (true, true, Operation::GetArrivalDepartureBoard),
        ];
        for (departures, arrivals, expected) in cases {
            let session = session(board_mock());
            let query = BoardQuery::new("MAN").departures(departures).arrivals(arrivals);
            session.get_station_board(&query).await.unwrap();

            assert_eq!(session.transport().calls()[0].operation(), expected);
        }
    }

    #[tokio::test]
    async fn destination_filter_wins_over_origin() {
        let session = session(board_mock());
        let query = BoardQuery::new("MAN").destination("HUD").origin("MIA");

        session.get_station_board(&query).await.unwrap();

        let calls = session.transport().calls();
        let call = &calls[0];
        assert_eq!(call.get("filterCrs"), Some("HUD"));
        assert_eq!(call.get("filterType"), Some("to"));
        let filters = call.args().iter().filter(|(k, _)| *k == "filterCrs").count();
        assert_eq!(filters, 1);
    }

    #[tokio::test]
    async fn blank_destination_leaves_origin_filter() {
        let session = session(board_mock());
        let query = BoardQuery::new("MAN").destination("").origin("MIA");

        session.get_station_board(&query).await.unwrap();

        let calls = session.transport().calls();
        let call = &calls[0];
        assert_eq!(call.get("filterCrs"), Some("MIA"));
        assert_eq!(call.get("filterType"), Some("from"));
    }

    #[tokio::test]
    async fn blank_filters_are_not_sent() {
        let session = session(board_mock());
        let query = BoardQuery::new("MAN").destination("  ").origin("");

        session.get_station_board(&query).await.unwrap();

        let calls = session.transport().calls();
        let call = &calls[0];
        assert_eq!(call.get("filterCrs"), None);
        assert_eq!(call.get("filterType"), None);
    }

    #[tokio::test]
    async fn origin_filter_alone() {
        let session = session(board_mock());
        session
            .get_station_board(&BoardQuery::new("MAN").origin("MIA"))
            .await
            .unwrap();

        let calls = session.transport().calls();
        let call = &calls[0];
        assert_eq!(call.get("filterCrs"), Some("MIA"));
        assert_eq!(call.get("filterType"), Some("from"));
    }

    #[tokio::test]
    async fn board_fault_becomes_web_service_error() {
        let mock = MockTransport::new().with_fault(Operation::GetDepartureBoard, "Invalid crs code supplied");
        let session = session(mock);

        let err = session
            .get_station_board(&BoardQuery::new("ZZZ"))
            .await
            .unwrap_err();

        match err {
            DarwinError::WebService { message } => assert!(message.contains("Invalid crs code")),
            other => panic!("expected WebService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn service_details_fault_becomes_web_service_error() {
        let mock = MockTransport::new().with_fault(Operation::GetServiceDetails, "Unknown service");
        let session = session(mock);

        let err = session.get_service_details("expired==").await.unwrap_err();
        assert!(matches!(err, DarwinError::WebService { .. }));
    }

    #[tokio::test]
    async fn service_details_end_to_end() {
        let mock = MockTransport::new()
            .with_response(Operation::GetServiceDetails, fixtures::service_details());
        let session = session(mock);

        let details = session
            .get_service_details("mQ8kDVUzUnbM5lvIZ0jt0A==")
            .await
            .unwrap();

        assert_eq!(details.platform(), Some("13"));
        assert_eq!(details.previous_calling_points().len(), 5);
        let calls = session.transport().calls();
        let call = &calls[0];
        assert_eq!(call.get("serviceID"), Some("mQ8kDVUzUnbM5lvIZ0jt0A=="));
    }

    #[tokio::test]
    async fn next_and_fastest_departures() {
        let mock = MockTransport::new()
            .with_response(Operation::GetNextDepartures, fixtures::next_departures())
            .with_response(
                Operation::GetFastestDeparturesWithDetails,
                fixtures::next_departures_with_details(),
            );
        let session = session(mock);

        let next = session
            .get_next_departures("ECR", &["CLJ", "LBG"])
            .await
            .unwrap();
        assert_eq!(next.departures().len(), 2);
        assert_eq!(next.departures()[1].service().destination_text(), "London Bridge");

        let fastest = session
            .get_fastest_departures_with_details("ECR", &["CLJ", "LBG"])
            .await
            .unwrap();
        assert_eq!(
            fastest.departures()[0].service().subsequent_calling_points().len(),
            2
        );

        let calls = session.transport().calls();
        assert_eq!(calls[0].get("filterList"), Some("CLJ,LBG"));
        assert_eq!(calls[1].operation(), Operation::GetFastestDeparturesWithDetails);
    }

    #[tokio::test]
    async fn departures_need_a_destination() {
        let session = session(MockTransport::new());

        let err = session.get_next_departures("ECR", &[]).await.unwrap_err();

        assert!(matches!(err, DarwinError::InvalidArgument(_)));
        assert!(!session.transport().was_called());
    }

    #[tokio::test]
    async fn non_fault_transport_errors_pass_through() {
        struct Broken;

        impl Transport for Broken {
            async fn call(&self, _call: &RemoteCall) -> Result<serde_json::Value, TransportError> {
                Err(TransportError::Decode {
                    message: "expected value at line 1 column 1".into(),
                    body: Some("<html>".into()),
                })
            }
        }

        let session = Session::with_transport(Broken, Duration::from_secs(1));
        let err = session.get_service_details("abc").await.unwrap_err();

        assert!(matches!(
            err,
            DarwinError::Transport(TransportError::Decode { .. })
        ));
    }

    #[test]
    fn connect_keeps_timeout() {
        let config = DarwinConfig::new("https://example.com/LDBWS", "key").with_timeout(12);
        let session = Session::connect(config).unwrap();
        assert_eq!(session.timeout(), Duration::from_secs(12));
    }
}
