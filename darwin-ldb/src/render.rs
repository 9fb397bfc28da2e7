//! Tabular views of boards and services for the command line.
//!
//! Absent values render as blank cells.

use std::io::{self, Write};

use crate::domain::{
    DepartureBoard, DepartureBoardWithDetails, ServiceDetails, ServiceTimes, StationBoard,
};

/// Rows of display strings under a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

impl Table {
    /// Train services on a board: where each is going (or, for an arrivals
    /// only board, coming from) and when.
    pub fn station_board(board: &StationBoard, arrivals_only: bool) -> Self {
        let headers = if arrivals_only {
            vec!["Platform", "Origin", "Scheduled", "Due"]
        } else {
            vec!["Platform", "Destination", "Scheduled", "Due"]
        };

        let rows = board
            .train_services()
            .iter()
            .map(|service| {
                if arrivals_only {
                    vec![
                        cell(service.platform()),
                        service.origin_text(),
                        cell(service.sta()),
                        cell(service.eta()),
                    ]
                } else {
                    vec![
                        cell(service.platform()),
                        service.destination_text(),
                        cell(service.std()),
                        cell(service.etd()),
                    ]
                }
            })
            .collect();

        Self { headers, rows }
    }

    /// Every stop of a service, the board location included, in order.
    pub fn service_details(details: &ServiceDetails) -> Self {
        let headers = vec!["Station", "CRS", "Scheduled", "Expected", "Actual"];
        let mut rows = Vec::new();

        for point in details.previous_calling_points() {
            rows.push(vec![
                cell(point.location_name()),
                cell(point.crs()),
                cell(point.st()),
                cell(point.et()),
                cell(point.at()),
            ]);
        }

        // The board location itself, by departure if it has one
        let (scheduled, expected, actual) = match details.std() {
            Some(std) => (Some(std), details.etd(), details.atd()),
            None => (details.sta(), details.eta(), details.ata()),
        };
        rows.push(vec![
            cell(details.location_name()),
            cell(details.crs()),
            cell(scheduled),
            cell(expected),
            cell(actual),
        ]);

        for point in details.subsequent_calling_points() {
            rows.push(vec![
                cell(point.location_name()),
                cell(point.crs()),
                cell(point.st()),
                cell(point.et()),
                cell(point.at()),
            ]);
        }

        Self { headers, rows }
    }

    /// One row per requested destination.
    pub fn departures(board: &DepartureBoard) -> Self {
        let rows = board
            .departures()
            .iter()
            .map(|departure| {
                let service = departure.service();
                departure_row(departure.crs(), service, service.destination_text())
            })
            .collect();

        Self {
            headers: DEPARTURE_HEADERS.to_vec(),
            rows,
        }
    }

    /// One row per requested destination; the destination column names the
    /// last calling point of each service.
    pub fn departures_with_details(board: &DepartureBoardWithDetails) -> Self {
        let rows = board
            .departures()
            .iter()
            .map(|departure| {
                let service = departure.service();
                let terminus = service
                    .subsequent_calling_point_lists()
                    .first()
                    .and_then(|list| list.calling_points().last())
                    .and_then(|point| point.location_name());
                departure_row(departure.crs(), service, cell(terminus))
            })
            .collect();

        Self {
            headers: DEPARTURE_HEADERS.to_vec(),
            rows,
        }
    }

    pub fn headers(&self) -> &[&'static str] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Aligned plain-text columns with an underlined header.
    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.chars().count());
            }
        }

        writeln!(out, "{}", aligned(self.headers.iter().copied(), &widths))?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(out, "{}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(out, "{}", aligned(row.iter().map(String::as_str), &widths))?;
        }
        Ok(())
    }

    /// RFC 4180 CSV, header first.
    pub fn write_csv(&self, out: impl Write) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn aligned<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

const DEPARTURE_HEADERS: [&str; 5] = ["To", "Platform", "Destination", "Scheduled", "Due"];

fn departure_row(crs: Option<&str>, service: &impl ServiceTimes, destination: String) -> Vec<String> {
    vec![
        cell(crs),
        cell(service.platform()),
        destination,
        cell(service.std()),
        cell(service.etd()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FromWire;
    use crate::fixtures;

    fn manchester() -> StationBoard {
        StationBoard::from_wire(&fixtures::departure_board())
    }

    #[test]
    fn departure_rows() {
        let table = Table::station_board(&manchester(), false);

        assert_eq!(table.headers(), ["Platform", "Destination", "Scheduled", "Due"]);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[0], ["1", "Middlesbrough", "11:57", "On time"]);
        assert_eq!(table.rows()[2], ["", "Hazel Grove", "12:04", "Cancelled"]);
    }

    #[test]
    fn arrival_rows_use_origin_and_arrival_times() {
        let table = Table::station_board(&manchester(), true);

        assert_eq!(table.headers()[1], "Origin");
        assert_eq!(table.rows()[0], ["1", "Manchester Airport", "", ""]);
    }

    #[test]
    fn text_output_is_aligned() {
        let board = StationBoard::from_wire(&serde_json::json!({
            "trainServices": [
                {"platform": "1", "std": "10:00", "etd": "On time",
                 "destination": [{"locationName": "York"}]},
                {"platform": "12", "std": "10:05", "etd": "10:09",
                 "destination": [{"locationName": "Leeds"}]}
            ]
        }));
        let mut out = Vec::new();
        Table::station_board(&board, false).write_text(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Platform  Destination  Scheduled  Due");
        assert_eq!(lines[1], "--------  -----------  ---------  -------");
        assert_eq!(lines[2], "1         York         10:00      On time");
        assert_eq!(lines[3], "12        Leeds        10:05      10:09");
    }

    #[test]
    fn csv_output_quotes_commas() {
        let mut out = Vec::new();
        Table::station_board(&manchester(), false)
            .write_csv(&mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Platform,Destination,Scheduled,Due");
        assert_eq!(lines[1], "1,Middlesbrough,11:57,On time");
        assert_eq!(
            lines[2],
            "14,\"Edinburgh, Glasgow Central via Preston\",12:02,12:09"
        );
    }

    #[test]
    fn service_rows_include_board_location() {
        let details = ServiceDetails::from_wire(&fixtures::service_details());
        let table = Table::service_details(&details);

        assert_eq!(table.rows().len(), 5 + 1 + 4);
        assert_eq!(
            table.rows()[5],
            ["Manchester Piccadilly", "MAN", "15:43", "On time", ""]
        );
        assert_eq!(table.rows()[0][0], "Liverpool Lime Street");
        assert_eq!(table.rows()[9][0], "Nottingham");
    }

    #[test]
    fn departures_rows() {
        let board: DepartureBoard = DepartureBoard::from_wire(&fixtures::next_departures());
        let table = Table::departures(&board);
        assert_eq!(table.rows()[0], ["CLJ", "4", "London Victoria", "22:15", "On time"]);

        let board = DepartureBoardWithDetails::from_wire(&fixtures::next_departures_with_details());
        let table = Table::departures_with_details(&board);
        assert_eq!(table.rows()[1], ["LBG", "2", "London Bridge", "22:21", "22:27"]);
    }
}
