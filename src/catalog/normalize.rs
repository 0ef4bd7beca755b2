//! Raw archive text to [`Record`]s.
//!
//! The archive prefixes its CSV with `#` metadata lines above the header row,
//! and is known to emit rows whose column count does not match the header.
//! Columns are therefore located by header name and read by position, and a
//! short or long row is read as far as it goes.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::models::Record;

const COMMENT_MARKER: char = '#';

const PLANET_NAME: &str = "pl_name";
const HOST_STAR: &str = "hostname";
const DISCOVERY_YEAR: &str = "disc_year";
const DISCOVERY_METHOD: &str = "discoverymethod";
const DISCOVERY_FACILITY: &str = "disc_facility";

/// Parse `raw` into records, in input order.
///
/// Rows missing a planet name, host star or discovery year are dropped, as
/// are rows the CSV reader cannot decode at all.
pub fn normalize(raw: &str) -> Vec<Record> {
    let body = strip_comments(raw);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => Columns::locate(headers),
        Err(e) => {
            tracing::warn!("Unreadable header row, no records parsed: {}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!("Skipping undecodable row: {}", e);
                dropped += 1;
                continue;
            }
        };

        match columns.record(&row) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} incomplete rows", dropped);
    }

    records
}

fn strip_comments(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header positions of the columns we care about. Any of them may be absent.
#[derive(Debug, Default)]
struct Columns {
    planet_name: Option<usize>,
    host_star: Option<usize>,
    discovery_year: Option<usize>,
    discovery_method: Option<usize>,
    discovery_facility: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);
        Self {
            planet_name: position(PLANET_NAME),
            host_star: position(HOST_STAR),
            discovery_year: position(DISCOVERY_YEAR),
            discovery_method: position(DISCOVERY_METHOD),
            discovery_facility: position(DISCOVERY_FACILITY),
        }
    }

    fn record(&self, row: &StringRecord) -> Option<Record> {
        let field = |column: Option<usize>| -> String {
            column
                .and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };

        let record = Record {
            planet_name: field(self.planet_name),
            host_star: field(self.host_star),
            discovery_year: field(self.discovery_year),
            discovery_method: field(self.discovery_method),
            discovery_facility: field(self.discovery_facility),
        };

        let complete = !record.planet_name.is_empty()
            && !record.host_star.is_empty()
            && !record.discovery_year.is_empty();

        complete.then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "pl_name,hostname,disc_year,discoverymethod,disc_facility";

    #[test]
    fn strips_leading_comment_lines() {
        let raw = format!(
            "# This file was produced by the archive\n# COLUMN pl_name: Planet Name\n{}\nKepler-22 b,Kepler-22,2011,Transit,Kepler\n",
            HEADER
        );
        let records = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].planet_name, "Kepler-22 b");
        assert_eq!(records[0].discovery_facility, "Kepler");
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let raw = format!(
            "{}\nKepler-22 b,Kepler-22,2011,Transit,Kepler\nOrphan b,,2015,Transit,K2\n,Star,2015,,\nNoYear b,Star,,Imaging,\n",
            HEADER
        );
        let records = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].host_star, "Kepler-22");
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let raw = format!("{}\nPSR B1257+12 b,PSR B1257+12,1992,Pulsar Timing,\n", HEADER);
        let records = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].discovery_method, "Pulsar Timing");
        assert!(records[0].discovery_facility.is_empty());
    }

    #[test]
    fn tolerates_short_and_long_rows() {
        let raw = format!(
            "{}\n51 Peg b,51 Peg,1995\nHD 209458 b,HD 209458,1999,Radial Velocity,W. M. Keck Observatory,extra,columns\n",
            HEADER
        );
        let records = normalize(&raw);
        assert_eq!(records.len(), 2);
        assert!(records[0].discovery_method.is_empty());
        assert_eq!(records[1].discovery_facility, "W. M. Keck Observatory");
    }

    #[test]
    fn maps_columns_by_header_name() {
        let raw = "disc_year,disc_facility,hostname,pl_name,discoverymethod\n2018,Transiting Exoplanet Survey Satellite (TESS),pi Men,pi Men c,Transit\n";
        let records = normalize(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].planet_name, "pi Men c");
        assert_eq!(records[0].discovery_year, "2018");
    }

    #[test]
    fn reads_quoted_fields_with_commas() {
        let raw = format!(
            "{}\nTOI-700 d,TOI-700,2020,Transit,\"Transiting Exoplanet Survey Satellite (TESS), NASA\"\n",
            HEADER
        );
        let records = normalize(&raw);
        assert_eq!(
            records[0].discovery_facility,
            "Transiting Exoplanet Survey Satellite (TESS), NASA"
        );
    }

    #[test]
    fn trims_whitespace_and_skips_blank_lines() {
        let raw = format!("{}\n\n  Kepler-22 b , Kepler-22 ,2011, Transit ,Kepler\r\n\n", HEADER);
        let records = normalize(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].planet_name, "Kepler-22 b");
        assert_eq!(records[0].discovery_method, "Transit");
    }

    #[test]
    fn preserves_input_order() {
        let raw = format!(
            "{}\nb,S,2001,,\na,S,2000,,\nc,S,2002,,\n",
            HEADER
        );
        let names: Vec<_> = normalize(&raw).into_iter().map(|r| r.planet_name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(normalize("").is_empty());
        assert!(normalize("# only comments\n").is_empty());
        assert!(normalize(HEADER).is_empty());
    }
}
