use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{FilterOptions, Record};

/// Build the distinct-value indexes for every filterable field.
pub fn build_options(records: &[Record]) -> FilterOptions {
    let mut disc_year = distinct(records, |r| r.discovery_year.as_str());
    disc_year.sort_by(|a, b| most_recent_first(a, b));

    FilterOptions {
        disc_year,
        discoverymethod: distinct(records, |r| r.discovery_method.as_str()),
        hostname: distinct(records, |r| r.host_star.as_str()),
        disc_facility: distinct(records, |r| r.discovery_facility.as_str()),
    }
}

/// Distinct non-empty values of one field, ascending.
fn distinct<'a>(records: &'a [Record], field: impl Fn(&'a Record) -> &'a str) -> Vec<String> {
    records
        .iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Descending order for year tokens. Integer tokens compare numerically and
/// come before anything that doesn't parse; the rest fall back to descending
/// string order so the result is a total order.
fn most_recent_first(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x).then_with(|| b.cmp(a)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => b.cmp(a),
    }
}
