use serde::{Deserialize, Serialize};

/// Distinct values per filterable field, used to populate filter selection.
///
/// `disc_year` is sorted most recent first; the other three ascend
/// lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub disc_year: Vec<String>,
    pub discoverymethod: Vec<String>,
    pub hostname: Vec<String>,
    pub disc_facility: Vec<String>,
}
