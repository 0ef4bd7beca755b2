use serde::{Deserialize, Serialize};

/// One confirmed exoplanet discovery.
///
/// Every field is kept as the raw token from the archive. `disc_year` in
/// particular is never parsed, so `"2011"` stays `"2011"` on the wire.
/// Serialized with the archive's column names, which is what the UI reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "pl_name")]
    pub planet_name: String,
    #[serde(rename = "hostname")]
    pub host_star: String,
    #[serde(rename = "disc_year")]
    pub discovery_year: String,
    /// Empty when the archive row had no value.
    #[serde(rename = "discoverymethod")]
    pub discovery_method: String,
    /// Empty when the archive row had no value.
    #[serde(rename = "disc_facility")]
    pub discovery_facility: String,
}
