use super::record::Record;

/// Search query parameters as they arrive over HTTP.
///
/// Both the archive column names and the short names are accepted. A field
/// may be named more than once; the first non-empty value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub disc_year: Option<String>,
    pub discoverymethod: Option<String>,
    pub hostname: Option<String>,
    pub disc_facility: Option<String>,
}

impl SearchParams {
    /// Collect parameters from raw query pairs. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "disc_year" | "year" => &mut params.disc_year,
                "discoverymethod" | "method" => &mut params.discoverymethod,
                "hostname" | "host" => &mut params.hostname,
                "disc_facility" | "facility" => &mut params.disc_facility,
                _ => continue,
            };

            if slot.is_none() {
                *slot = non_empty(Some(value.into()));
            }
        }

        params
    }
}

/// A conjunction of optional exact-match constraints, one per filterable field.
///
/// Empty strings are treated as "no constraint" when building from
/// [`SearchParams`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub year: Option<String>,
    pub method: Option<String>,
    pub host: Option<String>,
    pub facility: Option<String>,
}

impl Filter {
    pub fn year(mut self, value: impl Into<String>) -> Self {
        self.year = non_empty(Some(value.into()));
        self
    }

    pub fn method(mut self, value: impl Into<String>) -> Self {
        self.method = non_empty(Some(value.into()));
        self
    }

    pub fn host(mut self, value: impl Into<String>) -> Self {
        self.host = non_empty(Some(value.into()));
        self
    }

    pub fn facility(mut self, value: impl Into<String>) -> Self {
        self.facility = non_empty(Some(value.into()));
        self
    }

    /// True when no constraint is set. Such a filter must be rejected
    /// before it reaches the query engine.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.method.is_none() && self.host.is_none() && self.facility.is_none()
    }

    /// Whether `record` satisfies every constraint present in this filter.
    /// Comparison is exact and case-sensitive.
    pub fn matches(&self, record: &Record) -> bool {
        fn check(constraint: &Option<String>, value: &str) -> bool {
            constraint.as_deref().map_or(true, |c| c == value)
        }

        check(&self.year, &record.discovery_year)
            && check(&self.method, &record.discovery_method)
            && check(&self.host, &record.host_star)
            && check(&self.facility, &record.discovery_facility)
    }
}

impl From<SearchParams> for Filter {
    fn from(params: SearchParams) -> Self {
        Self {
            year: non_empty(params.disc_year),
            method: non_empty(params.discoverymethod),
            host: non_empty(params.hostname),
            facility: non_empty(params.disc_facility),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
