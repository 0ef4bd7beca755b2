//! Service configuration loaded from environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// NASA Exoplanet Archive TAP query for the five columns the catalog uses.
pub const DEFAULT_REMOTE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync?\
QUERY=SELECT+pl_name,hostname,disc_year,discoverymethod,disc_facility+FROM+pscomppars+WHERE+disc_year+IS+NOT+NULL&\
FORMAT=csv&lang=ADQL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Snapshot shipped alongside the `exo` binary, used when the archive is
/// unreachable. Relative to the working directory if the executable's own
/// location cannot be determined.
pub fn default_snapshot_path() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => snapshot_path_for(&exe),
        Err(e) => {
            tracing::warn!("Cannot locate executable, using relative snapshot path: {}", e);
            snapshot_path_for(Path::new(""))
        }
    }
}

/// `data/exoplanets.csv` in the directory holding `exe`.
pub fn snapshot_path_for(exe: &Path) -> PathBuf {
    exe.parent()
        .unwrap_or_else(|| Path::new(""))
        .join("data")
        .join("exoplanets.csv")
}

#[derive(Clone, Debug)]
pub struct ExplorerConfig {
    /// Archive endpoint (from EXOPLANET_REMOTE_URL)
    pub remote_url: String,
    /// Local fallback file (from EXOPLANET_SNAPSHOT_PATH)
    pub snapshot_path: PathBuf,
    /// Bound on the whole remote request (from EXOPLANET_TIMEOUT_SECS)
    pub timeout: Duration,
    /// Skip the archive and read the snapshot directly (from EXOPLANET_OFFLINE)
    pub offline: bool,
    /// Reload period, if any (from EXOPLANET_REFRESH_SECS)
    pub refresh_interval: Option<Duration>,
    /// Allowed CORS origins (from EXOPLANET_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ExplorerConfig {
    /// Load configuration from environment variables, falling back to the
    /// built-in defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source, with the same parsing
    /// rules as [`ExplorerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let remote_url = lookup("EXOPLANET_REMOTE_URL").unwrap_or(defaults.remote_url);

        let snapshot_path = lookup("EXOPLANET_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshot_path);

        let timeout = lookup("EXOPLANET_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let offline = lookup("EXOPLANET_OFFLINE")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.offline);

        let refresh_interval = lookup("EXOPLANET_REFRESH_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let cors_origins = lookup("EXOPLANET_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            remote_url,
            snapshot_path,
            timeout,
            offline,
            refresh_interval,
            cors_origins,
        }
    }

    /// A config that never touches the network (for local runs and testing).
    pub fn offline(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            offline: true,
            ..Self::default()
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            snapshot_path: default_snapshot_path(),
            timeout: DEFAULT_TIMEOUT,
            offline: false,
            refresh_interval: None,
            cors_origins: None,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_point_at_the_archive_and_bundled_snapshot() {
        let config = ExplorerConfig::default();
        assert!(config.remote_url.contains("FORMAT=csv"));
        assert!(config.remote_url.contains("pscomppars"));
        assert!(config.snapshot_path.ends_with("data/exoplanets.csv"));
        let exe = std::env::current_exe().expect("No current executable");
        assert_eq!(config.snapshot_path, snapshot_path_for(&exe));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!config.offline);
        assert!(config.refresh_interval.is_none());
    }

    #[test]
    fn offline_config_keeps_other_defaults() {
        let config = ExplorerConfig::offline("/tmp/snapshot.csv");
        assert!(config.offline);
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/snapshot.csv"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn snapshot_resolves_next_to_the_executable() {
        let path = snapshot_path_for(Path::new("/opt/exo/bin/exo"));
        assert_eq!(path, PathBuf::from("/opt/exo/bin/data/exoplanets.csv"));
    }

    #[test]
    fn snapshot_without_a_parent_is_relative() {
        assert_eq!(
            snapshot_path_for(Path::new("exo")),
            PathBuf::from("data/exoplanets.csv")
        );
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = ExplorerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.offline);
        assert!(config.refresh_interval.is_none());
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = ExplorerConfig::from_lookup(lookup(&[
            ("EXOPLANET_REMOTE_URL", "http://localhost:9000/tap"),
            ("EXOPLANET_SNAPSHOT_PATH", "/srv/exo/snapshot.csv"),
            ("EXOPLANET_TIMEOUT_SECS", "30"),
            ("EXOPLANET_OFFLINE", "true"),
            ("EXOPLANET_REFRESH_SECS", "3600"),
            ("EXOPLANET_CORS_ORIGINS", "https://a.example"),
        ]));
        assert_eq!(config.remote_url, "http://localhost:9000/tap");
        assert_eq!(config.snapshot_path, PathBuf::from("/srv/exo/snapshot.csv"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.offline);
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(3600)));
        assert_eq!(config.cors_origins, Some(vec!["https://a.example".to_string()]));
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = ExplorerConfig::from_lookup(lookup(&[("EXOPLANET_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_or_invalid_refresh_disables_refresh() {
        let zero = ExplorerConfig::from_lookup(lookup(&[("EXOPLANET_REFRESH_SECS", "0")]));
        assert!(zero.refresh_interval.is_none());

        let junk = ExplorerConfig::from_lookup(lookup(&[("EXOPLANET_REFRESH_SECS", "-5")]));
        assert!(junk.refresh_interval.is_none());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = ExplorerConfig::from_lookup(lookup(&[(
            "EXOPLANET_CORS_ORIGINS",
            " https://a.example ,https://b.example,, ",
        )]));
        assert_eq!(
            config.cors_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
