//! Statuscope configuration
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use url::Url;

/// Poll interval used when none is configured or the configured value does
/// not parse.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Lower bound on the poll interval. Shorter cadences hammer the status
/// page for no benefit, so anything below this is raised to it.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

/// Default per-request timeout for status page fetches.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Status page endpoint configuration options
#[derive(Debug, Clone, Parser)]
pub struct StatusPageOpts {
    /// Incidents resource URL
    #[clap(
        long,
        env = "STATUSCOPE_INCIDENTS_URL",
        default_value = "https://status.openai.com/api/v2/incidents.json"
    )]
    pub incidents_url: Url,
    /// Components resource URL, used to resolve component display names
    #[clap(
        long,
        env = "STATUSCOPE_COMPONENTS_URL",
        default_value = "https://status.openai.com/api/v2/components.json"
    )]
    pub components_url: Url,
}

/// CLI options for statuscope
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Status page endpoint configuration
    #[clap(flatten)]
    pub status_page: StatusPageOpts,

    /// Poll interval in seconds. Kept as a raw string so a bad value can be
    /// corrected instead of failing startup; see [`Opts::poll_interval`].
    #[clap(long, env = "STATUSCOPE_POLL_INTERVAL_SECS", default_value = "60")]
    pub poll_interval_secs: String,

    /// Per-request timeout in seconds for status page fetches
    #[clap(long, env = "STATUSCOPE_REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,
}

impl Opts {
    /// Effective poll interval.
    ///
    /// Unparseable input falls back to [`DEFAULT_POLL_INTERVAL_SECS`] and
    /// values below [`MIN_POLL_INTERVAL_SECS`] are raised to the floor. Both
    /// corrections warn instead of aborting startup.
    pub fn poll_interval(&self) -> Duration {
        let secs = match self.poll_interval_secs.trim().parse::<u64>() {
            Ok(secs) => secs,
            Err(_) => {
                warn!(
                    raw = %self.poll_interval_secs,
                    default_secs = DEFAULT_POLL_INTERVAL_SECS,
                    "invalid poll interval, using default"
                );
                DEFAULT_POLL_INTERVAL_SECS
            }
        };

        if secs < MIN_POLL_INTERVAL_SECS {
            warn!(
                requested_secs = secs,
                floor_secs = MIN_POLL_INTERVAL_SECS,
                "poll interval too short, using minimum"
            );
            return Duration::from_secs(MIN_POLL_INTERVAL_SECS);
        }

        Duration::from_secs(secs)
    }

    /// Per-request timeout for status page fetches.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts_with_interval(raw: &str) -> Opts {
        // The attached form keeps clap from reading values like "-5" as flags.
        Opts::parse_from(["statuscope".to_owned(), format!("--poll-interval-secs={raw}")])
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Opts::command().debug_assert()
    }

    #[test]
    fn default_interval_is_sixty_seconds() {
        let opts = Opts::parse_from(["statuscope"]);
        assert_eq!(opts.poll_interval(), Duration::from_secs(60));
    }

    #[test]
    fn interval_below_floor_is_clamped() {
        let opts = opts_with_interval("3");
        assert_eq!(opts.poll_interval(), Duration::from_secs(MIN_POLL_INTERVAL_SECS));
    }

    #[test]
    fn unparseable_interval_falls_back_to_default() {
        let opts = opts_with_interval("soon");
        assert_eq!(opts.poll_interval(), Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
    }

    #[test]
    fn negative_interval_falls_back_to_default() {
        let opts = opts_with_interval("-5");
        assert_eq!(opts.poll_interval(), Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
    }

    #[test]
    fn whitespace_around_interval_is_tolerated() {
        let opts = opts_with_interval(" 90 ");
        assert_eq!(opts.poll_interval(), Duration::from_secs(90));
    }

    #[test]
    fn request_timeout_defaults_to_ten_seconds() {
        let opts = Opts::parse_from(["statuscope"]);
        assert_eq!(opts.request_timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }
}
