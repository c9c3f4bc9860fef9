// src/config.rs
// =============================================================================
// Default limits and the runtime configuration for one analyzer instance.
//
// The CLI fills an AnalyzerConfig from flags (or URL_ANALYZER_* environment
// variables); embedders can build one directly with the with_* setters.
// =============================================================================

use std::time::Duration;

use thiserror::Error;

/// Timeout for the page fetch itself (connect + headers + body).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared deadline for the whole link-checking phase.
pub const DEFAULT_CHECK_DEADLINE: Duration = Duration::from_secs(20);

/// Maximum number of reachability probes in flight at once.
pub const DEFAULT_MAX_IN_FLIGHT_PROBES: usize = 64;

/// Redirect hops the shared client follows before giving up.
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;

/// Settings shared by the fetcher and the link checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub fetch_timeout: Duration,
    pub check_deadline: Duration,
    pub max_in_flight_probes: usize,
    pub redirect_limit: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            check_deadline: DEFAULT_CHECK_DEADLINE,
            max_in_flight_probes: DEFAULT_MAX_IN_FLIGHT_PROBES,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_check_deadline(mut self, deadline: Duration) -> Self {
        self.check_deadline = deadline;
        self
    }

    pub fn with_max_in_flight_probes(mut self, limit: usize) -> Self {
        self.max_in_flight_probes = limit;
        self
    }

    pub fn with_redirect_limit(mut self, limit: usize) -> Self {
        self.redirect_limit = limit;
        self
    }

    // Checks the relationships between settings.
    //
    // The fetch timeout must fit inside the check deadline: a single page
    // request may never be allowed to outlive the budget of the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight_probes == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("fetch timeout"));
        }
        if self.check_deadline.is_zero() {
            return Err(ConfigError::ZeroDuration("check deadline"));
        }
        if self.fetch_timeout > self.check_deadline {
            return Err(ConfigError::FetchTimeoutExceedsDeadline {
                fetch_timeout: self.fetch_timeout,
                check_deadline: self.check_deadline,
            });
        }
        Ok(())
    }
}

/// Rejected configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("probe concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error(
        "fetch timeout ({fetch_timeout:?}) must not be larger than the check deadline ({check_deadline:?})"
    )]
    FetchTimeoutExceedsDeadline {
        fetch_timeout: Duration,
        check_deadline: Duration,
    },
}
