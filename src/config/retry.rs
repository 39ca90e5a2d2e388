//! Retry settings and backoff computation for the Injection API client.

use rand::Rng;
use std::time::Duration;

use super::ConfigError;

/// Highest number of retries the Injection API client allows.
pub const MAXIMUM_ALLOWED_RETRIES: u32 = 5;

/// Upper bound for the wait between two attempts.
pub const MAXIMUM_RETRY_WAIT: Duration = Duration::from_secs(30);

const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(10);

/// Jitter bounds, in milliseconds, applied to each exponential step.
const JITTER_MIN_MILLIS: u64 = 800;
const JITTER_MAX_MILLIS: u64 = 1200;

/// Retry behavior for a send.
///
/// Retries are disabled by default and have to be enabled explicitly. The
/// settings are immutable once constructed; construction fails when
/// `max_retries` exceeds [`MAXIMUM_ALLOWED_RETRIES`], when `max_wait` exceeds
/// [`MAXIMUM_RETRY_WAIT`], or when `min_wait` is greater than `max_wait`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use integrations_socketlabs::config::RetrySettings;
///
/// let settings = RetrySettings::new(3, Duration::from_secs(1), Duration::from_secs(5))?;
/// assert_eq!(settings.max_retries(), 3);
///
/// assert!(RetrySettings::with_retries(6).is_err());
/// # Ok::<(), integrations_socketlabs::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    max_retries: u32,
    min_wait: Duration,
    max_wait: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RetrySettings {
    /// Create retry settings with explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if any invariant is violated.
    pub fn new(max_retries: u32, min_wait: Duration, max_wait: Duration) -> Result<Self, ConfigError> {
        if max_retries > MAXIMUM_ALLOWED_RETRIES {
            return Err(ConfigError::Invalid {
                message: format!(
                    "The maximum number of allowed retries is {}",
                    MAXIMUM_ALLOWED_RETRIES
                ),
            });
        }

        if max_wait > MAXIMUM_RETRY_WAIT {
            return Err(ConfigError::Invalid {
                message: format!(
                    "max_wait must not exceed {} seconds",
                    MAXIMUM_RETRY_WAIT.as_secs()
                ),
            });
        }

        if min_wait > max_wait {
            return Err(ConfigError::Invalid {
                message: "min_wait must be less than or equal to max_wait".to_string(),
            });
        }

        Ok(Self {
            max_retries,
            min_wait,
            max_wait,
        })
    }

    /// Create retry settings with the default wait bounds (1s to 10s).
    pub fn with_retries(max_retries: u32) -> Result<Self, ConfigError> {
        Self::new(max_retries, DEFAULT_MIN_WAIT, DEFAULT_MAX_WAIT)
    }

    /// Settings that send exactly once.
    pub fn no_retry() -> Self {
        Self::default()
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Minimum wait between attempts.
    pub fn min_wait(&self) -> Duration {
        self.min_wait
    }

    /// Maximum wait between attempts.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Whether any retry is allowed.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Compute the wait applied after the failed attempt with index `attempt`
    /// (0-based).
    ///
    /// The interval is `min_wait + (2^attempt - 1) * jitter`, where the jitter
    /// is drawn uniformly from 0.8s to 1.2s, capped at `max_wait`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use integrations_socketlabs::config::RetrySettings;
    ///
    /// let settings = RetrySettings::new(3, Duration::from_secs(1), Duration::from_secs(10))?;
    /// assert_eq!(settings.next_wait_interval(0), Duration::from_secs(1));
    /// assert!(settings.next_wait_interval(4) <= Duration::from_secs(10));
    /// # Ok::<(), integrations_socketlabs::config::ConfigError>(())
    /// ```
    pub fn next_wait_interval(&self, attempt: u32) -> Duration {
        let jitter_millis = rand::thread_rng().gen_range(JITTER_MIN_MILLIS..JITTER_MAX_MILLIS);
        self.wait_interval(attempt, jitter_millis)
    }

    fn wait_interval(&self, attempt: u32, jitter_millis: u64) -> Duration {
        let steps = 2u64.saturating_pow(attempt).saturating_sub(1);
        let delta = Duration::from_millis(steps.saturating_mul(jitter_millis));

        self.min_wait.saturating_add(delta).min(self.max_wait)
    }
}
