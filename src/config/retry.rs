//! Retry configuration and backoff strategy for the SER client.

use rand::Rng;
use std::time::Duration;

use crate::error::SerError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,

    /// Initial backoff duration before the first retry.
    pub initial_backoff: Duration,

    /// Maximum backoff duration between retries.
    pub max_backoff: Duration,

    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,

    /// Whether to add full jitter to backoff delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(20),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Calculate the delay before retry number `attempt` (0-indexed).
    ///
    /// ```
    /// use std::time::Duration;
    /// use integrations_ser_mail::config::RetryConfig;
    ///
    /// let config = RetryConfig { jitter: false, ..RetryConfig::default() };
    /// assert_eq!(config.calculate_delay(1), Duration::from_millis(400));
    /// ```
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let backoff_millis = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);

        let capped = Duration::from_millis(backoff_millis as u64).min(self.max_backoff);

        if self.jitter && !capped.is_zero() {
            let jittered = rand::thread_rng().gen_range(0.0..capped.as_millis() as f64);
            Duration::from_millis(jittered as u64)
        } else {
            capped
        }
    }

    /// Determine whether a failed attempt should be retried.
    ///
    /// ```
    /// use integrations_ser_mail::config::RetryConfig;
    /// use integrations_ser_mail::error::SerError;
    ///
    /// let config = RetryConfig::default();
    /// let error = SerError::RateLimited {
    ///     message: "Too many requests".to_string(),
    ///     retry_after: None,
    /// };
    ///
    /// assert!(config.should_retry(0, &error));
    /// assert!(!config.should_retry(3, &error));
    /// ```
    pub fn should_retry(&self, attempt: u32, error: &SerError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}
