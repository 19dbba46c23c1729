//! Bounded retry of certificate probes.
//!
//! Only transient outcomes (connection errors and timeouts) are retried, with
//! the same fixed delay between every attempt.

use crate::tls::{CertificateProbe, ProbeOutcome, ProbeTarget};
use std::time::Duration;
use tokio::time;
use tracing::info;

/// How often and how far apart probe attempts are made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one; never below 1
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

/// Final outcome of a retried probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: ProbeOutcome,
    /// Attempts actually made
    pub attempts: u32,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Probe `target` until a definitive outcome or until attempts run out
    pub async fn resolve<P>(&self, probe: &P, target: &ProbeTarget) -> Resolution
    where
        P: CertificateProbe,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = probe.probe(target).await;

            if !outcome.is_transient() || attempt >= max_attempts {
                return Resolution {
                    outcome,
                    attempts: attempt,
                };
            }

            info!(
                "{}: attempt {attempt}/{max_attempts} failed ({outcome}), retrying in {}ms",
                target.virtual_host,
                self.delay.as_millis()
            );

            time::sleep(self.delay).await;
            attempt += 1;
        }
    }
}
