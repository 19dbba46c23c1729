use crate::{
    retry::RetryPolicy,
    severity::{Classification, Level, Thresholds},
    tls::{CertificateProbe, ProbeOutcome, ProbeTarget},
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Shared settings for every domain of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Front-end host every domain is served from
    pub host: String,
    pub port: u16,
    /// Per-attempt connect + handshake deadline
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub thresholds: Thresholds,
}

impl ScanConfig {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 443,
            timeout: Duration::from_millis(5000),
            retry: RetryPolicy::default(),
            thresholds: Thresholds::default(),
        }
    }

    /// Probe target for one domain
    #[must_use]
    pub fn target(&self, domain: &str) -> ProbeTarget {
        ProbeTarget::new(self.host.as_str(), self.port, domain, self.timeout)
    }
}

/// Why a domain could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("handshake completed but no certificate was returned")]
    MissingCertificate,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("timed out")]
    Timeout,
}

/// A domain that produced no classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub domain: String,
    pub reason: FailureReason,
    pub attempts: u32,
}

/// Everything a scan learned, in configured domain order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub classifications: Vec<Classification>,
    pub failures: Vec<ScanFailure>,
    /// Warning level classifications, queued for notification
    pub warnings: Vec<Classification>,
    /// Set by any error level classification or failure
    pub any_error: bool,
}

impl ScanResult {
    /// Fold the final probe outcome of one domain into the result
    pub fn record(
        &mut self,
        domain: &str,
        outcome: ProbeOutcome,
        attempts: u32,
        now: DateTime<Utc>,
        thresholds: &Thresholds,
    ) {
        let reason = match outcome {
            ProbeOutcome::CertificateFound { not_after } => {
                self.classify(Classification::new(domain, not_after, now, thresholds));
                return;
            }
            ProbeOutcome::NoCertificate => FailureReason::MissingCertificate,
            ProbeOutcome::ConnectionError { message } => FailureReason::Connection(message),
            ProbeOutcome::Timeout => FailureReason::Timeout,
        };

        error!("{domain}: {reason} (after {attempts} attempt(s))");

        self.any_error = true;
        self.failures.push(ScanFailure {
            domain: domain.to_string(),
            reason,
            attempts,
        });
    }

    fn classify(&mut self, classification: Classification) {
        let Classification {
            domain,
            days_left,
            level,
            expires_at,
        } = &classification;
        let days = level.paint(*days_left);
        let date = expires_at.format("%Y-%m-%d");

        match level {
            Level::Info => info!("{domain}: {days} days left (expires {date})"),
            Level::Warning => {
                warn!("{domain}: {days} days left (expires {date})");
                self.warnings.push(classification.clone());
            }
            Level::Error => {
                error!("{domain}: {days} days left (expires {date})");
                self.any_error = true;
            }
        }

        self.classifications.push(classification);
    }

    /// Domains that ended the scan without a classification or with an error level
    #[must_use]
    pub fn failed_domains(&self) -> Vec<&str> {
        self.classifications
            .iter()
            .filter(|c| c.level == Level::Error)
            .map(|c| c.domain.as_str())
            .chain(self.failures.iter().map(|f| f.domain.as_str()))
            .collect()
    }
}

/// Probes every configured domain, one after another
#[derive(Debug)]
pub struct DomainScanner<P> {
    probe: P,
    config: ScanConfig,
}

impl<P: CertificateProbe> DomainScanner<P> {
    #[must_use]
    pub const fn new(probe: P, config: ScanConfig) -> Self {
        Self { probe, config }
    }

    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `domains` in order; a failing domain never stops the scan
    pub async fn scan(&self, domains: &[String]) -> ScanResult {
        let mut result = ScanResult::default();

        for domain in domains {
            let target = self.config.target(domain);
            debug!("probing {target}");

            let resolution = self.config.retry.resolve(&self.probe, &target).await;

            result.record(
                domain,
                resolution.outcome,
                resolution.attempts,
                Utc::now(),
                &self.config.thresholds,
            );
        }

        result
    }
}
