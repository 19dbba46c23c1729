use crate::{
    scan::{ScanConfig, ScanResult},
    severity::Classification,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct Failure<'a> {
    domain: &'a str,
    reason: String,
    attempts: u32,
}

/// One-line JSON summary of a run
#[derive(Serialize, Debug)]
pub struct Report<'a> {
    checked_at: DateTime<Utc>,
    host: &'a str,
    port: u16,
    classifications: &'a [Classification],
    failures: Vec<Failure<'a>>,
    warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_error: Option<String>,
    ok: bool,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(
        config: &'a ScanConfig,
        result: &'a ScanResult,
        notification_error: Option<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let failures = result
            .failures
            .iter()
            .map(|f| Failure {
                domain: f.domain.as_str(),
                reason: f.reason.to_string(),
                attempts: f.attempts,
            })
            .collect();

        Self {
            checked_at,
            host: config.host.as_str(),
            port: config.port,
            classifications: &result.classifications,
            failures,
            warnings: result.warnings.len(),
            ok: !result.any_error && notification_error.is_none(),
            notification_error,
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.ok
    }
}
