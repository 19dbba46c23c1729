use crate::{
    alert::{AlertDispatcher, AlertError},
    report::Report,
    scan::{DomainScanner, ScanConfig, ScanResult},
    tls::{CertificateProbe, TlsProbe},
};
use anyhow::{Context, bail};
use chrono::Utc;
use reqwest::Url;
use tracing::{error, info};

/// What a complete run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub result: ScanResult,
    /// Whether a notification was delivered
    pub notified: bool,
    pub notification_error: Option<AlertError>,
}

impl RunOutcome {
    /// A run fails on any certificate problem or on a failed notification
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.result.any_error || self.notification_error.is_some()
    }
}

/// Scan all domains, then notify about warnings
///
/// Notification only depends on warnings: error level domains never appear in
/// it and do not prevent it from being sent for the others.
pub async fn run<P: CertificateProbe>(
    scanner: &DomainScanner<P>,
    domains: &[String],
    dispatcher: &AlertDispatcher,
) -> RunOutcome {
    let result = scanner.scan(domains).await;

    let (notified, notification_error) = match dispatcher.dispatch(&result.warnings).await {
        Ok(notified) => (notified, None),
        Err(e) => {
            error!("failed to send notification: {e}");
            (false, Some(e))
        }
    };

    RunOutcome {
        result,
        notified,
        notification_error,
    }
}

/// Run one scan against the configured host
///
/// # Errors
///
/// Returns an error if the webhook client cannot be built, if the JSON report
/// cannot be serialized, if any domain failed or is past the error threshold, or
/// if the notification could not be delivered
pub async fn start(
    config: ScanConfig,
    domains: &[String],
    webhook: Option<Url>,
    json: bool,
) -> anyhow::Result<()> {
    let dispatcher = AlertDispatcher::new(webhook)?;

    info!(
        "checking {} domain(s) via {}:{} (error < {} days, warning < {} days)",
        domains.len(),
        config.host,
        config.port,
        config.thresholds.error_days,
        config.thresholds.warn_days
    );

    let scanner = DomainScanner::new(TlsProbe, config);
    let outcome = run(&scanner, domains, &dispatcher).await;

    if json {
        let report = Report::new(
            scanner.config(),
            &outcome.result,
            outcome.notification_error.as_ref().map(ToString::to_string),
            Utc::now(),
        );
        let serialized =
            serde_json::to_string(&report).context("failed to serialize run report")?;
        println!("{serialized}");
    }

    if outcome.is_failure() {
        let failed = outcome.result.failed_domains();
        match (&outcome.notification_error, failed.is_empty()) {
            (Some(e), true) => bail!("notification failed: {e}"),
            (Some(e), false) => bail!(
                "certificate check failed for: {}; notification failed: {e}",
                failed.join(", ")
            ),
            (None, _) => bail!("certificate check failed for: {}", failed.join(", ")),
        }
    }

    info!(
        "checked {} domain(s), {} warning(s)",
        outcome.result.classifications.len(),
        outcome.result.warnings.len()
    );

    Ok(())
}
