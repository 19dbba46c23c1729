use crate::{
    cli::actions::Action,
    retry::RetryPolicy,
    scan::ScanConfig,
    severity::Thresholds,
};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use reqwest::Url;
use std::time::Duration;

/// Split a `|` separated domain list, dropping blanks and surrounding whitespace
#[must_use]
pub fn parse_domains(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if the host is missing, the thresholds are inverted, or the
/// webhook is not a valid URL
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let host = matches
        .get_one::<String>("host")
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
        .context("host is required")?;

    let port = matches.get_one::<u16>("port").copied().unwrap_or(443);

    let domains = matches
        .get_one::<String>("domains")
        .map(|raw| parse_domains(raw))
        .unwrap_or_default();

    let webhook = matches
        .get_one::<String>("webhook")
        .map(String::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| Url::parse(url).with_context(|| format!("Invalid webhook URL: {url}")))
        .transpose()?;

    let thresholds = Thresholds {
        error_days: matches.get_one::<i64>("error-days").copied().unwrap_or(7),
        warn_days: matches.get_one::<i64>("warn-days").copied().unwrap_or(28),
    };
    if thresholds.error_days >= thresholds.warn_days {
        bail!(
            "error threshold ({} days) must be lower than warning threshold ({} days)",
            thresholds.error_days,
            thresholds.warn_days
        );
    }

    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(5000);
    let retry = RetryPolicy::new(
        matches.get_one::<u32>("retry-attempts").copied().unwrap_or(3),
        Duration::from_millis(matches.get_one::<u64>("retry-delay").copied().unwrap_or(500)),
    );

    let json = matches.get_flag("json");

    Ok(Action::Scan {
        config: ScanConfig {
            host,
            port,
            timeout: Duration::from_millis(timeout),
            retry,
            thresholds,
        },
        domains,
        webhook,
        json,
    })
}
