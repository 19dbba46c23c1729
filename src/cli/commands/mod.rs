use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("host")
                .env("CERTPULSE_HOST")
                .help("host to connect to, every domain is requested from it via SNI")
                .long("host")
                .short('H')
                .value_name("HOST")
                .required(true),
        )
        .arg(
            Arg::new("port")
                .default_value("443")
                .env("CERTPULSE_PORT")
                .help("TLS port on the host")
                .long("port")
                .short('p')
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new("domains")
                .default_value("")
                .env("CERTPULSE_DOMAINS")
                .help("'|' separated list of domains to check")
                .long("domains")
                .long_help(
                    "Domains whose certificates are checked, separated by '|'.\n\
                    Each domain is sent as the TLS server name (SNI) while the\n\
                    connection itself goes to --host.\n\n\
                    Example: 'shop.example.com|blog.example.com|example.com'\n\n\
                    An empty list checks nothing."
                )
                .short('d')
                .value_name("DOMAINS"),
        )
        .arg(
            Arg::new("webhook")
                .env("CERTPULSE_WEBHOOK_URL")
                .help("chat webhook notified when certificates are about to expire")
                .long("webhook")
                .long_help(
                    "Chat webhook URL.\n\
                    When set, a single JSON message listing every certificate in\n\
                    the warning window is posted after the scan.\n\
                    When unset, no notification is sent."
                )
                .short('w')
                .value_name("URL"),
        )
        .arg(
            Arg::new("error-days")
                .default_value("7")
                .env("CERTPULSE_ERROR_DAYS")
                .help("fail when a certificate has fewer days left than this")
                .long("error-days")
                .value_name("DAYS")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("warn-days")
                .default_value("28")
                .env("CERTPULSE_WARN_DAYS")
                .help("warn when a certificate has fewer days left than this")
                .long("warn-days")
                .value_name("DAYS")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("timeout")
                .default_value("5000")
                .env("CERTPULSE_TIMEOUT_MS")
                .help("connect + handshake timeout per attempt, in milliseconds")
                .long("timeout")
                .short('t')
                .value_name("MS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("retry-attempts")
                .default_value("3")
                .env("CERTPULSE_RETRY_ATTEMPTS")
                .help("maximum connection attempts per domain")
                .long("retry-attempts")
                .value_name("N")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("retry-delay")
                .default_value("500")
                .env("CERTPULSE_RETRY_DELAY_MS")
                .help("fixed delay between attempts, in milliseconds")
                .long("retry-delay")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("json")
                .env("CERTPULSE_JSON")
                .help("print a JSON summary of the run to stdout")
                .long("json")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .help("increase log verbosity (-v debug, -vv trace)")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_new() {
        let cmd = new();
        assert_eq!(cmd.get_name(), "certpulse");
        assert_eq!(
            cmd.get_about().unwrap().to_string(),
            env!("CARGO_PKG_DESCRIPTION")
        );
        assert_eq!(
            cmd.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_new_debug_assert() {
        new().debug_assert();
    }

    #[test]
    fn test_new_no_args() {
        // Temporarily remove environment variable to test required host
        let original_host = std::env::var("CERTPULSE_HOST").ok();
        // SAFETY: This test runs in isolation and we restore the variable afterward
        unsafe {
            std::env::remove_var("CERTPULSE_HOST");
        }

        let cmd = new();
        let matches = cmd.try_get_matches_from(vec!["certpulse"]);
        assert!(matches.is_err());

        // Restore original environment variable if it existed
        if let Some(host) = original_host {
            // SAFETY: Restoring the original state
            unsafe {
                std::env::set_var("CERTPULSE_HOST", host);
            }
        }
    }

    #[test]
    fn test_new_defaults() {
        let cmd = new();
        let m = cmd
            .try_get_matches_from(vec!["certpulse", "--host", "edge.example.net"])
            .unwrap();

        assert_eq!(
            m.get_one::<String>("host"),
            Some(&String::from("edge.example.net"))
        );
        assert_eq!(m.get_one::<u16>("port").copied(), Some(443));
        assert_eq!(m.get_one::<i64>("error-days").copied(), Some(7));
        assert_eq!(m.get_one::<i64>("warn-days").copied(), Some(28));
        assert_eq!(m.get_one::<u64>("timeout").copied(), Some(5000));
        assert_eq!(m.get_one::<u32>("retry-attempts").copied(), Some(3));
        assert_eq!(m.get_one::<u64>("retry-delay").copied(), Some(500));
        assert_eq!(m.get_count("verbose"), 0);
    }

    #[test]
    fn test_new_custom_values() {
        let cmd = new();
        let m = cmd
            .try_get_matches_from(vec![
                "certpulse",
                "-H",
                "edge.example.net",
                "-p",
                "8443",
                "-d",
                "a.example.com|b.example.com",
                "--error-days",
                "3",
                "--warn-days",
                "14",
                "--retry-attempts",
                "5",
                "-vv",
            ])
            .unwrap();

        assert_eq!(m.get_one::<u16>("port").copied(), Some(8443));
        assert_eq!(
            m.get_one::<String>("domains"),
            Some(&String::from("a.example.com|b.example.com"))
        );
        assert_eq!(m.get_one::<i64>("error-days").copied(), Some(3));
        assert_eq!(m.get_one::<i64>("warn-days").copied(), Some(14));
        assert_eq!(m.get_one::<u32>("retry-attempts").copied(), Some(5));
        assert_eq!(m.get_count("verbose"), 2);
    }

    #[test]
    fn test_new_rejects_zero_attempts() {
        let cmd = new();
        let matches = cmd.try_get_matches_from(vec![
            "certpulse",
            "--host",
            "edge.example.net",
            "--retry-attempts",
            "0",
        ]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_new_rejects_zero_port() {
        let cmd = new();
        let matches =
            cmd.try_get_matches_from(vec!["certpulse", "--host", "edge.example.net", "-p", "0"]);
        assert!(matches.is_err());
    }
}
