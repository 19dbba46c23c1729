use chrono::{DateTime, Utc};
use std::{fmt, time::Duration};

/// Where to connect and which certificate to ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// TCP/TLS endpoint the socket connects to
    pub connect_host: String,
    pub connect_port: u16,
    /// Domain under test, sent as SNI
    pub virtual_host: String,
    /// Deadline for connect + handshake, measured from the start of the connect
    pub timeout: Duration,
}

impl ProbeTarget {
    #[must_use]
    pub fn new(
        connect_host: impl Into<String>,
        connect_port: u16,
        virtual_host: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            connect_host: connect_host.into(),
            connect_port,
            virtual_host: virtual_host.into(),
            timeout,
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {}:{}",
            self.virtual_host, self.connect_host, self.connect_port
        )
    }
}

/// Result of a single probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Handshake completed and the leaf certificate was decoded
    CertificateFound { not_after: DateTime<Utc> },
    /// Handshake completed but the peer sent no usable certificate
    NoCertificate,
    /// Connect or handshake failed before a certificate could be read
    ConnectionError { message: String },
    /// No outcome within the target's timeout
    Timeout,
}

impl ProbeOutcome {
    /// Whether another attempt could change this outcome
    ///
    /// Only network level failures are transient. A finished handshake, with or
    /// without a certificate, is definitive.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError { .. } | Self::Timeout)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CertificateFound { not_after } => {
                write!(f, "certificate expires {}", not_after.to_rfc3339())
            }
            Self::NoCertificate => write!(f, "no certificate returned"),
            Self::ConnectionError { message } => write!(f, "connection error: {message}"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}
