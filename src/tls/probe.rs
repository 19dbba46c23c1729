use super::{NoVerifier, ProbeOutcome, ProbeTarget};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rustls::{ClientConfig, pki_types::ServerName};
use std::{
    future::Future,
    net::IpAddr,
    sync::{Arc, OnceLock},
};
use tokio::{net::TcpStream, time};
use tokio_rustls::{TlsConnector, client::TlsStream};
use tracing::{debug, error};
use x509_parser::prelude::{FromDer, X509Certificate};

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

/// Ensure the rustls crypto provider is initialized
///
/// This should be called before any TLS operations. It's safe to call
/// multiple times as initialization only happens once.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
            && rustls::crypto::CryptoProvider::get_default().is_none()
        {
            error!("failed to install ring crypto provider");
        }
    });
}

/// Something that can fetch the expiry of the certificate served for a target
pub trait CertificateProbe {
    /// Run a single attempt against `target`; never retries
    fn probe(&self, target: &ProbeTarget) -> impl Future<Output = ProbeOutcome> + Send;
}

impl<T: CertificateProbe> CertificateProbe for &T {
    fn probe(&self, target: &ProbeTarget) -> impl Future<Output = ProbeOutcome> + Send {
        (**self).probe(target)
    }
}

/// Probe that performs a real TLS handshake
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsProbe;

impl CertificateProbe for TlsProbe {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome {
        // the deadline covers the TCP connect as well as the handshake; when it
        // fires the pending future is dropped together with its socket
        match time::timeout(target.timeout, fetch_leaf_certificate(target)).await {
            Ok(Ok(Some(not_after))) => ProbeOutcome::CertificateFound { not_after },
            Ok(Ok(None)) => ProbeOutcome::NoCertificate,
            Ok(Err(e)) => ProbeOutcome::ConnectionError {
                message: format!("{e:#}"),
            },
            Err(_) => ProbeOutcome::Timeout,
        }
    }
}

/// Connect, complete the handshake and read the leaf's `notAfter`.
///
/// `Ok(None)` means the handshake succeeded but there was no certificate to read.
async fn fetch_leaf_certificate(target: &ProbeTarget) -> Result<Option<DateTime<Utc>>> {
    let host = target.connect_host.as_str();
    let port = target.connect_port;

    let stream = TcpStream::connect((host, port))
        .await
        .with_context(|| format!("failed to connect to {host}:{port}"))?;

    let server_name = server_name_from_host(&target.virtual_host)
        .with_context(|| format!("invalid server name for TLS probe: {}", target.virtual_host))?;

    let tls_stream = build_tls_connector()
        .connect(server_name, stream)
        .await
        .with_context(|| {
            format!(
                "failed to complete TLS handshake with {host}:{port} for {}",
                target.virtual_host
            )
        })?;

    let not_after = leaf_not_after(&tls_stream);

    // no application data is exchanged, dropping the stream closes the socket
    drop(tls_stream);

    Ok(not_after)
}

fn build_tls_connector() -> TlsConnector {
    ensure_crypto_provider();

    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(NoVerifier))
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}

fn server_name_from_host(host: &str) -> Result<ServerName<'static>> {
    host.parse::<IpAddr>().map_or_else(
        |_| {
            ServerName::try_from(host.to_string())
                .map_err(|_| anyhow!("invalid server name: {host}"))
        },
        |ip| Ok(ServerName::from(ip).to_owned()),
    )
}

fn leaf_not_after(stream: &TlsStream<TcpStream>) -> Option<DateTime<Utc>> {
    let (_, connection) = stream.get_ref();
    let cert = connection.peer_certificates()?.first()?;

    match not_after_from_der(cert.as_ref()) {
        Ok(not_after) => Some(not_after),
        Err(e) => {
            debug!("unusable peer certificate: {e:#}");
            None
        }
    }
}

/// Decode the `notAfter` instant of a DER-encoded certificate
///
/// # Errors
///
/// Returns an error if the certificate cannot be parsed or its expiry is out of range
pub fn not_after_from_der(cert_der: &[u8]) -> Result<DateTime<Utc>> {
    let (_, cert) = X509Certificate::from_der(cert_der)
        .map_err(|e| anyhow!("failed to parse certificate: {e}"))?;
    let raw = cert.validity().not_after.to_datetime();
    DateTime::<Utc>::from_timestamp(raw.unix_timestamp(), raw.nanosecond())
        .ok_or_else(|| anyhow!("invalid certificate expiry timestamp"))
}
