//! TLS certificate probing
//!
//! This module opens a TLS connection to a shared front-end host while asking
//! for a specific virtual host (SNI), and reports the expiry of the leaf
//! certificate the server answers with.
//!
//! # Module Organization
//!
//! - `target` - Probe targets and tagged probe outcomes
//! - `probe` - The TLS handshake and leaf certificate extraction
//! - `verifier` - Certificate verifier used during the probe
//!
//! # Example
//!
//! ```rust,ignore
//! use certpulse::tls::{CertificateProbe, ProbeTarget, TlsProbe};
//! use std::time::Duration;
//!
//! let target = ProbeTarget::new("edge.example.net", 443, "shop.example.com", Duration::from_secs(5));
//! let outcome = TlsProbe.probe(&target).await;
//! ```

pub mod probe;
pub mod target;
pub mod verifier;

// Re-export commonly used types
pub use probe::{CertificateProbe, TlsProbe, ensure_crypto_provider};
pub use target::{ProbeOutcome, ProbeTarget};
pub use verifier::NoVerifier;
