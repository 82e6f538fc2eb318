//! Validation of provider-supplied audio URLs.
//!
//! Some TTS providers answer a synthesis request with a link to the rendered
//! audio instead of the audio itself. Before following such a link the URL is
//! checked against an [`AudioUrlPolicy`]:
//! - `Permissive`: any `http`/`https` URL with a host
//! - `Strict`: `https` only, and the host must not be or resolve to a
//!   private/internal address (SSRF protection)

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::{Host, Url};

/// Errors that can occur during URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL scheme must be HTTPS, got: {0}")]
    HttpsRequired(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL resolves to private/internal IP address: {0}")]
    PrivateIpDetected(IpAddr),

    #[error("Failed to resolve hostname: {0}")]
    DnsResolutionFailed(String),
}

/// How strictly provider-supplied audio URLs are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioUrlPolicy {
    /// HTTPS only, no private or internal hosts
    #[default]
    Strict,
    /// Any HTTP(S) URL with a host
    Permissive,
}

impl AudioUrlPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }

    /// Parse a policy name, falling back to `Strict` for unknown values
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "permissive" | "lenient" | "dev" => Self::Permissive,
            _ => Self::Strict,
        }
    }
}

/// Checks if an IPv4 address is private/internal
///
/// Covers loopback, RFC 1918, link-local, broadcast, unspecified,
/// documentation, CGNAT (100.64.0.0/10) and benchmarking (198.18.0.0/15).
pub fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
        || (octets[0] == 100 && (octets[1] & 0xC0) == 64)
        || (octets[0] == 198 && (octets[1] == 18 || octets[1] == 19))
}

/// Checks if an IPv6 address is private/internal
///
/// Covers loopback, unspecified, link-local (fe80::/10), unique local
/// (fc00::/7), documentation (2001:db8::/32) and IPv4-mapped private addresses.
pub fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    let segments = ip.segments();
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    if segments[0] & 0xFFC0 == 0xFE80 || segments[0] & 0xFE00 == 0xFC00 {
        return true;
    }
    if segments[0] == 0x2001 && segments[1] == 0x0DB8 {
        return true;
    }
    ip.to_ipv4_mapped()
        .map(|v4| is_private_ipv4(&v4))
        .unwrap_or(false)
}

/// Checks if an IP address is private/internal
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_ipv4(v4),
        IpAddr::V6(v6) => is_private_ipv6(v6),
    }
}

/// Validate an audio URL returned by a provider and return it parsed.
///
/// # Example
/// ```rust,ignore
/// use voice_bot::utils::url_validation::{validate_audio_url, AudioUrlPolicy};
///
/// let url = validate_audio_url("https://cdn.example.com/a.wav", AudioUrlPolicy::Strict).await?;
/// ```
pub async fn validate_audio_url(url: &str, policy: AudioUrlPolicy) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "https" && scheme != "http" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    let host = parsed.host().ok_or(UrlValidationError::MissingHost)?;

    if policy == AudioUrlPolicy::Permissive {
        return Ok(parsed);
    }

    if scheme != "https" {
        return Err(UrlValidationError::HttpsRequired(scheme.to_string()));
    }

    let resolved: Vec<IpAddr> = match host {
        Host::Ipv4(ip) => vec![IpAddr::V4(ip)],
        Host::Ipv6(ip) => vec![IpAddr::V6(ip)],
        Host::Domain(domain) => {
            let port = parsed.port_or_known_default().unwrap_or(443);
            tokio::net::lookup_host((domain, port))
                .await
                .map_err(|e| UrlValidationError::DnsResolutionFailed(format!("{domain}: {e}")))?
                .map(|addr| addr.ip())
                .collect()
        }
    };

    if resolved.is_empty() {
        return Err(UrlValidationError::DnsResolutionFailed(format!(
            "No addresses found for {}",
            parsed.host_str().unwrap_or_default()
        )));
    }

    if let Some(ip) = resolved.iter().find(|ip| is_private_ip(ip)) {
        warn!(
            host = parsed.host_str().unwrap_or_default(),
            resolved_ip = %ip,
            "Audio URL resolves to private IP address (SSRF protection)"
        );
        return Err(UrlValidationError::PrivateIpDetected(*ip));
    }

    Ok(parsed)
}
