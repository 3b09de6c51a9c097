use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use openssl::nid::Nid;
use openssl::ssl::{SslConnector, SslMethod};
use openssl::x509::X509NameRef;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::TlsConfig;
use crate::models::TlsInfo;

const SECONDS_PER_DAY: i64 = 86_400;

/// Opens a verified TLS session to a host and reads what it presented.
pub struct TlsInspector {
    config: TlsConfig,
}

impl TlsInspector {
    pub fn new(config: TlsConfig) -> Self {
        Self { config }
    }

    /// Never fails: any problem collapses into `TlsInfo::invalid()`.
    pub async fn inspect(&self, host: &str) -> TlsInfo {
        let host_for_blocking = host.to_string();
        let port = self.config.port;
        let timeout = self.config.timeout;

        let result =
            tokio::task::spawn_blocking(move || handshake(&host_for_blocking, port, timeout))
                .await;

        match result {
            Ok(Ok(info)) => {
                debug!(
                    host,
                    issuer = ?info.issuer,
                    days = ?info.days_until_expiry,
                    bits = ?info.cipher_strength_bits,
                    "TLS inspection complete"
                );
                info
            }
            Ok(Err(e)) => {
                error!("SSL info failed for {}: {}", host, e);
                TlsInfo::invalid()
            }
            Err(e) => {
                error!("SSL inspection task failed for {}: {}", host, e);
                TlsInfo::invalid()
            }
        }
    }
}

fn handshake(host: &str, port: u16, timeout: Duration) -> Result<TlsInfo> {
    // Default builder verifies the chain against the system trust store
    let connector = SslConnector::builder(SslMethod::tls())?.build();

    let socket_addr = (host, port)
        .to_socket_addrs()
        .map_err(|_| anyhow!("Cannot resolve hostname: {}", host))?
        .next()
        .ok_or_else(|| anyhow!("No addresses found for hostname: {}", host))?;

    let stream = TcpStream::connect_timeout(&socket_addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let ssl_stream = connector
        .connect(host, stream)
        .map_err(|e| anyhow!("TLS handshake failed: {}", e))?;
    let ssl = ssl_stream.ssl();

    let cert = ssl
        .peer_certificate()
        .ok_or_else(|| anyhow!("No certificate presented"))?;

    let expiry = parse_not_after(&cert.not_after().to_string())?;
    let cipher_strength_bits = ssl.current_cipher().map(|c| c.bits().secret);

    Ok(TlsInfo {
        valid: true,
        issuer: issuer_name(cert.issuer_name()),
        days_until_expiry: Some(days_until(expiry, Utc::now())),
        cipher_strength_bits,
    })
}

/// Organization, falling back to common name.
fn issuer_name(name: &X509NameRef) -> Option<String> {
    let entry = |nid: Nid| {
        name.entries_by_nid(nid)
            .next()
            .map(|e| String::from_utf8_lossy(e.data().as_slice()).into_owned())
    };
    entry(Nid::ORGANIZATIONNAME).or_else(|| entry(Nid::COMMONNAME))
}

/// Parse OpenSSL's printed form, e.g. `Mar  4 12:00:00 2025 GMT`.
fn parse_not_after(raw: &str) -> Result<DateTime<Utc>> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&collapsed, "%b %d %H:%M:%S %Y GMT")
        .map(|naive| naive.and_utc())
        .map_err(|e| anyhow!("Unparsable certificate expiry {:?}: {}", raw, e))
}

/// Whole days left, floored. Negative once expired.
fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}
