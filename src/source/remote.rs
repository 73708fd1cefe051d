use anyhow::{Context, Result, bail};
use std::time::Duration;

use super::parse_geofence;
use crate::config::RemoteConfig;
use crate::domain::GeoPoint;

const USER_AGENT: &str = concat!("geocheck/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a single wait between retries
const MAX_RETRY_WAIT_SECS: u64 = 300;

/// Fetch a geofence document over HTTP
///
/// Retries on 429 and gateway errors with a linearly growing wait, giving up
/// after `config.max_retries` attempts.
pub fn fetch_geofence(url: &str, config: &RemoteConfig) -> Result<Vec<GeoPoint>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    fetch_with_client(&client, url, config)
}

fn fetch_with_client(
    client: &reqwest::blocking::Client,
    url: &str,
    config: &RemoteConfig,
) -> Result<Vec<GeoPoint>> {
    let max_retries = config.max_retries.max(1);
    let mut last_error = None;

    for attempt in 0..max_retries {
        if attempt > 0 {
            let wait_secs = retry_wait_secs(config.retry_backoff_secs, attempt);
            tracing::warn!(
                url,
                wait_secs,
                attempt = attempt + 1,
                max_retries,
                "geofence fetch failed, retrying"
            );
            std::thread::sleep(Duration::from_secs(wait_secs));
        }

        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        match status.as_u16() {
            200 => {
                let body = response
                    .text()
                    .context("Failed to read geofence response body")?;
                let ring = parse_geofence(&body)
                    .with_context(|| format!("Failed to parse geofence from {}", url))?;
                tracing::info!(url, vertices = ring.len(), "fetched geofence");
                return Ok(ring);
            }
            status_code if is_retriable(status_code) => {
                last_error = Some(format!(
                    "{} returned status {} (attempt {})",
                    url,
                    status,
                    attempt + 1
                ));
                continue;
            }
            _ => {
                bail!("{} returned error status: {}", url, status);
            }
        }
    }

    bail!(
        "Geofence fetch failed after {} attempts: {}",
        max_retries,
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    )
}

fn is_retriable(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

fn retry_wait_secs(backoff_secs: u64, attempt: u32) -> u64 {
    backoff_secs
        .saturating_mul(attempt as u64)
        .min(MAX_RETRY_WAIT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    const RING: &str = r#"[{"lat": 0, "lon": 0}, {"lat": 1, "lon": 0}, {"lat": 1, "lon": 1}]"#;

    /// Serve one canned response per connection, in order, on a loopback port
    ///
    /// The handle resolves to the number of requests answered.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/geofence.json", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let mut served = 0;
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    break;
                };

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    concat!(
                        "HTTP/1.1 {} Canned\r\n",
                        "Content-Type: application/json\r\n",
                        "Content-Length: {}\r\n",
                        "Connection: close\r\n\r\n{}"
                    ),
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
                served += 1;
            }
            served
        });

        (url, handle)
    }

    /// Loopback client that ignores any proxy set in the environment
    fn fetch(url: &str, config: &RemoteConfig) -> Result<Vec<GeoPoint>> {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap();
        fetch_with_client(&client, url, config)
    }

    fn config(max_retries: u32) -> RemoteConfig {
        RemoteConfig {
            timeout_secs: 5,
            max_retries,
            retry_backoff_secs: 0,
        }
    }

    #[test]
    fn test_is_retriable() {
        assert!(is_retriable(429));
        assert!(is_retriable(504));
        assert!(is_retriable(503));
        assert!(!is_retriable(404));
        assert!(!is_retriable(500));
    }

    #[test]
    fn test_retry_wait_is_bounded() {
        assert_eq!(retry_wait_secs(5, 1), 5);
        assert_eq!(retry_wait_secs(5, 3), 15);
        assert_eq!(retry_wait_secs(0, 2), 0);
        assert_eq!(retry_wait_secs(u64::MAX, 2), MAX_RETRY_WAIT_SECS);
        assert_eq!(retry_wait_secs(1000, 1), MAX_RETRY_WAIT_SECS);
    }

    #[test]
    fn test_fetch_retries_then_succeeds() {
        let (url, server) = serve(vec![(503, ""), (200, RING)]);

        let ring = fetch(&url, &config(3)).unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring[2], GeoPoint::new(1.0, 1.0));
        assert_eq!(server.join().unwrap(), 2);
    }

    #[test]
    fn test_fetch_does_not_retry_client_errors() {
        let (url, server) = serve(vec![(404, "")]);

        let err = fetch(&url, &config(3)).unwrap_err();
        assert!(err.to_string().contains("returned error status"), "{err:#}");
        assert_eq!(server.join().unwrap(), 1);
    }

    #[test]
    fn test_fetch_gives_up_after_max_retries() {
        let (url, server) = serve(vec![(503, ""), (429, ""), (504, "")]);

        let err = fetch(&url, &config(3)).unwrap_err();
        assert!(
            err.to_string().contains("failed after 3 attempts"),
            "{err:#}"
        );
        assert_eq!(server.join().unwrap(), 3);
    }

    #[test]
    fn test_fetch_reports_bad_body() {
        let (url, server) = serve(vec![(200, r#"{"results": {"geometry": []}}"#)]);

        let err = fetch(&url, &config(3)).unwrap_err();
        assert!(
            err.to_string().contains("Failed to parse geofence from"),
            "{err:#}"
        );
        assert_eq!(server.join().unwrap(), 1);
    }
}
