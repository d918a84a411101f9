//! HTTP background removal client.
//!
//! Posts the image as the multipart field `image`, together with the
//! removal settings as text fields, and expects the cut-out image bytes back.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{PressError, Result};

use super::{BackgroundRemover, RemovalSettings};

/// Blocking client for a remote removal service.
#[derive(Debug, Clone)]
pub struct HttpRemover {
    client: Client,
    url: String,
    settings: RemovalSettings,
}

impl HttpRemover {
    pub fn new(url: impl Into<String>, timeout: Duration, settings: RemovalSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PressError::BackgroundRemovalFailed {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            url: url.into(),
            settings,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn settings(&self) -> &RemovalSettings {
        &self.settings
    }
}

impl BackgroundRemover for HttpRemover {
    fn name(&self) -> &str {
        "http"
    }

    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>> {
        let failed = |message: String| PressError::BackgroundRemovalFailed { message };

        let part = Part::bytes(image.to_vec()).file_name("image");
        let form = self
            .settings
            .form_fields()
            .into_iter()
            .fold(Form::new().part("image", part), |form, (key, value)| {
                form.text(key, value)
            });

        debug!(url = %self.url, bytes = image.len(), "posting image for background removal");
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(|e| failed(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(failed(format!(
                "{} returned {}: {}",
                self.url,
                status,
                body.trim()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| failed(format!("failed to read response body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single canned HTTP response on a local port.
    fn serve_once(status: &'static str, body: &'static [u8]) -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/remove-background", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();

            // Read until the closing multipart boundary arrives.
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.ends_with(b"--\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            request
        });

        (url, handle)
    }

    #[test]
    fn test_returns_response_body() {
        let (url, handle) = serve_once("200 OK", b"cutout");
        let remover =
            HttpRemover::new(url, Duration::from_secs(5), RemovalSettings::default()).unwrap();

        let out = remover.remove_background(b"source-bytes").unwrap();
        assert_eq!(out, b"cutout");

        let request = String::from_utf8_lossy(&handle.join().unwrap()).to_string();
        assert!(request.starts_with("POST /remove-background"));
        assert!(request.contains("name=\"image\""));
        assert!(request.contains("source-bytes"));
        assert!(request.contains("name=\"model\""));
    }

    #[test]
    fn test_error_status_is_removal_failure() {
        let (url, handle) = serve_once("500 Internal Server Error", b"boom");
        let remover =
            HttpRemover::new(url, Duration::from_secs(5), RemovalSettings::default()).unwrap();

        let err = remover.remove_background(b"x").unwrap_err();
        handle.join().unwrap();

        match err {
            PressError::BackgroundRemovalFailed { message } => {
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_service() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let remover = HttpRemover::new(
            format!("http://127.0.0.1:{}/", port),
            Duration::from_secs(2),
            RemovalSettings::default(),
        )
        .unwrap();

        let err = remover.remove_background(b"x").unwrap_err();
        assert!(matches!(err, PressError::BackgroundRemovalFailed { .. }));
    }
}
