//! Reqwest-backed release feed.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::staging::{StagedInstaller, installer_file_name};
use crate::domain::ports::{UpdateFeed, UpdateFeedError};
use crate::domain::{DownloadProgress, DownloadedUpdate, ReleaseInfo};

/// Reads the release manifest at one URL and downloads installers into a
/// staging directory.
#[derive(Debug, Clone)]
pub struct HttpUpdateFeed {
    client: Client,
    manifest_url: Url,
    staging_dir: PathBuf,
    manifest_timeout: Duration,
}

impl HttpUpdateFeed {
    /// Build a feed for `manifest_url`.
    ///
    /// `timeout` bounds connecting and the whole manifest request. Installer
    /// downloads only bound the connect phase and run until the body is
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the reqwest client cannot
    /// be constructed.
    pub fn new(
        manifest_url: &str,
        staging_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, UpdateFeedError> {
        let manifest_url = Url::parse(manifest_url.trim()).map_err(|error| {
            UpdateFeedError::manifest(format!("invalid feed URL {manifest_url}: {error}"))
        })?;
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|error| UpdateFeedError::transport(error.to_string()))?;
        Ok(Self {
            client,
            manifest_url,
            staging_dir: staging_dir.into(),
            manifest_timeout: timeout,
        })
    }

    fn installer_url(&self, release: &ReleaseInfo) -> Result<Url, UpdateFeedError> {
        self.manifest_url.join(release.url.trim()).map_err(|error| {
            UpdateFeedError::manifest(format!("invalid installer URL {}: {error}", release.url))
        })
    }
}

fn status_error(status: StatusCode, what: &str) -> UpdateFeedError {
    UpdateFeedError::transport(format!("{what} returned status {}", status.as_u16()))
}

#[async_trait]
impl UpdateFeed for HttpUpdateFeed {
    async fn latest_release(&self) -> Result<ReleaseInfo, UpdateFeedError> {
        let response = self
            .client
            .get(self.manifest_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .timeout(self.manifest_timeout)
            .send()
            .await
            .map_err(|error| UpdateFeedError::transport(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "release manifest"));
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| UpdateFeedError::transport(error.to_string()))?;
        let release: ReleaseInfo = serde_json::from_slice(&body)
            .map_err(|error| UpdateFeedError::manifest(error.to_string()))?;
        if release.url.trim().is_empty() {
            return Err(UpdateFeedError::manifest("release has no installer URL"));
        }
        debug!(version = %release.version, "release manifest fetched");
        Ok(release)
    }

    async fn download(
        &self,
        release: &ReleaseInfo,
        progress: UnboundedSender<DownloadProgress>,
    ) -> Result<DownloadedUpdate, UpdateFeedError> {
        let url = self.installer_url(release)?;
        info!(version = %release.version, %url, "downloading installer");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| UpdateFeedError::transport(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "installer download"));
        }
        let total = response
            .content_length()
            .or(release.size)
            .unwrap_or_default();

        let name = installer_file_name(&release.version, &release.url);
        let mut staged = StagedInstaller::create(&self.staging_dir, name).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(error) => {
                    staged.discard().await;
                    return Err(UpdateFeedError::transport(error.to_string()));
                }
            };
            let transferred = match staged.append(&chunk).await {
                Ok(transferred) => transferred,
                Err(error) => {
                    staged.discard().await;
                    return Err(error);
                }
            };
            // The receiver only goes away when the coordinator stops listening.
            let _ = progress.send(DownloadProgress {
                transferred,
                total: total.max(transferred),
            });
        }

        let installer = staged.finish(release.sha256.as_deref()).await?;
        Ok(DownloadedUpdate {
            version: release.version.clone(),
            installer,
        })
    }
}

#[cfg(test)]
mod tests {
    //! End-to-end coverage against a wiremock server.
    use super::*;
    use crate::test_support::cap_fs::{read_file_bytes, scratch_dir};
    use semver::Version;
    use serde_json::json;
    use sha2::{Digest, Sha256};
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed(server: &MockServer, staging: &std::path::Path) -> HttpUpdateFeed {
        HttpUpdateFeed::new(
            &format!("{}/latest.json", server.uri()),
            staging,
            Duration::from_secs(5),
        )
        .expect("feed builds")
    }

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn release(url: &str, sha256: Option<String>) -> ReleaseInfo {
        ReleaseInfo {
            version: Version::new(2, 0, 0),
            url: url.to_owned(),
            sha256,
            size: None,
            release_notes: None,
        }
    }

    #[tokio::test]
    async fn reads_the_manifest() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/latest.json",
            ResponseTemplate::new(200).set_body_json(json!({
                "version": "1.4.0",
                "url": "setup.exe",
                "releaseNotes": "Correcciones"
            })),
        )
        .await;
        let staging = scratch_dir();

        let release = feed(&server, staging.path())
            .latest_release()
            .await
            .expect("manifest decodes");
        assert_eq!(release.version, Version::new(1, 4, 0));
        assert_eq!(release.release_notes.as_deref(), Some("Correcciones"));
    }

    #[tokio::test]
    async fn malformed_manifest_is_reported() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/latest.json",
            ResponseTemplate::new(200).set_body_json(json!({"version": "uno"})),
        )
        .await;
        let staging = scratch_dir();

        let err = feed(&server, staging.path())
            .latest_release()
            .await
            .expect_err("version is not semver");
        assert!(matches!(err, UpdateFeedError::Manifest { .. }));
    }

    #[tokio::test]
    async fn silent_feed_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");
        // Accept connections and never answer them.
        let holder = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        let staging = scratch_dir();
        let feed = HttpUpdateFeed::new(
            &format!("http://{addr}/latest.json"),
            staging.path(),
            Duration::from_secs(1),
        )
        .expect("feed builds");

        let outcome = tokio::time::timeout(Duration::from_secs(5), feed.latest_release())
            .await
            .expect("the manifest request gives up on its own");
        holder.abort();

        let err = outcome.expect_err("no manifest arrived");
        assert!(matches!(err, UpdateFeedError::Transport { .. }));
    }

    #[tokio::test]
    async fn downloads_verifies_and_reports_progress() {
        let payload = vec![7_u8; 64 * 1024];
        let digest = hex::encode(Sha256::digest(&payload));
        let server = MockServer::start().await;
        serve(
            &server,
            "/files/setup.exe",
            ResponseTemplate::new(200).set_body_bytes(payload.clone()),
        )
        .await;
        let staging = scratch_dir();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let downloaded = feed(&server, staging.path())
            .download(&release("files/setup.exe", Some(digest)), tx)
            .await
            .expect("download succeeds");

        assert_eq!(
            read_file_bytes(&downloaded.installer).expect("installer readable"),
            payload
        );
        let mut last = None;
        while let Ok(report) = rx.try_recv() {
            last = Some(report);
        }
        let last = last.expect("at least one progress report");
        assert_eq!(last.transferred, 64 * 1024);
        assert_eq!(last.percent(), 100);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn downloaded_installers_can_be_launched() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/setup.sh",
            ResponseTemplate::new(200).set_body_bytes(b"#!/bin/sh\nexit 0\n".to_vec()),
        )
        .await;
        let staging = scratch_dir();

        let (tx, _rx) = mpsc::unbounded_channel();
        let downloaded = feed(&server, staging.path())
            .download(&release("/setup.sh", None), tx)
            .await
            .expect("download succeeds");

        let status = tokio::process::Command::new(&downloaded.installer)
            .status()
            .await
            .expect("staged installer runs");
        assert!(status.success());
    }

    #[tokio::test]
    async fn digest_mismatch_is_an_integrity_error() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/setup.exe",
            ResponseTemplate::new(200).set_body_bytes(b"tampered".to_vec()),
        )
        .await;
        let staging = scratch_dir();

        let (tx, _rx) = mpsc::unbounded_channel();
        let err = feed(&server, staging.path())
            .download(&release("/setup.exe", Some("00".repeat(32))), tx)
            .await
            .expect_err("digest differs");
        assert!(matches!(err, UpdateFeedError::Integrity { .. }));
    }

    #[tokio::test]
    async fn missing_installer_is_a_transport_error() {
        let server = MockServer::start().await;
        let staging = scratch_dir();

        let (tx, _rx) = mpsc::unbounded_channel();
        let err = feed(&server, staging.path())
            .download(&release("/missing.exe", None), tx)
            .await
            .expect_err("404");
        assert!(matches!(err, UpdateFeedError::Transport { .. }));
    }
}
