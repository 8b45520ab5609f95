//! Scenario-world methods for forced update BDD tests.

use std::sync::Arc;
use std::time::Duration;

use registro::domain::{UpdateCoordinator, UpdateCoordinatorPorts};
use registro::outbound::update_feed::HttpUpdateFeed;
use registro::test_support::cap_fs::scratch_dir;
use semver::Version;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    ForcedUpdateWorld, NEWER_VERSION, RUNNING_VERSION, RecordingProcess, RecordingSurface,
    RuntimeHandle, StagingHandle,
};

const INSTALLER_LEN: usize = 48 * 1024;

impl ForcedUpdateWorld {
    /// Start the mock feed and the recording doubles.
    fn start(&self) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("create runtime");
        let server = Arc::new(runtime.block_on(MockServer::start()));
        let staging = scratch_dir();

        self.manifest_url
            .set(format!("{}/updates/latest.json", server.uri()));
        self.staging_path.set(staging.path().to_path_buf());
        self.staging.set(StagingHandle(Arc::new(staging)));
        self.surface.set(Arc::new(RecordingSurface::default()));
        self.process.set(Arc::new(RecordingProcess::default()));
        self.server.set(server);
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
    }

    fn serve(&self, route: &str, response: ResponseTemplate) {
        let runtime = self.runtime.get().expect("runtime should be set");
        let server = self.server.get().expect("server should be set");
        runtime.0.block_on(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(response)
                .mount(&server),
        );
    }

    fn publish_manifest(&self, manifest: &Value) {
        self.start();
        self.serve(
            "/updates/latest.json",
            ResponseTemplate::new(200).set_body_json(manifest),
        );
    }

    /// Feed whose latest release is the build under test.
    pub fn publish_running_version(&self) {
        self.publish_manifest(&json!({
            "version": RUNNING_VERSION,
            "url": "registro-setup.exe",
        }));
    }

    /// Feed with a newer release whose installer matches, or not, the
    /// advertised digest.
    pub fn publish_newer_release(&self, corrupted: bool) {
        let installer = vec![0x5a_u8; INSTALLER_LEN];
        let digest = hex::encode(Sha256::digest(&installer));
        self.publish_manifest(&json!({
            "version": NEWER_VERSION,
            "url": "files/registro-setup.exe",
            "sha256": digest,
            "size": INSTALLER_LEN,
        }));
        let served = if corrupted {
            vec![0x00_u8; INSTALLER_LEN]
        } else {
            installer
        };
        self.serve(
            "/updates/files/registro-setup.exe",
            ResponseTemplate::new(200).set_body_bytes(served),
        );
    }

    /// Feed that fails every manifest request.
    pub fn publish_server_error(&self) {
        self.start();
        self.serve(
            "/updates/latest.json",
            ResponseTemplate::new(500).set_body_json(json!({"message": "mantenimiento"})),
        );
    }

    /// Run one check cycle with a coordinator wired to the mock feed.
    pub fn check_once(&self) {
        let runtime = self.runtime.get().expect("runtime should be set");
        let manifest_url = self.manifest_url.get().expect("manifest URL should be set");
        let staging_path = self.staging_path.get().expect("staging path should be set");
        let surface = self.surface.get().expect("surface should be set");
        let process = self.process.get().expect("process should be set");

        let feed = HttpUpdateFeed::new(&manifest_url, staging_path, Duration::from_secs(5))
            .expect("feed builds");
        let coordinator = UpdateCoordinator::new(
            UpdateCoordinatorPorts {
                feed: Arc::new(feed),
                surface,
                process,
            },
            Version::parse(RUNNING_VERSION).expect("running version"),
        );
        let outcome = runtime.0.block_on(coordinator.check_once());
        self.outcome.set(outcome);
    }

    /// Recording surface for assertions.
    pub fn surface(&self) -> Arc<RecordingSurface> {
        self.surface.get().expect("surface should be set")
    }

    /// Recording process for assertions.
    pub fn process(&self) -> Arc<RecordingProcess> {
        self.process.get().expect("process should be set")
    }
}

