//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aci_auth_server::lifecycle::{ControlError, ControlLoop};
use aci_auth_server::{start, ArtifactBuilder, AuthMode, BuildError, FixtureConfig};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::task::JoinHandle;

/// Builder returning a fixed payload, counting how often it ran.
#[derive(Default)]
pub struct StubImage {
    pub builds: AtomicUsize,
}

impl ArtifactBuilder for StubImage {
    fn build(&self) -> Result<Vec<u8>, BuildError> {
        let n = self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(format!("stub-image-{n}").into_bytes())
    }
}

/// Builder that always fails.
pub struct FailingImage;

impl ArtifactBuilder for FailingImage {
    fn build(&self) -> Result<Vec<u8>, BuildError> {
        Err(BuildError::Read(std::io::Error::other("packager exploded")))
    }
}

/// A server with its control loop running in the background.
pub struct Fixture {
    pub url: String,
    pub announcement: String,
    control: JoinHandle<Result<Vec<u8>, ControlError>>,
}

impl Fixture {
    /// Start a server and its control loop.
    pub async fn start(mode: AuthMode, builder: Arc<dyn ArtifactBuilder>) -> Self {
        let server = start(mode, &FixtureConfig::default(), builder)
            .await
            .expect("server failed to start");

        let mut announcement = Vec::new();
        server.announce(&mut announcement).unwrap();

        let url = server.url();
        let control = tokio::spawn(ControlLoop::new(Vec::new()).run(server));

        Self {
            url,
            announcement: String::from_utf8(announcement).unwrap(),
            control,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// POST to the server, then return every line the control loop printed.
    pub async fn shutdown(self) -> Vec<String> {
        let res = client().post(&self.url).send().await.expect("server unreachable");
        assert_eq!(res.status(), 200);
        self.wait().await
    }

    /// Wait for the control loop to finish on its own.
    pub async fn wait(self) -> Vec<String> {
        let out = tokio::time::timeout(std::time::Duration::from_secs(15), self.control)
            .await
            .expect("control loop did not stop")
            .unwrap()
            .expect("control loop failed");
        String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
    }
}

/// Client accepting the self-signed certificate.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn basic_header(creds: &str) -> String {
    format!("Basic {}", STANDARD.encode(creds))
}

/// GET `path` with an optional Authorization header, returning status and body.
pub async fn get(fixture: &Fixture, path: &str, auth: Option<&str>) -> (u16, Vec<u8>) {
    let mut req = client().get(fixture.url_for(path));
    if let Some(auth) = auth {
        req = req.header("Authorization", auth);
    }
    let res = req.send().await.expect("server unreachable");
    let status = res.status().as_u16();
    (status, res.bytes().await.unwrap().to_vec())
}

/// Request ID prefix of a diagnostic line.
pub fn line_id(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.split_once(']').map(|(id, _)| id)
}
