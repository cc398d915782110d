// Configuration endpoints
//
// Listing stored configurations, loading the active one into the session's
// working copy, moving the working copy in and out as a zip archive, and
// activating it.

use std::path::Path;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::{ActivationRequest, Configuration};

const ZIP: &str = "application/zip";

impl GatewayClient {
    /// List all stored configurations.
    ///
    /// `GET /configuration/configurations`
    pub async fn list_configurations(&self) -> Result<Vec<Configuration>, Error> {
        debug!("listing configurations");
        self.get_data("configuration/configurations").await
    }

    /// Load the currently active configuration into the session's working copy.
    ///
    /// `POST /configuration/configurations/load-active`
    pub async fn load_active_configuration(&self) -> Result<(), Error> {
        debug!("loading active configuration");
        self.post_empty(
            "configuration/configurations/load-active",
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    /// Download the working copy as a zip archive.
    ///
    /// `GET /configuration/configurations/export`
    pub async fn export_configuration(&self) -> Result<bytes::Bytes, Error> {
        let path = "configuration/configurations/export";
        let url = self.url(path)?;
        debug!("GET {url}");
        let resp = self
            .send(
                path,
                self.http().get(url).header(ACCEPT, ZIP),
                &[StatusCode::OK],
            )
            .await?;
        Ok(resp.bytes().await?)
    }

    /// Download the working copy into `dest`, replacing any file there.
    ///
    /// Returns the archive size in bytes.
    pub async fn export_configuration_file(&self, dest: &Path) -> Result<u64, Error> {
        let archive = self.export_configuration().await?;
        tokio::fs::write(dest, &archive)
            .await
            .map_err(|source| Error::Archive {
                path: dest.to_path_buf(),
                source,
            })?;
        let size = u64::try_from(archive.len()).unwrap_or(u64::MAX);
        debug!(path = %dest.display(), size, "configuration archive written");
        Ok(size)
    }

    /// Replace the working copy with a zip archive.
    ///
    /// `PUT /configuration/configurations/import`
    pub async fn import_configuration(&self, archive: Vec<u8>) -> Result<(), Error> {
        let path = "configuration/configurations/import";
        let url = self.url(path)?;
        debug!(size = archive.len(), "PUT {url}");
        self.send(
            path,
            self.http()
                .put(url)
                .header(CONTENT_TYPE, ZIP)
                .body(archive),
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    /// Read `src` and import it as the working copy.
    pub async fn import_configuration_file(&self, src: &Path) -> Result<(), Error> {
        let archive = tokio::fs::read(src)
            .await
            .map_err(|source| Error::Archive {
                path: src.to_path_buf(),
                source,
            })?;
        self.import_configuration(archive).await
    }

    /// Activate the working copy.
    ///
    /// `POST /configuration/configurations/activate`
    ///
    /// Returns `false` when the gateway answers but refuses the activation.
    /// Transport failures are returned as errors so callers can tell a
    /// refused activation from a dropped connection.
    pub async fn activate(&self, comment: &str) -> Result<bool, Error> {
        let path = "configuration/configurations/activate";
        let url = self.url(path)?;
        debug!(comment, "POST {url}");
        let resp = self
            .http()
            .post(url)
            .json(&ActivationRequest { comment })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            debug!(%status, "configuration activated");
            return Ok(true);
        }

        let body = resp.text().await.unwrap_or_default();
        warn!(%status, body = %body.chars().take(200).collect::<String>(), "activation refused");
        Ok(false)
    }
}
