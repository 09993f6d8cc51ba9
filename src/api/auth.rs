//! Service account authentication for the Google Sheets API.
//!
//! The hosting environment supplies a Google Cloud service account key (installed by
//! `budget init`). There is no interactive consent flow; tokens are obtained and refreshed
//! silently from the key.

use crate::api::OAUTH_SCOPES;
use crate::Result;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

/// Provides access tokens for the Sheets API from a service account key.
pub(crate) struct TokenProvider {
    key: ServiceAccountKey,
    key_path: PathBuf,
}

impl TokenProvider {
    /// Loads the service account key from `credentials_path`.
    ///
    /// # Errors
    /// Returns an error if the key file is missing or cannot be parsed. This is the
    /// halt-before-doing-anything condition for a misconfigured installation.
    pub(crate) async fn load(credentials_path: &Path) -> Result<Self> {
        if !credentials_path.is_file() {
            bail!(
                "Service account credentials not found at '{}'. Run 'budget init' with \
                --credentials to install them",
                credentials_path.display()
            );
        }
        let key = yup_oauth2::read_service_account_key(credentials_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to read the service account key at '{}'",
                    credentials_path.display()
                )
            })?;
        Ok(Self {
            key,
            key_path: credentials_path.to_path_buf(),
        })
    }

    /// Returns a valid access token, refreshing silently if needed.
    pub(crate) async fn token_with_refresh(&mut self) -> Result<String> {
        let authenticator = ServiceAccountAuthenticator::builder(self.key.clone())
            .build()
            .await
            .with_context(|| {
                format!(
                    "Failed to create an authenticator from the service account key at '{}'",
                    self.key_path.display()
                )
            })?;
        let token = authenticator
            .token(OAUTH_SCOPES)
            .await
            .context("Failed to obtain an access token for the service account")?;
        let token = token
            .token()
            .context("The service account token response contained no access token")?;
        Ok(token.to_string())
    }
}
