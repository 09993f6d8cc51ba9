//! Implements the `SheetStore` trait using the `sheets::Client` to interact with a Google sheet.

use crate::api::{SheetStore, TokenProvider};
use crate::{Config, Result};
use anyhow::Context;
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateValuesRequest, DateTimeRenderOption, Dimension,
    ValueInputOption, ValueRange, ValueRenderOption,
};
use sheets::ClientError;
use tracing::trace;

/// Implements the `SheetStore` trait using the `sheets::Client` to interact with a Google sheet.
/// It takes a `TokenProvider`, on which it calls refresh to keep the token up-to-date.
pub(super) struct GoogleSheet {
    config: Config,
    token_provider: TokenProvider,
    client: sheets::Client,
}

impl GoogleSheet {
    pub(super) async fn new(config: Config, mut token_provider: TokenProvider) -> Result<Self> {
        let client = create_sheets_client(&mut token_provider).await?;
        Ok(Self {
            config,
            token_provider,
            client,
        })
    }

    /// Refreshes the sheets client with a new access token if needed
    async fn refresh_client(&mut self) -> Result<()> {
        self.client = create_sheets_client(&mut self.token_provider).await?;
        Ok(())
    }

    /// The range covering the whole worksheet, e.g. `Sheet1!A:ZZ`.
    fn full_range(&self) -> String {
        format!("{}!A:ZZ", self.config.worksheet())
    }
}

#[async_trait::async_trait]
impl SheetStore for GoogleSheet {
    async fn read_all(&mut self) -> Result<Vec<Vec<String>>> {
        trace!("read_all for {}", self.config.worksheet());
        self.refresh_client().await?;
        let range = self.full_range();
        let response = self
            .client
            .spreadsheets()
            .values_get(
                self.config.spreadsheet_id(),
                &range,
                DateTimeRenderOption::FormattedString,
                Dimension::Rows,
                ValueRenderOption::FormattedValue,
            )
            .await
            .map_err(map_client_error)
            .with_context(|| {
                format!(
                    "Failed to fetch expense data from '{}'. Check that the spreadsheet exists \
                    and is shared with the service account",
                    self.config.sheet_url()
                )
            })?;
        Ok(response.body.values)
    }

    async fn clear(&mut self) -> Result<()> {
        trace!("clear for {}", self.config.worksheet());
        self.refresh_client().await?;
        let range = self.full_range();
        let request = BatchClearValuesRequest {
            ranges: vec![range.clone()],
        };
        self.client
            .spreadsheets()
            .values_batch_clear(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| format!("Failed to clear range: {range}"))?;
        Ok(())
    }

    async fn write_all(&mut self, rows: &[Vec<String>]) -> Result<()> {
        trace!(
            "write_all of {} rows to {}",
            rows.len(),
            self.config.worksheet()
        );
        self.refresh_client().await?;
        let value_range = ValueRange {
            major_dimension: Some(Dimension::Rows),
            range: format!("{}!A1", self.config.worksheet()),
            values: rows.to_vec(),
        };

        let request = BatchUpdateValuesRequest {
            data: vec![value_range],
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };

        self.client
            .spreadsheets()
            .values_batch_update(self.config.spreadsheet_id(), &request)
            .await
            .map_err(map_client_error)
            .with_context(|| "Failed to write rows")?;
        Ok(())
    }
}

/// Creates a new sheets client with a refreshed access token.
async fn create_sheets_client(token_provider: &mut TokenProvider) -> Result<sheets::Client> {
    // Get the access token (will refresh if needed)
    let access_token = token_provider.token_with_refresh().await?;

    // Create sheets client
    // Note: The sheets crate requires client_id, client_secret, and redirect_uri,
    // but we don't need them for API calls, only the access token
    Ok(sheets::Client::new(
        String::new(), // client_id (not needed for API calls with access token)
        String::new(), // client_secret (not needed for API calls with access token)
        String::new(), // redirect_uri (not needed for API calls with access token)
        access_token,
        String::new(), // refresh_token (not needed, we handle refresh ourselves)
    ))
}

fn map_client_error(e: sheets::ClientError) -> anyhow::Error {
    let error_name = match &e {
        ClientError::EmptyRefreshToken => "EmptyRefreshToken".to_string(),
        ClientError::FromUtf8Error(inner) => format!("FromUtf8Error {inner}"),
        ClientError::UrlParserError(inner) => format!("UrlParserError {inner}"),
        ClientError::SerdeJsonError(inner) => format!("SerdeJsonError {inner}"),
        ClientError::ReqwestError(inner) => format!("ReqwestError {inner}"),
        ClientError::InvalidHeaderValue(inner) => format!("InvalidHeaderValue {inner}"),
        ClientError::ReqwestMiddleWareError(inner) => format!("ReqwestMiddleWareError {inner}"),
        ClientError::HttpError { .. } => "HttpError".to_string(),
        ClientError::Other(_) => "Other".to_string(),
    };
    Err::<(), ClientError>(e).context(error_name).err().unwrap()
}
