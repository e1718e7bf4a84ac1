use super::records_at;
use super::types::{ImageFormat, ImageOutput};
use crate::AppError;
use crate::api::client::ClicDataClient;
use crate::api::request::ApiRequest;
use crate::display::{DataTable, Output, OutputFormat};
use crate::error::ApiError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

pub struct DashboardService<'a> {
    client: &'a mut ClicDataClient,
}

impl<'a> DashboardService<'a> {
    pub fn new(client: &'a mut ClicDataClient) -> Self {
        Self { client }
    }

    /// List dashboards, optionally filtered by name.
    ///
    /// Table output holds the `dashboards` array; raw output is the whole body.
    pub async fn list_dashboards(
        &mut self,
        include_thumbnail: bool,
        name: Option<&str>,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let mut request = ApiRequest::get("dashboard").param("includethumbnail", include_thumbnail);
        if let Some(name) = name {
            request = request.param("name", name);
        }

        let body: Value = self.client.call_checked(request).await?.json()?;
        Ok(match format {
            OutputFormat::Table => {
                Output::Table(DataTable::from_records(&records_at(body, "dashboards")))
            }
            OutputFormat::Raw => Output::Raw(body),
        })
    }

    pub async fn get_thumbnail(
        &mut self,
        rec_id: u32,
        format: ImageFormat,
    ) -> Result<ImageOutput, AppError> {
        self.fetch_image(format!("account/{}/thumbnail", rec_id), format)
            .await
    }

    pub async fn get_snapshot(
        &mut self,
        rec_id: u32,
        format: ImageFormat,
    ) -> Result<ImageOutput, AppError> {
        self.fetch_image(format!("account/{}/snapshot", rec_id), format)
            .await
    }

    async fn fetch_image(
        &mut self,
        suffix: String,
        format: ImageFormat,
    ) -> Result<ImageOutput, AppError> {
        let response = self.client.call_checked(ApiRequest::get(suffix)).await?;
        // The body is base64 text, sometimes wrapped in JSON string quotes.
        let encoded = response.text().trim().trim_matches('"').to_string();

        match format {
            ImageFormat::Base64 => Ok(ImageOutput::Base64(encoded)),
            ImageFormat::Image => {
                let bytes = STANDARD.decode(&encoded).map_err(|e| ApiError::Decode {
                    endpoint: response.endpoint.clone(),
                    message: format!("Invalid base64 image: {}", e),
                })?;
                Ok(ImageOutput::Image(bytes))
            }
        }
    }
}
