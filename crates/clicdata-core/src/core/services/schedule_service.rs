use super::records_at;
use crate::AppError;
use crate::api::client::ClicDataClient;
use crate::api::request::ApiRequest;
use crate::display::{Output, OutputFormat};
use serde_json::Value;

pub struct ScheduleService<'a> {
    client: &'a mut ClicDataClient,
}

impl<'a> ScheduleService<'a> {
    pub fn new(client: &'a mut ClicDataClient) -> Self {
        Self { client }
    }

    /// All schedules, or the one with `rec_id`. Both shapes read the `schedules` array.
    pub async fn list_schedules(
        &mut self,
        rec_id: Option<u32>,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let suffix = match rec_id {
            Some(id) => format!("schedule/{}", id),
            None => "schedule".to_string(),
        };
        let body: Value = self.client.call_checked(ApiRequest::get(suffix)).await?.json()?;
        Ok(Output::from_records(format, records_at(body, "schedules")))
    }

    /// Run a schedule now. Returns the server's reply text.
    pub async fn trigger(&mut self, rec_id: u32) -> Result<String, AppError> {
        let suffix = format!("schedule/{}/trigger", rec_id);
        let response = self.client.call_checked(ApiRequest::post(suffix)).await?;
        log::debug!("Triggered schedule {}", rec_id);
        Ok(response.body)
    }
}
