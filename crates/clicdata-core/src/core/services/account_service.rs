use crate::AppError;
use crate::api::client::ClicDataClient;
use crate::api::models::ActivityEntity;
use crate::api::request::ApiRequest;
use crate::display::{DataTable, Output, OutputFormat};
use serde_json::Value;

/// Account usage, limits and activity.
pub struct AccountService<'a> {
    client: &'a mut ClicDataClient,
}

impl<'a> AccountService<'a> {
    pub fn new(client: &'a mut ClicDataClient) -> Self {
        Self { client }
    }

    /// Usage and limits of the authenticated account
    pub async fn get_account(&mut self, format: OutputFormat) -> Result<Output, AppError> {
        let body: Value = self.client.call_checked(ApiRequest::get("account")).await?.json()?;
        Ok(shape(format, body))
    }

    /// User or dashboard activity on the account
    pub async fn get_activity(
        &mut self,
        entity: ActivityEntity,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let suffix = format!("account/activity/{}", entity.as_str());
        let body: Value = self.client.call_checked(ApiRequest::get(suffix)).await?.json()?;
        Ok(shape(format, body))
    }
}

fn shape(format: OutputFormat, body: Value) -> Output {
    match format {
        OutputFormat::Table => Output::Table(DataTable::from_value(&body)),
        OutputFormat::Raw => Output::Raw(body),
    }
}
