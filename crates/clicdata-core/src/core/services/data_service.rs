use super::records_at;
use super::types::{CreateAndAppendResult, DataFilter};
use crate::AppError;
use crate::api::client::ClicDataClient;
use crate::api::models::{
    AppendRowsRequest, Cell, ColumnDef, CreateDataRequest, DataType, DeleteRowsRequest,
    RebuildMethod, Row,
};
use crate::api::pagination::PagePolicy;
use crate::api::request::ApiRequest;
use crate::display::{DataTable, Output, OutputFormat};
use crate::error::{ApiError, ArgumentError};
use crate::utils::validation::require_non_empty;
use serde_json::Value;
use std::collections::HashSet;

/// Data set listing, contents, history and row maintenance.
pub struct DataService<'a> {
    client: &'a mut ClicDataClient,
}

impl<'a> DataService<'a> {
    pub fn new(client: &'a mut ClicDataClient) -> Self {
        Self { client }
    }

    /// List the data sets on the account
    pub async fn list_data(
        &mut self,
        filter: &DataFilter,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let mut request = ApiRequest::get("data");
        for (key, value) in filter.params() {
            request = request.param(key, value);
        }
        let body: Value = self.client.call_checked(request).await?.json()?;
        Ok(Output::from_records(format, records_at(body, "data")))
    }

    /// Every row of a data set.
    ///
    /// A failing page ends the read with a warning and whatever rows were already fetched.
    pub async fn get_data(&mut self, rec_id: u32, format: OutputFormat) -> Result<Output, AppError> {
        let records = self
            .client
            .fetch_all(&format!("data/{}", rec_id), PagePolicy::Lenient)
            .await?;
        Ok(Output::from_records(format, records))
    }

    /// Versions of a data set, each tagged with `data_rec_id`
    pub async fn get_versions(
        &mut self,
        rec_id: u32,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let suffix = format!("data/{}/versions", rec_id);
        let body: Value = self.client.call_checked(ApiRequest::get(suffix)).await?.json()?;

        let versions = records_at(body, "versions")
            .into_iter()
            .map(|mut version| {
                if let Value::Object(map) = &mut version {
                    map.insert("data_rec_id".to_string(), Value::from(rec_id));
                }
                version
            })
            .collect();
        Ok(Output::from_records(format, versions))
    }

    /// Rows of one historical version. Any failing page is an error, since a
    /// bad rec_id or version id shows up here as a 4xx.
    pub async fn get_version_data(
        &mut self,
        rec_id: u32,
        ver_id: u32,
        format: OutputFormat,
    ) -> Result<Output, AppError> {
        let records = self
            .client
            .fetch_all(&format!("data/{}/v/{}", rec_id, ver_id), PagePolicy::Strict)
            .await?;
        Ok(Output::from_records(format, records))
    }

    /// Create an empty custom data set and return its rec_id
    pub async fn create_data(
        &mut self,
        name: &str,
        description: &str,
        columns: &[ColumnDef],
    ) -> Result<u32, AppError> {
        require_non_empty("name", name)?;
        validate_columns(columns)?;

        let body = serde_json::to_value(CreateDataRequest {
            name,
            description,
            columns,
        })
        .map_err(|e| ArgumentError::InvalidValue {
            field: "columns".to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .call_checked(ApiRequest::post("data").json(body))
            .await?;

        let text = response.text().trim().trim_matches('"');
        let rec_id = text.parse::<u32>().map_err(|_| ApiError::Decode {
            endpoint: response.endpoint.clone(),
            message: format!("Creating the data set returned: {}", response.text()),
        })?;
        log::debug!("Created data set '{}' as {}", name, rec_id);
        Ok(rec_id)
    }

    /// Append rows to an existing data set. Returns the server's reply text.
    pub async fn append_rows(&mut self, rec_id: u32, rows: &[Row]) -> Result<String, AppError> {
        if rows.is_empty() {
            return Err(ArgumentError::MissingValue {
                field: "rows".to_string(),
            }
            .into());
        }

        let body = serde_json::to_value(AppendRowsRequest { data: rows }).map_err(|e| {
            ArgumentError::InvalidValue {
                field: "rows".to_string(),
                reason: e.to_string(),
            }
        })?;

        let suffix = format!("data/{}/row", rec_id);
        let response = self
            .client
            .call_checked(ApiRequest::post(suffix).json(body))
            .await?;
        Ok(response.body)
    }

    pub async fn append_table(&mut self, rec_id: u32, table: &DataTable) -> Result<String, AppError> {
        validate_table(table)?;
        self.append_rows(rec_id, &rows_from_table(table)).await
    }

    /// Create a data set typed after `table`'s values, then fill it with the table's rows.
    pub async fn create_and_append(
        &mut self,
        name: &str,
        description: &str,
        table: &DataTable,
    ) -> Result<CreateAndAppendResult, AppError> {
        require_non_empty("name", name)?;
        if table.is_empty() {
            return Err(ArgumentError::MissingValue {
                field: "data".to_string(),
            }
            .into());
        }
        validate_table(table)?;

        let columns = infer_columns(table);
        let rec_id = self.create_data(name, description, &columns).await?;
        let status = self.append_table(rec_id, table).await?;
        Ok(CreateAndAppendResult { rec_id, status })
    }

    /// Rebuild a data set with the given method
    pub async fn rebuild(&mut self, rec_id: u32, method: RebuildMethod) -> Result<String, AppError> {
        let suffix = format!("data/{}/{}", rec_id, method.as_str());
        let response = self.client.call_checked(ApiRequest::post(suffix)).await?;
        Ok(response.body)
    }

    /// Delete the rows matching every `{column, value}` filter.
    ///
    /// `multiple_rows` is passed through as `multiplerows`; the API default is `all`.
    pub async fn delete_rows(
        &mut self,
        rec_id: u32,
        filters: &[Cell],
        multiple_rows: &str,
    ) -> Result<String, AppError> {
        if filters.is_empty() {
            return Err(ArgumentError::MissingValue {
                field: "filters".to_string(),
            }
            .into());
        }
        if let Some(cell) = filters.iter().find(|c| c.column.trim().is_empty()) {
            return Err(ArgumentError::InvalidValue {
                field: "filters".to_string(),
                reason: format!("empty column name for value {}", cell.value),
            }
            .into());
        }
        require_non_empty("multiple_rows", multiple_rows)?;

        let body = serde_json::to_value(DeleteRowsRequest {
            multiplerows: multiple_rows,
            find: filters,
        })
        .map_err(|e| ArgumentError::InvalidValue {
            field: "filters".to_string(),
            reason: e.to_string(),
        })?;

        let suffix = format!("data/{}/row", rec_id);
        let response = self
            .client
            .call_checked(ApiRequest::delete(suffix).json(body))
            .await?;
        Ok(response.body)
    }
}

fn validate_columns(columns: &[ColumnDef]) -> Result<(), AppError> {
    if columns.is_empty() {
        return Err(ArgumentError::MissingValue {
            field: "columns".to_string(),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for column in columns {
        require_non_empty("column name", &column.name)?;
        if !seen.insert(column.name.as_str()) {
            return Err(ArgumentError::InvalidValue {
                field: "columns".to_string(),
                reason: format!("duplicate column '{}'", column.name),
            }
            .into());
        }
    }
    Ok(())
}

/// Every row must hold exactly one value per column.
fn validate_table(table: &DataTable) -> Result<(), AppError> {
    match table.first_misshapen_row() {
        Some(index) => Err(ArgumentError::InvalidValue {
            field: "data".to_string(),
            reason: format!(
                "row {} has {} values for {} columns",
                index,
                table.rows[index].len(),
                table.columns.len()
            ),
        }
        .into()),
        None => Ok(()),
    }
}

/// Column definitions inferred from the values in each table column
pub fn infer_columns(table: &DataTable) -> Vec<ColumnDef> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let data_type = DataType::infer(table.rows.iter().filter_map(|row| row.get(index)));
            ColumnDef::new(name.clone(), data_type)
        })
        .collect()
}

/// Convert a table into the `[[{column, value}, ...], ...]` append payload
pub fn rows_from_table(table: &DataTable) -> Vec<Row> {
    table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| Cell::new(column.clone(), value.clone()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> DataTable {
        DataTable::from_records(&[
            json!({"city": "Paris", "sales": 10, "active": true}),
            json!({"city": "Lyon", "sales": 4.5, "active": null}),
        ])
    }

    #[test]
    fn test_infer_columns() {
        let columns = infer_columns(&sample_table());
        assert_eq!(
            columns,
            vec![
                ColumnDef::new("city", DataType::Text),
                ColumnDef::new("sales", DataType::Number),
                ColumnDef::new("active", DataType::Checkbox),
            ]
        );
    }

    #[test]
    fn test_rows_from_table() {
        let rows = rows_from_table(&sample_table());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            vec![
                Cell::new("city", "Lyon"),
                Cell::new("sales", 4.5),
                Cell::new("active", Value::Null),
            ]
        );
    }

    fn short_row_table() -> DataTable {
        DataTable {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec![json!(1)]],
        }
    }

    #[test]
    fn test_infer_columns_tolerates_short_rows() {
        assert_eq!(
            infer_columns(&short_row_table()),
            vec![
                ColumnDef::new("a", DataType::Number),
                ColumnDef::new("b", DataType::Text),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_and_append_rejects_short_rows_before_network() {
        use crate::api::auth::Credentials;
        use crate::api::session::SessionOptions;

        // Nothing listens here; any request would fail with a transport error.
        let mut client = ClicDataClient::with_credentials(
            Credentials::basic("client42", "alice", "pw"),
            SessionOptions::default().with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let mut data = DataService::new(&mut client);

        let result = data.create_and_append("Sales", "", &short_row_table()).await;
        assert!(matches!(
            result,
            Err(AppError::Argument(ArgumentError::InvalidValue { ref field, .. })) if field == "data"
        ));

        let result = data.append_table(7, &short_row_table()).await;
        assert!(matches!(
            result,
            Err(AppError::Argument(ArgumentError::InvalidValue { ref field, .. })) if field == "data"
        ));
    }

    #[test]
    fn test_validate_columns() {
        assert!(validate_columns(&[]).is_err());
        assert!(validate_columns(&[ColumnDef::new("a", DataType::Text)]).is_ok());
        assert!(
            validate_columns(&[
                ColumnDef::new("a", DataType::Text),
                ColumnDef::new("a", DataType::Number)
            ])
            .is_err()
        );
        assert!(validate_columns(&[ColumnDef::new(" ", DataType::Text)]).is_err());
    }
}
