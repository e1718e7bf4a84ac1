use crate::error::{ArgumentError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// Authentication models
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// One page of a paginated endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Page {
    #[serde(default)]
    pub has_more_data: bool,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Column types accepted when creating a data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Datetime,
    Date,
    Percentage,
    Checkbox,
    Dropdown,
    #[serde(rename = "rec_id")]
    RecId,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Text,
        DataType::Number,
        DataType::Datetime,
        DataType::Date,
        DataType::Percentage,
        DataType::Checkbox,
        DataType::Dropdown,
        DataType::RecId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Datetime => "datetime",
            DataType::Date => "date",
            DataType::Percentage => "percentage",
            DataType::Checkbox => "checkbox",
            DataType::Dropdown => "dropdown",
            DataType::RecId => "rec_id",
        }
    }

    pub fn parse_for_column(column: &str, data_type: &str) -> Result<Self, ValidationError> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == data_type.trim().to_ascii_lowercase())
            .ok_or_else(|| ValidationError::UnknownDataType {
                column: column.to_string(),
                data_type: data_type.to_string(),
            })
    }

    /// Pick a column type from the values a column holds.
    ///
    /// Nulls are ignored; a column whose values disagree falls back to text.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<DataType> = None;
        for value in values {
            let current = match value {
                Value::Null => continue,
                Value::Number(_) => DataType::Number,
                Value::Bool(_) => DataType::Checkbox,
                _ => DataType::Text,
            };
            match inferred {
                None => inferred = Some(current),
                Some(previous) if previous != current => return DataType::Text,
                Some(_) => {}
            }
        }
        inferred.unwrap_or(DataType::Text)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Parse a `name:type` pair.
    pub fn parse(pair: &str) -> crate::Result<Self> {
        let (name, data_type) = pair.split_once(':').ok_or_else(|| ArgumentError::InvalidValue {
            field: "column".to_string(),
            reason: format!("'{}' is not in name:type form", pair),
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ArgumentError::MissingValue {
                field: "column name".to_string(),
            }
            .into());
        }
        let data_type = DataType::parse_for_column(name, data_type)?;
        Ok(ColumnDef::new(name, data_type))
    }
}

#[derive(Debug, Serialize)]
pub struct CreateDataRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub columns: &'a [ColumnDef],
}

/// One `{column, value}` pair, used both for appended rows and delete filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub column: String,
    pub value: Value,
}

impl Cell {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Serialize)]
pub struct AppendRowsRequest<'a> {
    pub data: &'a [Row],
}

#[derive(Debug, Serialize)]
pub struct DeleteRowsRequest<'a> {
    pub multiplerows: &'a str,
    pub find: &'a [Cell],
}

/// Ways ClicData can rebuild a data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildMethod {
    Reload,
    Recreate,
    Update,
    UpdateAppend,
    Append,
}

impl RebuildMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebuildMethod::Reload => "reload",
            RebuildMethod::Recreate => "recreate",
            RebuildMethod::Update => "update",
            RebuildMethod::UpdateAppend => "updateappend",
            RebuildMethod::Append => "append",
        }
    }
}

impl FromStr for RebuildMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reload" => Ok(RebuildMethod::Reload),
            "recreate" => Ok(RebuildMethod::Recreate),
            "update" => Ok(RebuildMethod::Update),
            "updateappend" => Ok(RebuildMethod::UpdateAppend),
            "append" => Ok(RebuildMethod::Append),
            _ => Err(ValidationError::InvalidRebuildMethod(s.to_string())),
        }
    }
}

/// Which activity feed to read from `account/activity/{entity}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEntity {
    Users,
    Dashboards,
}

impl ActivityEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityEntity::Users => "users",
            ActivityEntity::Dashboards => "dashboards",
        }
    }
}

impl FromStr for ActivityEntity {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users" => Ok(ActivityEntity::Users),
            "dashboards" => Ok(ActivityEntity::Dashboards),
            _ => Err(ArgumentError::InvalidValue {
                field: "entity".to_string(),
                reason: format!("'{}' is not one of users, dashboards", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_deserialization_with_defaults() {
        let page: Page = serde_json::from_str(r#"{"has_more_data": true, "data": [{"a": 1}]}"#)
            .unwrap();
        assert!(page.has_more_data);
        assert_eq!(page.data.len(), 1);

        let page: Page = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!page.has_more_data);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_data_type_parsing() {
        assert_eq!(
            DataType::parse_for_column("amount", "Number").unwrap(),
            DataType::Number
        );
        assert_eq!(
            DataType::parse_for_column("id", "rec_id").unwrap(),
            DataType::RecId
        );
        match DataType::parse_for_column("when", "timestamp") {
            Err(ValidationError::UnknownDataType { column, data_type }) => {
                assert_eq!(column, "when");
                assert_eq!(data_type, "timestamp");
            }
            other => panic!("Expected UnknownDataType, got {:?}", other),
        }
    }

    #[test]
    fn test_data_type_inference() {
        assert_eq!(DataType::infer(&[json!(1), json!(2.5)]), DataType::Number);
        assert_eq!(DataType::infer(&[json!(null), json!(true)]), DataType::Checkbox);
        assert_eq!(DataType::infer(&[json!("x"), json!(1)]), DataType::Text);
        assert_eq!(DataType::infer(&[json!(null)]), DataType::Text);
    }

    #[test]
    fn test_column_def_parse() {
        let column = ColumnDef::parse("revenue:number").unwrap();
        assert_eq!(column, ColumnDef::new("revenue", DataType::Number));
        assert!(ColumnDef::parse("revenue").is_err());
        assert!(ColumnDef::parse(":number").is_err());
        assert!(ColumnDef::parse("revenue:money").is_err());
    }

    #[test]
    fn test_create_request_serialization() {
        let columns = vec![
            ColumnDef::new("city", DataType::Text),
            ColumnDef::new("id", DataType::RecId),
        ];
        let request = CreateDataRequest {
            name: "Cities",
            description: "",
            columns: &columns,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "Cities",
                "description": "",
                "columns": [
                    {"name": "city", "data_type": "text"},
                    {"name": "id", "data_type": "rec_id"}
                ]
            })
        );
    }

    #[test]
    fn test_delete_request_serialization() {
        let find = vec![Cell::new("city", "Paris")];
        let request = DeleteRowsRequest {
            multiplerows: "all",
            find: &find,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"multiplerows": "all", "find": [{"column": "city", "value": "Paris"}]})
        );
    }

    #[test]
    fn test_rebuild_method_parsing() {
        assert_eq!(
            "updateappend".parse::<RebuildMethod>().unwrap(),
            RebuildMethod::UpdateAppend
        );
        assert!(matches!(
            "refresh".parse::<RebuildMethod>(),
            Err(ValidationError::InvalidRebuildMethod(_))
        ));
    }

    #[test]
    fn test_activity_entity_parsing() {
        assert_eq!(
            "dashboards".parse::<ActivityEntity>().unwrap(),
            ActivityEntity::Dashboards
        );
        assert!("groups".parse::<ActivityEntity>().is_err());
    }
}
