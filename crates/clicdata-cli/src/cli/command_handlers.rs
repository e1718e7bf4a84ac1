use crate::cli::main_types::{
    AccountCommands, CallArgs, ConfigCommands, DashboardCommands, DataCommands, ImageArgs,
    ScheduleCommands,
};
use clicdata_core::api::client::ClicDataClient;
use clicdata_core::api::models::{ActivityEntity, Cell, ColumnDef, RebuildMethod};
use clicdata_core::api::request::ApiRequest;
use clicdata_core::core::services::account_service::AccountService;
use clicdata_core::core::services::config_service::ConfigService;
use clicdata_core::core::services::dashboard_service::DashboardService;
use clicdata_core::core::services::data_service::DataService;
use clicdata_core::core::services::schedule_service::ScheduleService;
use clicdata_core::core::services::types::{DataFilter, ImageFormat, ImageOutput};
use clicdata_core::display::{DataTable, Output, OutputFormat, TableDisplay};
use clicdata_core::error::{AppError, ArgumentError, StorageError};
use clicdata_core::utils::error_helpers::convert_io_to_display_error;
use clicdata_core::utils::logging::print_verbose;
use clicdata_core::utils::validation::parse_key_value;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

fn parse_format(format: &str) -> Result<OutputFormat, AppError> {
    Ok(format.parse::<OutputFormat>()?)
}

fn print_output(output: &Output) -> Result<(), AppError> {
    let rendered = TableDisplay::new().render_output(output)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).map_err(|e| convert_io_to_display_error(e, "write output"))?;
    Ok(())
}

// Body text as pretty JSON when it parses, verbatim otherwise
fn print_body(body: &str) {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", body),
        },
        Err(_) => println!("{}", body),
    }
}

/// Rows from a JSON file holding an array of objects
fn read_table(path: &str) -> Result<DataTable, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| StorageError::FileIo {
        path: path.to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ArgumentError::InvalidValue {
        field: "file".to_string(),
        reason: format!("{} is not valid JSON: {}", path, e),
    })?;
    match value {
        Value::Array(records) if records.iter().all(Value::is_object) => {
            Ok(DataTable::from_records(&records))
        }
        _ => Err(ArgumentError::InvalidValue {
            field: "file".to_string(),
            reason: format!("{} must hold an array of objects", path),
        }
        .into()),
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                print_verbose(verbose, "Showing effective configuration");

                println!("Current Configuration:");
                println!("=====================");
                for (key, value) in config_service.entries() {
                    println!("  {:<16} {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                print_verbose(verbose, &format!("Setting '{}' in config.toml", key));

                config_service.set_field(&key, &value)?;
                config_service.save_config(config_path)?;
                println!("✅ Set {} to: {}", key, value);
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct AccountHandler;

impl AccountHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: AccountCommands,
        client: &mut ClicDataClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        let mut service = AccountService::new(client);
        let output = match command {
            AccountCommands::Info { format } => {
                let format = parse_format(&format)?;
                print_verbose(verbose, "Fetching account details");
                service.get_account(format).await?
            }
            AccountCommands::Activity { entity, format } => {
                let entity: ActivityEntity = entity.parse()?;
                let format = parse_format(&format)?;
                print_verbose(verbose, &format!("Fetching {} activity", entity.as_str()));
                service.get_activity(entity, format).await?
            }
        };
        print_output(&output)
    }
}

#[derive(Default)]
pub struct DashboardHandler;

impl DashboardHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: DashboardCommands,
        client: &mut ClicDataClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        let mut service = DashboardService::new(client);
        match command {
            DashboardCommands::List {
                name,
                thumbnail,
                format,
            } => {
                let format = parse_format(&format)?;
                print_verbose(
                    verbose,
                    &format!("Listing dashboards - Name: {:?}, Thumbnail: {}", name, thumbnail),
                );
                let output = service
                    .list_dashboards(thumbnail, name.as_deref(), format)
                    .await?;
                print_output(&output)
            }
            DashboardCommands::Thumbnail(args) => {
                let image = service.get_thumbnail(args.rec_id, image_format(&args)).await?;
                emit_image(image, &args, verbose)
            }
            DashboardCommands::Snapshot(args) => {
                let image = service.get_snapshot(args.rec_id, image_format(&args)).await?;
                emit_image(image, &args, verbose)
            }
        }
    }
}

fn image_format(args: &ImageArgs) -> ImageFormat {
    if args.output.is_some() {
        ImageFormat::Image
    } else {
        ImageFormat::Base64
    }
}

fn emit_image(image: ImageOutput, args: &ImageArgs, verbose: bool) -> Result<(), AppError> {
    match (image, &args.output) {
        (ImageOutput::Image(bytes), Some(path)) => {
            std::fs::write(path, &bytes).map_err(|source| StorageError::FileIo {
                path: path.clone(),
                source,
            })?;
            print_verbose(verbose, &format!("Wrote {} bytes", bytes.len()));
            println!("✅ Saved image to {}", path);
        }
        (ImageOutput::Base64(encoded), _) => println!("{}", encoded),
        (ImageOutput::Image(bytes), None) => {
            println!("Received {} bytes of image data", bytes.len());
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct DataHandler;

impl DataHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: DataCommands,
        client: &mut ClicDataClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        let mut service = DataService::new(client);
        match command {
            DataCommands::List {
                name,
                unique_key,
                refresh,
                format,
            } => {
                let format = parse_format(&format)?;
                let filter = DataFilter {
                    name,
                    unique_key_available: unique_key,
                    refresh,
                };
                print_verbose(verbose, &format!("Listing data sets - Filter: {:?}", filter));
                print_output(&service.list_data(&filter, format).await?)
            }
            DataCommands::Get { rec_id, format } => {
                let format = parse_format(&format)?;
                print_verbose(verbose, &format!("Reading all pages of data set {}", rec_id));
                print_output(&service.get_data(rec_id, format).await?)
            }
            DataCommands::Versions { rec_id, format } => {
                let format = parse_format(&format)?;
                print_output(&service.get_versions(rec_id, format).await?)
            }
            DataCommands::Version {
                rec_id,
                ver_id,
                format,
            } => {
                let format = parse_format(&format)?;
                print_verbose(
                    verbose,
                    &format!("Reading version {} of data set {}", ver_id, rec_id),
                );
                print_output(&service.get_version_data(rec_id, ver_id, format).await?)
            }
            DataCommands::Create {
                name,
                description,
                columns,
            } => {
                let columns = columns
                    .iter()
                    .map(|c| ColumnDef::parse(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let rec_id = service.create_data(&name, &description, &columns).await?;
                println!("✅ Created data set '{}' with rec_id {}", name, rec_id);
                Ok(())
            }
            DataCommands::Append { rec_id, file } => {
                let table = read_table(&file)?;
                print_verbose(
                    verbose,
                    &format!("Appending {} rows to data set {}", table.len(), rec_id),
                );
                let reply = service.append_table(rec_id, &table).await?;
                print_body(&reply);
                Ok(())
            }
            DataCommands::Import {
                name,
                description,
                file,
            } => {
                let table = read_table(&file)?;
                let result = service.create_and_append(&name, &description, &table).await?;
                println!("✅ Created data set '{}' with rec_id {}", name, result.rec_id);
                print_body(&result.status);
                Ok(())
            }
            DataCommands::Rebuild { rec_id, method } => {
                let method: RebuildMethod = method.parse()?;
                print_verbose(
                    verbose,
                    &format!("Rebuilding data set {} with {}", rec_id, method.as_str()),
                );
                print_body(&service.rebuild(rec_id, method).await?);
                Ok(())
            }
            DataCommands::DeleteRows {
                rec_id,
                filters,
                multiple_rows,
            } => {
                let filters = filters
                    .iter()
                    .map(|pair| {
                        parse_key_value("where", pair).map(|(column, value)| Cell::new(column, value))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                print_body(&service.delete_rows(rec_id, &filters, &multiple_rows).await?);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct ScheduleHandler;

impl ScheduleHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ScheduleCommands,
        client: &mut ClicDataClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        let mut service = ScheduleService::new(client);
        match command {
            ScheduleCommands::List { rec_id, format } => {
                let format = parse_format(&format)?;
                print_output(&service.list_schedules(rec_id, format).await?)
            }
            ScheduleCommands::Trigger { rec_id } => {
                print_verbose(verbose, &format!("Triggering schedule {}", rec_id));
                print_body(&service.trigger(rec_id).await?);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct CallHandler;

impl CallHandler {
    pub fn new() -> Self {
        Self
    }

    /// Turn command-line parts into a request, failing on any malformed piece
    pub fn build_request(args: &CallArgs) -> Result<ApiRequest, AppError> {
        let params = pairs_to_object("param", &args.param)?;
        let headers = pairs_to_object("header", &args.header)?;
        let body = match &args.body {
            Some(text) => Some(serde_json::from_str::<Value>(text).map_err(|e| {
                ArgumentError::InvalidValue {
                    field: "body".to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(ApiRequest::from_parts(
            &args.verb,
            &args.suffix,
            Some(&params),
            Some(&headers),
            body,
        )?)
    }

    pub async fn handle(
        &self,
        request: ApiRequest,
        client: &mut ClicDataClient,
        verbose: bool,
    ) -> Result<(), AppError> {
        print_verbose(verbose, &format!("{} {}", request.verb, request.suffix));
        let response = client.call(request).await?;
        print_verbose(verbose, &format!("Status: {}", response.status));
        print_body(response.text());
        response.error_for_status()?;
        Ok(())
    }
}

fn pairs_to_object(field: &str, pairs: &[String]) -> Result<Value, AppError> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, value) = parse_key_value(field, pair)?;
        map.insert(key, Value::String(value));
    }
    Ok(Value::Object(map))
}
