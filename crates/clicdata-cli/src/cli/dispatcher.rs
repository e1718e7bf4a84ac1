use crate::cli::command_handlers::{
    AccountHandler, CallHandler, ConfigHandler, DashboardHandler, DataHandler, ScheduleHandler,
};
use crate::cli::main_types::{Commands, ConnectionArgs};
use clicdata_core::api::auth::AuthMethod;
use clicdata_core::api::client::ClicDataClient;
use clicdata_core::core::services::config_service::{ConfigService, ConnectionSettings};
use clicdata_core::error::AppError;
use clicdata_core::storage::config::Config;
use clicdata_core::utils::logging::print_verbose;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    verbose: bool,
    overrides: ConnectionArgs,
}

impl Dispatcher {
    fn log_verbose(&self, msg: &str) {
        print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        verbose: bool,
        overrides: ConnectionArgs,
    ) -> Self {
        Self {
            config,
            config_path,
            verbose,
            overrides,
        }
    }

    fn create_config_service(&self) -> ConfigService {
        ConfigService::new(self.config.clone())
    }

    // CLI flag > config.toml > environment
    fn connection_settings(&self) -> ConnectionSettings {
        let mut settings = self.create_config_service().connection_settings();
        let flags = self.overrides.clone();
        if flags.url.is_some() {
            settings.url = flags.url;
        }
        if flags.auth_method.is_some() {
            settings.auth_method = flags.auth_method;
        }
        if flags.client_id.is_some() {
            settings.client_id = flags.client_id;
        }
        if flags.client_secret.is_some() {
            settings.client_secret = flags.client_secret;
        }
        if flags.username.is_some() {
            settings.username = flags.username;
        }
        if flags.password.is_some() {
            settings.password = flags.password;
        }
        if flags.timeout.is_some() {
            settings.timeout_seconds = flags.timeout;
        }
        settings
    }

    // Ask for a missing secret when someone is at the terminal
    fn prompt_missing_secret(&self, settings: &mut ConnectionSettings) {
        if !atty::is(atty::Stream::Stdin) {
            return;
        }
        let method = settings.auth_method().parse::<AuthMethod>();
        let (slot, label) = match method {
            Ok(AuthMethod::ClientCredentials) => (&mut settings.client_secret, "Client secret: "),
            Ok(AuthMethod::Basic) => (&mut settings.password, "Password: "),
            _ => return,
        };
        if slot.as_deref().is_some_and(|s| !s.is_empty()) {
            return;
        }
        match rpassword::prompt_password(label) {
            Ok(secret) if !secret.is_empty() => *slot = Some(secret),
            Ok(_) => {}
            Err(e) => log::warn!("Could not read secret from terminal: {}", e),
        }
    }

    fn create_client(&self) -> Result<ClicDataClient, AppError> {
        let mut settings = self.connection_settings();
        self.prompt_missing_secret(&mut settings);
        self.log_verbose(&format!(
            "Connecting to {} using {} authentication",
            settings.url.as_deref().unwrap_or("the default API URL"),
            settings.auth_method()
        ));
        settings.connect()
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Config { command } => {
                let mut config_service = self.create_config_service();
                ConfigHandler::new().handle(
                    command,
                    &mut config_service,
                    self.config_path.clone(),
                    self.verbose,
                )
            }
            Commands::Account { command } => {
                let mut client = self.create_client()?;
                AccountHandler::new()
                    .handle(command, &mut client, self.verbose)
                    .await
            }
            Commands::Dashboard { command } => {
                let mut client = self.create_client()?;
                DashboardHandler::new()
                    .handle(command, &mut client, self.verbose)
                    .await
            }
            Commands::Data { command } => {
                let mut client = self.create_client()?;
                DataHandler::new()
                    .handle(command, &mut client, self.verbose)
                    .await
            }
            Commands::Schedule { command } => {
                let mut client = self.create_client()?;
                ScheduleHandler::new()
                    .handle(command, &mut client, self.verbose)
                    .await
            }
            Commands::Call(args) => {
                // Reject a malformed call before any client or secret prompt
                let request = CallHandler::build_request(&args)?;
                let mut client = self.create_client()?;
                CallHandler::new().handle(request, &mut client, self.verbose).await
            }
        }
    }
}
