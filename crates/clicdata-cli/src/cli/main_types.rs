use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "clicdata")]
#[command(about = "Command line interface tool for interacting with the ClicData API")]
#[command(version)]
#[command(after_help = "Examples:
  clicdata account info                      # Account usage and limits
  clicdata dashboard list --name Sales       # Dashboards named Sales
  clicdata data get 42 --format json         # Every row of data set 42 as JSON
  clicdata data rebuild 42 reload            # Reload data set 42
  clicdata schedule trigger 7                # Run schedule 7 now
  clicdata call get account/activity/users   # Any endpoint, raw response
  clicdata config set --client-id abc        # Store the client id

Environment Variables:
  CLICDATA_URL             API base URL (default https://api.clicdata.com/)
  CLICDATA_AUTH_METHOD     client_credentials (default) or basic
  CLICDATA_CLIENT_ID       Client id
  CLICDATA_CLIENT_SECRET   Client secret for client_credentials
  CLICDATA_USERNAME        User name for basic
  CLICDATA_PASSWORD        Password for basic")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags. Each one overrides config.toml and its environment fallback.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// API base URL
    #[arg(long, global = true, help_heading = "Connection")]
    pub url: Option<String>,

    /// Authentication method: client_credentials or basic
    #[arg(long, global = true, help_heading = "Connection")]
    pub auth_method: Option<String>,

    #[arg(long, global = true, help_heading = "Connection")]
    pub client_id: Option<String>,

    #[arg(
        long,
        global = true,
        env = "CLICDATA_CLIENT_SECRET",
        hide_env_values = true,
        help_heading = "Connection"
    )]
    pub client_secret: Option<String>,

    /// User name for basic authentication
    #[arg(long, global = true, help_heading = "Connection")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(
        long,
        global = true,
        env = "CLICDATA_PASSWORD",
        hide_env_values = true,
        help_heading = "Connection"
    )]
    pub password: Option<String>,

    /// Timeout in seconds applied to every request
    #[arg(long, global = true, help_heading = "Connection")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Account usage and activity
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Dashboards, thumbnails and snapshots
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommands,
    },
    /// Data sets: list, read, create, append, rebuild, delete rows
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },
    /// Schedules: list and trigger
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Call any endpoint and print the raw response
    Call(CallArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Store one configuration value in config.toml
    #[command(after_help = "Keys: url, auth_method, client_id, username, timeout_seconds

Examples:
  clicdata config set client_id abc
  clicdata config set timeout_seconds 30")]
    Set { key: String, value: String },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Usage and limits of the account
    Info {
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Activity of users or dashboards
    Activity {
        /// users or dashboards
        entity: String,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DashboardCommands {
    /// List dashboards
    List {
        /// Only dashboards with this name
        #[arg(long)]
        name: Option<String>,
        /// Include thumbnails in the response
        #[arg(long)]
        thumbnail: bool,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Dashboard thumbnail, as base64 or written to a file
    Thumbnail(ImageArgs),
    /// Dashboard snapshot, as base64 or written to a file
    Snapshot(ImageArgs),
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    pub rec_id: u32,
    /// Write the decoded image here instead of printing base64
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// List data sets
    List {
        #[arg(long)]
        name: Option<String>,
        /// Only data sets with a unique key
        #[arg(long)]
        unique_key: bool,
        /// Only refreshable data sets
        #[arg(long)]
        refresh: bool,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Every row of a data set
    Get {
        rec_id: u32,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Versions of a data set
    Versions {
        rec_id: u32,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Rows of one historical version
    Version {
        rec_id: u32,
        ver_id: u32,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Create an empty data set
    #[command(after_help = "Examples:
  clicdata data create --name Sales --column city:text --column amount:number")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Column as name:type (repeatable)
        #[arg(long = "column", action = clap::ArgAction::Append, required = true)]
        columns: Vec<String>,
    },
    /// Append rows read from a JSON file holding an array of objects
    Append {
        rec_id: u32,
        #[arg(long)]
        file: String,
    },
    /// Create a data set typed after a JSON file's values and fill it
    Import {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        file: String,
    },
    /// Rebuild a data set
    Rebuild {
        rec_id: u32,
        /// reload, recreate, update, updateappend or append
        method: String,
    },
    /// Delete rows matching column=value filters
    DeleteRows {
        rec_id: u32,
        /// Filter as column=value (repeatable)
        #[arg(long = "where", action = clap::ArgAction::Append, required = true)]
        filters: Vec<String>,
        #[arg(long, default_value = "all")]
        multiple_rows: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// List schedules, or show one
    List {
        rec_id: Option<u32>,
        /// Output format: table or json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Run a schedule now
    Trigger { rec_id: u32 },
}

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  clicdata call get data --param name=Sales
  clicdata call post data/42/row --body '{\"data\": []}'")]
pub struct CallArgs {
    /// get, post, put or delete
    pub verb: String,
    /// Path relative to the API base URL
    pub suffix: String,
    /// Query parameter as key=value (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub param: Vec<String>,
    /// Extra header as key=value (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub header: Vec<String>,
    /// JSON body, ignored for get
    #[arg(long)]
    pub body: Option<String>,
}
