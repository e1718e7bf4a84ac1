//! # clicdata-core
//!
//! Core library for ClicData API interaction.
//!
//! This crate holds the session, request dispatcher and paginator that every
//! ClicData call goes through, plus thin resource services on top of them.
//! The `clicdata` command line tool is built on it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clicdata_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> clicdata_core::Result<()> {
//!     let credentials = Credentials::client_credentials("my-client-id", "my-secret");
//!     let mut client = ClicDataClient::with_credentials(credentials, SessionOptions::default())?;
//!
//!     // Every row of data set 42, across all pages
//!     let rows = DataService::new(&mut client)
//!         .get_data(42, OutputFormat::Raw)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  Session, token refresh, dispatch, pagination
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Account, dashboard, data, schedule services
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  config.toml, secrets from the environment
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, logging, text helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Session, credentials, dispatcher and paginator
//! - [`core`]: Resource services
//! - [`storage`]: Configuration and secret lookup
//! - [`utils`]: Shared utilities
//! - [`display`]: Tabular results and terminal rendering
//! - [`error`]: Hierarchical error system with troubleshooting hints

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use clicdata_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::AppError;

    // Session and dispatch
    pub use crate::api::auth::{AuthMethod, Credentials};
    pub use crate::api::client::ClicDataClient;
    pub use crate::api::pagination::PagePolicy;
    pub use crate::api::request::{ApiRequest, ApiResponse, Verb};
    pub use crate::api::session::{Session, SessionOptions};

    // Services
    pub use crate::core::services::account_service::AccountService;
    pub use crate::core::services::config_service::{ConfigService, ConnectionSettings};
    pub use crate::core::services::dashboard_service::DashboardService;
    pub use crate::core::services::data_service::DataService;
    pub use crate::core::services::schedule_service::ScheduleService;

    // Storage
    pub use crate::storage::config::Config;

    // Display utilities
    pub use crate::display::{DataTable, Output, OutputFormat, TableDisplay};
}

/// Business logic layer - resource services.
///
/// - [`core::services::account_service`]: Account details and activity
/// - [`core::services::dashboard_service`]: Dashboards, thumbnails and snapshots
/// - [`core::services::data_service`]: Data sets, versions and row maintenance
/// - [`core::services::schedule_service`]: Schedules and triggering
/// - [`core::services::config_service`]: Configuration editing and connection settings
pub mod core;

/// Storage layer - configuration and secret lookup.
///
/// - [`storage::config`]: TOML configuration with environment fallbacks
/// - [`storage::credentials`]: Client secret and password from the environment
pub mod storage;

/// Utilities layer - shared helpers.
///
/// - [`utils::validation`]: URL and argument checks
/// - [`utils::logging`]: verbose console output
/// - [`utils::text`]: Text formatting and truncation
pub mod utils;

/// API layer - session lifecycle and request dispatch.
///
/// - [`api::auth`]: Credential kinds and their Authorization encodings
/// - [`api::session`]: Token acquisition and refresh
/// - [`api::client`]: Authenticated request dispatcher
/// - [`api::pagination`]: `?page=N` walking
/// - [`api::models`]: Request/response data structures
pub mod api;

/// Display layer - tabular results and terminal rendering.
pub mod display;

/// Error handling - hierarchical error system.
///
/// - Domain-specific error variants (API, Auth, Argument, etc.)
/// - Severity levels (Critical, High, Medium, Low)
/// - Troubleshooting hints for common issues
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

#[doc(hidden)]
pub use api::client::ClicDataClient;
#[doc(hidden)]
pub use storage::config::Config;
