//! # schulessen
//!
//! Automates the weekly school-lunch ordering on the SMS portal: log in, scan
//! the menu view for order buttons, place every open order, advance to the
//! next week and report what was found.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schulessen::{Config, OrderRun, Params, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> schulessen::Result<()> {
//! let params = Params::new().set("username", "parent").set("password", "secret");
//! let config = Config::load_with_params("schulessen.yaml", &params)?;
//!
//! let session = Session::launch(&config.browser).await?;
//! session.login(&config).await?;
//! session.open_menu(&config).await?;
//!
//! let run = OrderRun::new(session.accessor(), &config);
//! let report = run.run().await?;
//! println!("{}", report.totals());
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod menu;
pub mod navigator;
pub mod order;
pub mod page;
pub mod placement;
pub mod report;
mod runner;
pub mod scanner;
mod session;

pub use config::{
    BrowserConfig, Config, LoginConfig, MenuSelectors, OnFailure, ParamDef, Params, PortalConfig,
    TimingConfig, Viewport,
};
pub use order::{OrderKind, OrderRecord, WeekOrders};
pub use page::{EokaElement, EokaPage, PageAccessor};
pub use report::RunReport;
pub use runner::OrderRun;
pub use session::Session;

use chrono::NaiveDate;

/// Result type for schulessen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during setup, scanning or order placement.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("page error: {0}")]
    Page(String),

    #[error("login failed: {0}")]
    Login(String),

    #[error("menu page unavailable: {0}")]
    MenuPage(String),

    #[error("{kind} control #{position} has no valid date (value: {value:?}): {reason}")]
    InvalidDate {
        kind: OrderKind,
        position: usize,
        value: Option<String>,
        reason: String,
    },

    #[error("placing the order for {date} did not take effect ({remaining} order buttons left)")]
    Stalled { date: NaiveDate, remaining: usize },
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Login (1) and menu page (2) failures have fixed statuses so scheduled
    /// runs can tell a rejected login from a changed portal.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Login(_) => 1,
            Error::MenuPage(_) => 2,
            Error::InvalidDate { .. } => 3,
            Error::Stalled { .. } => 4,
            _ => 5,
        }
    }
}
