//! Subcommands and their arguments.

use std::path::PathBuf;

use beacon_core::query::{IntegrationSortBy, Pagination};
use beacon_core::types::IntegrationCategory;
use clap::{Args, Subcommand};
use uuid::Uuid;

/// Subcommands of the `beacon` binary.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Lists one page of user integrations.
    List(ListArgs),
    /// Shows the row actions available for an integration.
    Actions(ActionsArgs),
    /// Enables an integration.
    Enable {
        /// Integration identifier.
        id: Uuid,
    },
    /// Disables an integration.
    Disable {
        /// Integration identifier.
        id: Uuid,
    },
    /// Deletes an integration.
    Delete {
        /// Integration identifier.
        id: Uuid,
    },
    /// Sends a test notification through an integration.
    Test {
        /// Integration identifier.
        id: Uuid,
    },
    /// Creates an integration from a JSON endpoint document.
    Create(FileArgs),
    /// Replaces an integration with a JSON endpoint document.
    Update {
        /// Integration identifier.
        id: Uuid,
        #[command(flatten)]
        file: FileArgs,
    },
}

impl Command {
    /// Returns the subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Actions(_) => "actions",
            Self::Enable { .. } => "enable",
            Self::Disable { .. } => "disable",
            Self::Delete { .. } => "delete",
            Self::Test { .. } => "test",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
        }
    }
}

/// Arguments of the `list` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Only integrations whose name contains this text.
    #[arg(long)]
    pub name: Option<String>,

    /// Only enabled or only disabled integrations.
    #[arg(long, value_parser = ["enabled", "disabled"])]
    pub enabled: Option<String>,

    /// 1-based page index.
    #[arg(long, default_value_t = 1)]
    pub page: i64,

    /// Number of integrations per page.
    #[arg(long = "per-page", default_value_t = Pagination::DEFAULT_PAGE_SIZE)]
    pub per_page: u32,

    /// Sort as `column[:ASC|DESC]`.
    #[arg(long)]
    pub sort: Option<IntegrationSortBy>,

    /// Only types listed under this category.
    #[arg(long)]
    pub category: Option<IntegrationCategory>,
}

impl ListArgs {
    /// Returns the requested page.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

/// Arguments of the `actions` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ActionsArgs {
    /// Integration identifier.
    pub id: Uuid,

    /// Caller may read integrations.
    #[arg(long = "can-read")]
    pub can_read: bool,

    /// Caller may modify integrations.
    #[arg(long = "can-write")]
    pub can_write: bool,

    /// Turns on the test action flag.
    #[arg(long = "test-flag")]
    pub test_flag: bool,
}

/// A JSON document given on the command line.
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    /// Path of the JSON endpoint document.
    #[arg(long)]
    pub file: PathBuf,
}
