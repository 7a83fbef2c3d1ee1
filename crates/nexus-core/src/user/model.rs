//! User domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where a user's documents and tasks live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StorageProvider {
    #[default]
    Local,
    Notion,
    GoogleDrive,
    #[serde(rename = "onedrive")]
    #[strum(serialize = "onedrive")]
    OneDrive,
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub primary_data_store: StorageProvider,
    #[serde(default)]
    pub task_storage_provider: StorageProvider,
    /// Root folder or database id inside the data store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_store_root_ref: Option<String>,
}

impl User {
    /// First word of the display name, for greetings.
    pub fn first_name(&self) -> &str {
        self.display_name
            .split_whitespace()
            .next()
            .unwrap_or(self.display_name.as_str())
    }
}
