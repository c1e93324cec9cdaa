//! Raw configuration schema (as parsed from TOML)

use eventease_api::Role;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where durable client storage lives
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Catalog behavior
    #[serde(default)]
    pub catalog: RawCatalogConfig,

    /// Credential directory. Empty means the built-in demo users.
    #[serde(default)]
    pub users: Vec<RawUser>,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory (default: $XDG_DATA_HOME/eventease)
    pub data_dir: Option<PathBuf>,

    /// Database file name inside the data directory
    pub database: Option<String>,
}

/// Catalog settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCatalogConfig {
    /// Seed the demonstration dataset when nothing was ever persisted
    pub seed_demo_data: Option<bool>,
}

/// Credential record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_users() {
        let toml_str = r#"
            config_version = 1

            [[users]]
            id = "1"
            name = "Admin User"
            email = "admin@eventease.com"
            password = "Admin@123"
            role = "admin"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].role, Role::Admin);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn reject_unknown_role() {
        let toml_str = r#"
            config_version = 1

            [[users]]
            id = "1"
            name = "Root"
            email = "root@eventease.com"
            password = "x"
            role = "superuser"
        "#;

        assert!(toml::from_str::<RawConfig>(toml_str).is_err());
    }
}
