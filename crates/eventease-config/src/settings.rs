//! Validated settings structures

use crate::schema::{RawCatalogConfig, RawConfig, RawStorageConfig, RawUser};
use eventease_api::{Identity, Role};
use eventease_util::{DEFAULT_DATABASE_FILENAME, UserId, default_data_dir};
use std::path::PathBuf;

/// Validated settings ready for use by the stores
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,

    /// Credential directory, never empty
    pub users: Vec<UserRecord>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let users = if raw.users.is_empty() {
            default_users()
        } else {
            raw.users.into_iter().map(UserRecord::from_raw).collect()
        };

        Self {
            storage: StorageConfig::from_raw(raw.storage),
            catalog: CatalogConfig::from_raw(raw.catalog),
            users,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            users: default_users(),
        }
    }
}

/// Storage location
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub database: String,
}

impl StorageConfig {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
            database: raw
                .database
                .unwrap_or_else(|| DEFAULT_DATABASE_FILENAME.to_string()),
        }
    }

    /// Full path of the database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_raw(RawStorageConfig::default())
    }
}

/// Catalog behavior
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub seed_demo_data: bool,
}

impl CatalogConfig {
    fn from_raw(raw: RawCatalogConfig) -> Self {
        Self {
            seed_demo_data: raw.seed_demo_data.unwrap_or(true),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

/// One entry of the credential directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl UserRecord {
    fn from_raw(raw: RawUser) -> Self {
        Self {
            id: UserId::new(raw.id),
            name: raw.name,
            email: raw.email,
            password: raw.password,
            role: raw.role,
        }
    }

    /// The identity stored in a session: everything except the password
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Built-in demo accounts
pub fn default_users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            id: UserId::new("1"),
            name: "Admin User".into(),
            email: "admin@eventease.com".into(),
            password: "Admin@123".into(),
            role: Role::Admin,
        },
        UserRecord {
            id: UserId::new("2"),
            name: "John Doe".into(),
            email: "user@eventease.com".into(),
            password: "User@123".into(),
            role: Role::User,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_drops_password() {
        let admin = &default_users()[0];
        let identity = admin.identity();
        assert_eq!(identity.id, admin.id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn configured_users_replace_defaults() {
        let raw = RawConfig {
            config_version: 1,
            storage: RawStorageConfig::default(),
            catalog: RawCatalogConfig::default(),
            users: vec![RawUser {
                id: "9".into(),
                name: "Solo".into(),
                email: "solo@example.com".into(),
                password: "pw".into(),
                role: Role::User,
            }],
        };
        let settings = Settings::from_raw(raw);
        assert_eq!(settings.users.len(), 1);
        assert_eq!(settings.users[0].id.as_str(), "9");
    }
}
