//! # Database Models
//!
//! Data structures mapping one-to-one to database tables. Rust fields are
//! snake_case (matching the column names for `sqlx::FromRow`) and
//! serialize as camelCase for API responses.
//!
//! Timestamps are stored as RFC3339 strings: SQLite keeps them as TEXT,
//! and RFC3339 UTC strings compare lexicographically, so ordering and
//! range filters work directly on the stored value.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::device::DeviceCreate;
use crate::schema::license_key::LicenseKeyCreate;
use crate::schema::user::UserCreate;

/// A user account. Owns zero or more license keys.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (generated UUID v4 unless supplied).
    pub id: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Unique email address.
    pub email: String,
}

impl User {
    pub fn new(input: UserCreate) -> Self {
        Self {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: input.name,
            email: input.email,
        }
    }
}

/// A license key: grants a user the right to activate up to
/// `max_devices` devices until `expires`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LicenseKey {
    pub id: String,
    /// Maximum number of devices that may be bound to this key.
    pub max_devices: i64,
    /// Expiration timestamp (RFC3339).
    pub expires: String,
    /// Issue timestamp (RFC3339), defaults to creation time.
    pub issued: String,
    /// Last-modified timestamp (RFC3339), refreshed on every update.
    pub updated_at: String,
    /// Optional language/locale tag for the licensed product.
    pub language: Option<String>,
    /// Whether the key has been activated at least once.
    pub is_activated: bool,
    /// Whether the key is currently enabled.
    pub is_enable: bool,
    /// Owning user.
    pub user_id: String,
}

impl LicenseKey {
    pub fn new(input: LicenseKeyCreate) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            max_devices: input.max_devices,
            expires: input.expires.to_rfc3339(),
            issued: input
                .issued
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| now.clone()),
            updated_at: input.updated_at.map(|d| d.to_rfc3339()).unwrap_or(now),
            language: input.language,
            is_activated: input.is_activated.unwrap_or(false),
            is_enable: input.is_enable.unwrap_or(true),
            user_id: input.user_id,
        }
    }
}

/// A hardware/software endpoint bound to one license key, identified by
/// its hardware id. A given hardware id may appear at most once per key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub device_hw_id: String,
    pub device_name: String,
    pub device_type: String,
    #[serde(rename = "deviceOS")]
    pub device_os: String,
    pub license_key_id: String,
}

impl Device {
    pub fn new(input: DeviceCreate) -> Self {
        Self {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            device_hw_id: input.device_hw_id,
            device_name: input.device_name,
            device_type: input.device_type,
            device_os: input.device_os,
            license_key_id: input.license_key_id,
        }
    }
}

/// A named capability flag attached to a license key. Ids are assigned
/// by the database (autoincrement).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LicenseFeature {
    pub id: i64,
    pub name: String,
    pub license_key_id: String,
}
