//! Device query and mutation inputs.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use super::filter::{OneOrMany, SortOrder, StringFilterInput};
use super::license_key::LicenseKeyWhere;
use super::{push_to_one_relation, ToOneRelationFilter, WhereInput};

/// Where input for devices. `licenseKey` filters on the key the device
/// is bound to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeviceWhere {
    #[serde(rename = "AND")]
    pub and: Option<OneOrMany<DeviceWhere>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<DeviceWhere>>,
    #[serde(rename = "NOT")]
    pub not: Option<OneOrMany<DeviceWhere>>,
    pub id: Option<StringFilterInput>,
    pub device_hw_id: Option<StringFilterInput>,
    pub device_name: Option<StringFilterInput>,
    pub device_type: Option<StringFilterInput>,
    #[serde(rename = "deviceOS")]
    pub device_os: Option<StringFilterInput>,
    pub license_key_id: Option<StringFilterInput>,
    pub license_key: Option<ToOneRelationFilter<LicenseKeyWhere>>,
}

impl WhereInput for DeviceWhere {
    const TABLE: &'static str = "devices";
    const ALIAS: &'static str = "d";

    fn push_predicate(&self, table: &str, depth: usize, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        if let Some(and) = &self.and {
            for w in and.as_slice() {
                qb.push(" AND ");
                w.push_predicate(table, depth, qb);
            }
        }
        if let Some(or) = &self.or {
            if or.is_empty() {
                qb.push(" AND 0");
            } else {
                qb.push(" AND (");
                for (i, w) in or.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    w.push_predicate(table, depth, qb);
                }
                qb.push(")");
            }
        }
        if let Some(not) = &self.not {
            for w in not.as_slice() {
                qb.push(" AND NOT ");
                w.push_predicate(table, depth, qb);
            }
        }
        if let Some(f) = &self.id {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.id"), qb);
        }
        if let Some(f) = &self.device_hw_id {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.device_hw_id"), qb);
        }
        if let Some(f) = &self.device_name {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.device_name"), qb);
        }
        if let Some(f) = &self.device_type {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.device_type"), qb);
        }
        if let Some(f) = &self.device_os {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.device_os"), qb);
        }
        if let Some(f) = &self.license_key_id {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.license_key_id"), qb);
        }
        if let Some(rel) = &self.license_key {
            qb.push(" AND ");
            push_to_one_relation(rel, table, "license_key_id", depth, qb);
        }
        qb.push(")");
    }
}

/// Order-by input for devices.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeviceOrderBy {
    pub id: Option<SortOrder>,
    pub device_hw_id: Option<SortOrder>,
    pub device_name: Option<SortOrder>,
    pub device_type: Option<SortOrder>,
    #[serde(rename = "deviceOS")]
    pub device_os: Option<SortOrder>,
    pub license_key_id: Option<SortOrder>,
}

impl super::OrderByInput for DeviceOrderBy {
    fn push_terms(&self, table: &str, out: &mut Vec<String>) {
        if let Some(o) = self.id {
            out.push(o.term(&format!("{table}.id")));
        }
        if let Some(o) = self.device_hw_id {
            out.push(o.term(&format!("{table}.device_hw_id")));
        }
        if let Some(o) = self.device_name {
            out.push(o.term(&format!("{table}.device_name")));
        }
        if let Some(o) = self.device_type {
            out.push(o.term(&format!("{table}.device_type")));
        }
        if let Some(o) = self.device_os {
            out.push(o.term(&format!("{table}.device_os")));
        }
        if let Some(o) = self.license_key_id {
            out.push(o.term(&format!("{table}.license_key_id")));
        }
    }
}

/// Create input for devices. All descriptive fields are required;
/// `(deviceHwId, licenseKeyId)` must be unique per key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeviceCreate {
    pub id: Option<String>,
    pub device_hw_id: String,
    pub device_name: String,
    pub device_type: String,
    #[serde(rename = "deviceOS")]
    pub device_os: String,
    pub license_key_id: String,
}

/// Partial update input for devices.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeviceUpdate {
    pub id: Option<String>,
    pub device_hw_id: Option<String>,
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    #[serde(rename = "deviceOS")]
    pub device_os: Option<String>,
    pub license_key_id: Option<String>,
}
