//! License feature query and mutation inputs.
//!
//! The relation field keeps its original wire name `LicenseKey` (the
//! schema names this one relation with a leading capital).

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use super::filter::{IntFilterInput, OneOrMany, SortOrder, StringFilterInput};
use super::license_key::LicenseKeyWhere;
use super::{push_to_one_relation, ToOneRelationFilter, WhereInput};

/// Where input for license features.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseFeatureWhere {
    #[serde(rename = "AND")]
    pub and: Option<OneOrMany<LicenseFeatureWhere>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<LicenseFeatureWhere>>,
    #[serde(rename = "NOT")]
    pub not: Option<OneOrMany<LicenseFeatureWhere>>,
    pub id: Option<IntFilterInput>,
    pub name: Option<StringFilterInput>,
    pub license_key_id: Option<StringFilterInput>,
    #[serde(rename = "LicenseKey")]
    pub license_key: Option<ToOneRelationFilter<LicenseKeyWhere>>,
}

impl WhereInput for LicenseFeatureWhere {
    const TABLE: &'static str = "license_features";
    const ALIAS: &'static str = "f";

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
        if let Some(f) = &self.name {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.name"), qb);
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

/// Order-by input for license features.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseFeatureOrderBy {
    pub id: Option<SortOrder>,
    pub name: Option<SortOrder>,
    pub license_key_id: Option<SortOrder>,
}

impl super::OrderByInput for LicenseFeatureOrderBy {
    fn push_terms(&self, table: &str, out: &mut Vec<String>) {
        if let Some(o) = self.id {
            out.push(o.term(&format!("{table}.id")));
        }
        if let Some(o) = self.name {
            out.push(o.term(&format!("{table}.name")));
        }
        if let Some(o) = self.license_key_id {
            out.push(o.term(&format!("{table}.license_key_id")));
        }
    }
}

/// Create input for license features. `id` is assigned by the database
/// unless supplied; `(name, licenseKeyId)` must be unique per key.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseFeatureCreate {
    pub id: Option<i64>,
    pub name: String,
    pub license_key_id: String,
}

/// Partial update input for license features.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseFeatureUpdate {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub license_key_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_shorthand_on_id() {
        let w: LicenseFeatureWhere = serde_json::from_value(json!({ "id": 7 })).unwrap();
        let mut qb = QueryBuilder::new("");
        w.push_predicate("license_features", 0, &mut qb);
        assert!(qb.into_sql().contains("(license_features.id = ?)"));
    }

    #[test]
    fn relation_wire_name_is_capitalized() {
        let w: LicenseFeatureWhere = serde_json::from_value(json!({
            "LicenseKey": { "is": { "isActivated": false } }
        }))
        .unwrap();
        let mut qb = QueryBuilder::new("");
        w.push_predicate("license_features", 0, &mut qb);
        let sql = qb.into_sql();
        assert!(sql.contains("lk1.id = license_features.license_key_id"));

        assert!(
            serde_json::from_value::<LicenseFeatureWhere>(json!({ "licenseKey": {} })).is_err()
        );
    }

    #[test]
    fn create_requires_name_and_key() {
        assert!(
            serde_json::from_value::<LicenseFeatureCreate>(json!({ "name": "offline" })).is_err()
        );
    }
}
