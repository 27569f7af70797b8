//! License key query and mutation inputs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use super::device::DeviceWhere;
use super::filter::{
    double_option, BoolFilterInput, DateTimeFilterInput, IntFilterInput, NullableSortOrder,
    OneOrMany, SortOrder, StringFilterInput, StringNullableFilterInput,
};
use super::license_feature::LicenseFeatureWhere;
use super::user::UserWhere;
use super::{
    push_list_relation, push_to_one_relation, RelationListFilter, ToOneRelationFilter, WhereInput,
};

/// Where input for license keys. `features` and `devices` filter on the
/// key's attached rows; `user` filters on the owning user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseKeyWhere {
    #[serde(rename = "AND")]
    pub and: Option<OneOrMany<LicenseKeyWhere>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<LicenseKeyWhere>>,
    #[serde(rename = "NOT")]
    pub not: Option<OneOrMany<LicenseKeyWhere>>,
    pub id: Option<StringFilterInput>,
    pub max_devices: Option<IntFilterInput>,
    pub expires: Option<DateTimeFilterInput>,
    pub issued: Option<DateTimeFilterInput>,
    pub updated_at: Option<DateTimeFilterInput>,
    /// Bare `null` means IS NULL, like the nullable filter's `equals`.
    #[serde(default, deserialize_with = "double_option")]
    pub language: Option<Option<StringNullableFilterInput>>,
    pub is_activated: Option<BoolFilterInput>,
    pub is_enable: Option<BoolFilterInput>,
    pub user_id: Option<StringFilterInput>,
    pub features: Option<RelationListFilter<LicenseFeatureWhere>>,
    pub devices: Option<RelationListFilter<DeviceWhere>>,
    pub user: Option<ToOneRelationFilter<UserWhere>>,
}

impl WhereInput for LicenseKeyWhere {
    const TABLE: &'static str = "license_keys";
    const ALIAS: &'static str = "lk";

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
        if let Some(f) = &self.max_devices {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.max_devices"), qb);
        }
        if let Some(f) = &self.expires {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.expires"), qb);
        }
        if let Some(f) = &self.issued {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.issued"), qb);
        }
        if let Some(f) = &self.updated_at {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.updated_at"), qb);
        }
        match &self.language {
            Some(Some(f)) => {
                qb.push(" AND ");
                f.push_sql(&format!("{table}.language"), qb);
            }
            Some(None) => {
                qb.push(" AND ")
                    .push(format!("{table}.language"))
                    .push(" IS NULL");
            }
            None => {}
        }
        if let Some(f) = &self.is_activated {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.is_activated"), qb);
        }
        if let Some(f) = &self.is_enable {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.is_enable"), qb);
        }
        if let Some(f) = &self.user_id {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.user_id"), qb);
        }
        if let Some(rel) = &self.features {
            qb.push(" AND ");
            push_list_relation(rel, table, "id", "license_key_id", depth, qb);
        }
        if let Some(rel) = &self.devices {
            qb.push(" AND ");
            push_list_relation(rel, table, "id", "license_key_id", depth, qb);
        }
        if let Some(rel) = &self.user {
            qb.push(" AND ");
            push_to_one_relation(rel, table, "user_id", depth, qb);
        }
        qb.push(")");
    }
}

/// Order-by input for license keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseKeyOrderBy {
    pub id: Option<SortOrder>,
    pub max_devices: Option<SortOrder>,
    pub expires: Option<SortOrder>,
    pub issued: Option<SortOrder>,
    pub updated_at: Option<SortOrder>,
    pub language: Option<NullableSortOrder>,
    pub is_activated: Option<SortOrder>,
    pub is_enable: Option<SortOrder>,
    pub user_id: Option<SortOrder>,
}

impl super::OrderByInput for LicenseKeyOrderBy {
    fn push_terms(&self, table: &str, out: &mut Vec<String>) {
        if let Some(o) = self.id {
            out.push(o.term(&format!("{table}.id")));
        }
        if let Some(o) = self.max_devices {
            out.push(o.term(&format!("{table}.max_devices")));
        }
        if let Some(o) = self.expires {
            out.push(o.term(&format!("{table}.expires")));
        }
        if let Some(o) = self.issued {
            out.push(o.term(&format!("{table}.issued")));
        }
        if let Some(o) = self.updated_at {
            out.push(o.term(&format!("{table}.updated_at")));
        }
        if let Some(o) = &self.language {
            out.push(o.term(&format!("{table}.language")));
        }
        if let Some(o) = self.is_activated {
            out.push(o.term(&format!("{table}.is_activated")));
        }
        if let Some(o) = self.is_enable {
            out.push(o.term(&format!("{table}.is_enable")));
        }
        if let Some(o) = self.user_id {
            out.push(o.term(&format!("{table}.user_id")));
        }
    }
}

/// Create input for license keys. `maxDevices`, `expires` and `userId`
/// are required; `issued` defaults to now, `isActivated` to false and
/// `isEnable` to true.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseKeyCreate {
    pub id: Option<String>,
    pub max_devices: i64,
    pub expires: DateTime<Utc>,
    pub issued: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub is_activated: Option<bool>,
    pub is_enable: Option<bool>,
    pub user_id: String,
}

/// Partial update input for license keys. `updatedAt` is refreshed to
/// the current time when not supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LicenseKeyUpdate {
    pub id: Option<String>,
    pub max_devices: Option<i64>,
    pub expires: Option<DateTime<Utc>>,
    pub issued: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub language: Option<Option<String>>,
    pub is_activated: Option<bool>,
    pub is_enable: Option<bool>,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(w: &LicenseKeyWhere) -> String {
        let mut qb = QueryBuilder::new("");
        w.push_predicate("license_keys", 0, &mut qb);
        qb.into_sql()
    }

    #[test]
    fn scalar_filters_render_on_snake_case_columns() {
        let w: LicenseKeyWhere = serde_json::from_value(json!({
            "maxDevices": { "gte": 2 },
            "isEnable": true,
            "expires": { "gt": "2026-01-01T00:00:00Z" }
        }))
        .unwrap();
        let sql = render(&w);
        assert!(sql.contains("license_keys.max_devices >= ?"));
        assert!(sql.contains("license_keys.is_enable = ?"));
        assert!(sql.contains("license_keys.expires > ?"));
    }

    #[test]
    fn bare_null_language_filter_means_is_null() {
        let w: LicenseKeyWhere = serde_json::from_value(json!({ "language": null })).unwrap();
        assert!(render(&w).contains("license_keys.language IS NULL"));

        let w: LicenseKeyWhere =
            serde_json::from_value(json!({ "language": { "not": null } })).unwrap();
        assert!(render(&w).contains("license_keys.language IS NOT NULL"));
    }

    #[test]
    fn to_one_user_filter_renders_exists() {
        let w: LicenseKeyWhere = serde_json::from_value(json!({
            "user": { "is": { "email": "a@b.c" } }
        }))
        .unwrap();
        let sql = render(&w);
        assert!(sql.contains("EXISTS (SELECT 1 FROM users AS u1"));
        assert!(sql.contains("u1.id = license_keys.user_id"));
    }

    #[test]
    fn nested_relations_get_distinct_aliases() {
        // key -> devices -> licenseKey -> user: three nesting levels
        let w: LicenseKeyWhere = serde_json::from_value(json!({
            "devices": { "some": { "licenseKey": { "user": { "email": "a@b.c" } } } }
        }))
        .unwrap();
        let sql = render(&w);
        assert!(sql.contains("devices AS d1"));
        assert!(sql.contains("license_keys AS lk2"));
        assert!(sql.contains("users AS u3"));
    }

    #[test]
    fn create_applies_to_required_fields_only() {
        let res = serde_json::from_value::<LicenseKeyCreate>(json!({
            "maxDevices": 3,
            "expires": "2030-01-01T00:00:00Z",
            "userId": "user-1"
        }));
        assert!(res.is_ok());

        let res = serde_json::from_value::<LicenseKeyCreate>(json!({
            "maxDevices": 3,
            "userId": "user-1"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn update_language_null_clears() {
        let u: LicenseKeyUpdate = serde_json::from_value(json!({ "language": null })).unwrap();
        assert_eq!(u.language, Some(None));
    }
}
