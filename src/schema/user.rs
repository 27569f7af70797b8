//! User query and mutation inputs.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

use super::filter::{
    double_option, NullableSortOrder, OneOrMany, SortOrder, StringFilterInput,
    StringNullableFilterInput,
};
use super::license_key::LicenseKeyWhere;
use super::{push_list_relation, RelationListFilter, WhereInput};

/// Where input for users. `licenseKey` filters on the user's license
/// keys (every/some/none).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserWhere {
    #[serde(rename = "AND")]
    pub and: Option<OneOrMany<UserWhere>>,
    #[serde(rename = "OR")]
    pub or: Option<Vec<UserWhere>>,
    #[serde(rename = "NOT")]
    pub not: Option<OneOrMany<UserWhere>>,
    pub id: Option<StringFilterInput>,
    /// Bare `null` means IS NULL, like the nullable filter's `equals`.
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<StringNullableFilterInput>>,
    pub email: Option<StringFilterInput>,
    pub license_key: Option<RelationListFilter<LicenseKeyWhere>>,
}

impl WhereInput for UserWhere {
    const TABLE: &'static str = "users";
    const ALIAS: &'static str = "u";

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
        match &self.name {
            Some(Some(f)) => {
                qb.push(" AND ");
                f.push_sql(&format!("{table}.name"), qb);
            }
            Some(None) => {
                qb.push(" AND ")
                    .push(format!("{table}.name"))
                    .push(" IS NULL");
            }
            None => {}
        }
        if let Some(f) = &self.email {
            qb.push(" AND ");
            f.push_sql(&format!("{table}.email"), qb);
        }
        if let Some(rel) = &self.license_key {
            qb.push(" AND ");
            push_list_relation(rel, table, "id", "user_id", depth, qb);
        }
        qb.push(")");
    }
}

/// Order-by input for users.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserOrderBy {
    pub id: Option<SortOrder>,
    pub name: Option<NullableSortOrder>,
    pub email: Option<SortOrder>,
}

impl super::OrderByInput for UserOrderBy {
    fn push_terms(&self, table: &str, out: &mut Vec<String>) {
        if let Some(o) = self.id {
            out.push(o.term(&format!("{table}.id")));
        }
        if let Some(o) = &self.name {
            out.push(o.term(&format!("{table}.name")));
        }
        if let Some(o) = self.email {
            out.push(o.term(&format!("{table}.email")));
        }
    }
}

/// Create input for users. `id` may be supplied by the client; one is
/// generated otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserCreate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: String,
}

/// Partial update input for users. An absent field leaves the column
/// untouched; `name: null` clears the name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    pub email: Option<String>,
}
