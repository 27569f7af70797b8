//! # Query Input Schemas
//!
//! Typed request inputs mirroring the database schema one-to-one: per-model
//! where inputs (with `AND`/`OR`/`NOT` nesting and relation filters), sort
//! inputs, and create/update input variants. This module is the validation
//! layer the API exposes; shapes are strict (unknown fields rejected) and
//! field names are camelCase on the wire.
//!
//! Where and order-by inputs render to SQL fragments via
//! `sqlx::QueryBuilder`, with every user-supplied value bound as a
//! parameter.

pub mod device;
pub mod filter;
pub mod license_feature;
pub mod license_key;
pub mod user;

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

pub use filter::{OneOrMany, SortOrder};

/// A per-model where input that can render itself as a SQL predicate.
///
/// `table` is the table name or alias the predicate's columns belong to;
/// `depth` disambiguates aliases when relation filters nest subqueries.
pub trait WhereInput {
    /// Table backing this model.
    const TABLE: &'static str;
    /// Alias prefix used when the table appears in a relation subquery.
    const ALIAS: &'static str;

    fn push_predicate(&self, table: &str, depth: usize, qb: &mut QueryBuilder<'_, Sqlite>);
}

/// A per-model order-by input. Appends `"<col> <dir>"` terms in column
/// declaration order.
pub trait OrderByInput {
    fn push_terms(&self, table: &str, out: &mut Vec<String>);
}

/// Filter on a to-many relation: `every`, `some`, `none`, each taking the
/// related model's where input.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationListFilter<W> {
    pub every: Option<Box<W>>,
    pub some: Option<Box<W>>,
    pub none: Option<Box<W>>,
}

/// Filter on a to-one relation: either `{ "is": ..., "isNot": ... }` or a
/// bare where input (shorthand for `is`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToOneRelationFilter<W> {
    Nested(RelationFilter<W>),
    Where(Box<W>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationFilter<W> {
    pub is: Option<Box<W>>,
    pub is_not: Option<Box<W>>,
}

/// Render a to-many relation filter as correlated EXISTS subqueries.
///
/// `parent_key` is the parent column the child's `child_fk` references.
pub(crate) fn push_list_relation<W: WhereInput>(
    filter: &RelationListFilter<W>,
    parent: &str,
    parent_key: &str,
    child_fk: &str,
    depth: usize,
    qb: &mut QueryBuilder<'_, Sqlite>,
) {
    let alias = format!("{}{}", W::ALIAS, depth + 1);
    let join = |qb: &mut QueryBuilder<'_, Sqlite>| {
        qb.push("SELECT 1 FROM ")
            .push(W::TABLE)
            .push(" AS ")
            .push(&alias)
            .push(" WHERE ")
            .push(&alias)
            .push(".")
            .push(child_fk)
            .push(" = ")
            .push(parent)
            .push(".")
            .push(parent_key);
    };

    qb.push("(1=1");
    if let Some(w) = &filter.some {
        qb.push(" AND EXISTS (");
        join(qb);
        qb.push(" AND ");
        w.push_predicate(&alias, depth + 1, qb);
        qb.push(")");
    }
    if let Some(w) = &filter.none {
        qb.push(" AND NOT EXISTS (");
        join(qb);
        qb.push(" AND ");
        w.push_predicate(&alias, depth + 1, qb);
        qb.push(")");
    }
    if let Some(w) = &filter.every {
        // "every" holds when no related row violates the predicate
        qb.push(" AND NOT EXISTS (");
        join(qb);
        qb.push(" AND NOT ");
        w.push_predicate(&alias, depth + 1, qb);
        qb.push(")");
    }
    qb.push(")");
}

/// Render a to-one relation filter as a correlated EXISTS subquery on the
/// related table's primary key.
pub(crate) fn push_to_one_relation<W: WhereInput>(
    filter: &ToOneRelationFilter<W>,
    parent: &str,
    fk_col: &str,
    depth: usize,
    qb: &mut QueryBuilder<'_, Sqlite>,
) {
    let alias = format!("{}{}", W::ALIAS, depth + 1);
    let join = |qb: &mut QueryBuilder<'_, Sqlite>| {
        qb.push("SELECT 1 FROM ")
            .push(W::TABLE)
            .push(" AS ")
            .push(&alias)
            .push(" WHERE ")
            .push(&alias)
            .push(".id = ")
            .push(parent)
            .push(".")
            .push(fk_col);
    };

    match filter {
        ToOneRelationFilter::Where(w) => {
            qb.push("EXISTS (");
            join(qb);
            qb.push(" AND ");
            w.push_predicate(&alias, depth + 1, qb);
            qb.push(")");
        }
        ToOneRelationFilter::Nested(rel) => {
            qb.push("(1=1");
            if let Some(w) = &rel.is {
                qb.push(" AND EXISTS (");
                join(qb);
                qb.push(" AND ");
                w.push_predicate(&alias, depth + 1, qb);
                qb.push(")");
            }
            if let Some(w) = &rel.is_not {
                qb.push(" AND NOT EXISTS (");
                join(qb);
                qb.push(" AND ");
                w.push_predicate(&alias, depth + 1, qb);
                qb.push(")");
            }
            qb.push(")");
        }
    }
}

/// Arguments accepted by the per-model `POST /api/<model>/query`
/// endpoints: `{ where, orderBy, skip, take }`, all optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryArgs<W, O> {
    #[serde(rename = "where")]
    pub filter: Option<W>,
    pub order_by: Option<OneOrMany<O>>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

impl<W, O> Default for QueryArgs<W, O> {
    fn default() -> Self {
        QueryArgs {
            filter: None,
            order_by: None,
            skip: None,
            take: None,
        }
    }
}

impl<W, O> QueryArgs<W, O> {
    pub const DEFAULT_TAKE: i64 = 100;
    pub const MAX_TAKE: i64 = 500;

    /// Effective `(limit, offset)`: `take` clamped to 1..=500 (default
    /// 100), negative `skip` treated as 0.
    pub fn limits(&self) -> (i64, i64) {
        let limit = self
            .take
            .unwrap_or(Self::DEFAULT_TAKE)
            .clamp(1, Self::MAX_TAKE);
        let offset = self.skip.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Append the WHERE / ORDER BY / LIMIT / OFFSET tail of a list query.
pub(crate) fn push_query_tail<W, O>(
    args: &QueryArgs<W, O>,
    table: &str,
    qb: &mut QueryBuilder<'_, Sqlite>,
) where
    W: WhereInput,
    O: OrderByInput,
{
    if let Some(w) = &args.filter {
        qb.push(" WHERE ");
        w.push_predicate(table, 0, qb);
    }
    let mut terms = Vec::new();
    if let Some(order) = &args.order_by {
        for o in order.as_slice() {
            o.push_terms(table, &mut terms);
        }
    }
    if !terms.is_empty() {
        qb.push(" ORDER BY ").push(terms.join(", "));
    }
    let (limit, offset) = args.limits();
    qb.push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_args_limits_clamp() {
        let args: QueryArgs<user::UserWhere, user::UserOrderBy> =
            serde_json::from_value(json!({ "take": 10000, "skip": -5 })).unwrap();
        assert_eq!(args.limits(), (500, 0));

        let args: QueryArgs<user::UserWhere, user::UserOrderBy> =
            serde_json::from_value(json!({})).unwrap();
        assert_eq!(args.limits(), (100, 0));
    }

    #[test]
    fn query_args_reject_unknown_fields() {
        let res = serde_json::from_value::<QueryArgs<user::UserWhere, user::UserOrderBy>>(json!({
            "limit": 5
        }));
        assert!(res.is_err());
    }

    fn render_user_where(w: &user::UserWhere) -> String {
        let mut qb = QueryBuilder::new("");
        w.push_predicate("users", 0, &mut qb);
        qb.into_sql()
    }

    #[test]
    fn every_relation_filter_negates_violating_rows() {
        let w: user::UserWhere = serde_json::from_value(json!({
            "licenseKey": { "every": { "isEnable": true } }
        }))
        .unwrap();
        let sql = render_user_where(&w);
        // no related row may violate the predicate
        assert!(sql.contains(
            "NOT EXISTS (SELECT 1 FROM license_keys AS lk1 \
             WHERE lk1.user_id = users.id AND NOT (1=1"
        ));
        assert!(sql.contains("lk1.is_enable = ?"));
    }

    #[test]
    fn none_relation_filter_renders_not_exists() {
        let w: user::UserWhere = serde_json::from_value(json!({
            "licenseKey": { "none": { "isActivated": true } }
        }))
        .unwrap();
        let sql = render_user_where(&w);
        assert!(sql.contains(
            "NOT EXISTS (SELECT 1 FROM license_keys AS lk1 \
             WHERE lk1.user_id = users.id AND (1=1"
        ));
        assert!(sql.contains("lk1.is_activated = ?"));
    }

    #[test]
    fn is_not_filter_renders_not_exists_on_the_owner() {
        let w: license_key::LicenseKeyWhere = serde_json::from_value(json!({
            "user": { "isNot": { "email": "a@b.c" } }
        }))
        .unwrap();
        let mut qb = QueryBuilder::new("");
        w.push_predicate("license_keys", 0, &mut qb);
        let sql = qb.into_sql();
        assert!(sql.contains(
            "NOT EXISTS (SELECT 1 FROM users AS u1 \
             WHERE u1.id = license_keys.user_id AND (1=1"
        ));
        assert!(sql.contains("u1.email = ?"));
    }

    #[test]
    fn to_one_relation_accepts_bare_where() {
        let f: ToOneRelationFilter<user::UserWhere> =
            serde_json::from_value(json!({ "email": "a@b.c" })).unwrap();
        assert!(matches!(f, ToOneRelationFilter::Where(_)));

        let f: ToOneRelationFilter<user::UserWhere> =
            serde_json::from_value(json!({ "is": { "email": "a@b.c" } })).unwrap();
        assert!(matches!(f, ToOneRelationFilter::Nested(_)));
    }
}
