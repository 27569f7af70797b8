//! # Scalar Filters and Sort Inputs
//!
//! Building blocks for the per-model query inputs: typed scalar filters
//! (string/int/datetime/bool, with nullable variants), sort direction
//! inputs, and the shorthand unions that accept either a bare scalar or a
//! filter object, mirroring the schema-to-validator projection of the
//! database schema one-to-one.
//!
//! Every input is strict: unknown fields are rejected at deserialization
//! time. Each filter renders itself into a parameterized SQL predicate
//! through `sqlx::QueryBuilder`; user values are always bound, never
//! interpolated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::{QueryBuilder, Sqlite};

/// Deserialize an `Option<Option<T>>` so that an absent field stays
/// `None` while an explicit JSON `null` becomes `Some(None)`. Used for
/// nullable-column filters and update inputs.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Escape LIKE wildcards so `contains`/`startsWith`/`endsWith` match the
/// needle literally. Patterns are bound with `ESCAPE '\'`.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn term(self, col: &str) -> String {
        format!("{} {}", col, self.as_sql())
    }
}

/// NULL placement for sorts on nullable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullsOrder {
    First,
    Last,
}

/// Sort input for a nullable column: either a bare direction or a
/// `{ "sort": ..., "nulls": ... }` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NullableSortOrder {
    Order(SortOrder),
    WithNulls {
        sort: SortOrder,
        #[serde(default)]
        nulls: Option<NullsOrder>,
    },
}

impl NullableSortOrder {
    pub fn term(&self, col: &str) -> String {
        match self {
            NullableSortOrder::Order(o) => o.term(col),
            NullableSortOrder::WithNulls { sort, nulls } => match nulls {
                None => sort.term(col),
                Some(NullsOrder::First) => format!("{} {} NULLS FIRST", col, sort.as_sql()),
                Some(NullsOrder::Last) => format!("{} {} NULLS LAST", col, sort.as_sql()),
            },
        }
    }
}

/// One element or a list of elements. Several inputs (`AND`, `NOT`,
/// `orderBy`) accept either form on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(Box<T>),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(one) => std::slice::from_ref(one.as_ref()),
            OneOrMany::Many(many) => many,
        }
    }
}

// ---------------------------------------------------------------------
// String filters
// ---------------------------------------------------------------------

/// Filter over a non-nullable TEXT column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringFilter {
    pub equals: Option<String>,
    pub r#in: Option<Vec<String>>,
    pub not_in: Option<Vec<String>>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub not: Option<Box<StringFilterInput>>,
}

/// Bare string shorthand or a full [`StringFilter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringFilterInput {
    Value(String),
    Filter(StringFilter),
}

impl StringFilterInput {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            StringFilterInput::Value(v) => {
                qb.push("(")
                    .push(col)
                    .push(" = ")
                    .push_bind(v.clone())
                    .push(")");
            }
            StringFilterInput::Filter(f) => f.push_sql(col, qb),
        }
    }
}

impl StringFilter {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        if let Some(v) = &self.equals {
            qb.push(" AND ").push(col).push(" = ").push_bind(v.clone());
        }
        push_in_list(col, self.r#in.as_deref(), false, qb, |qb, v| {
            qb.push_bind(v.clone());
        });
        push_in_list(col, self.not_in.as_deref(), true, qb, |qb, v| {
            qb.push_bind(v.clone());
        });
        if let Some(v) = &self.lt {
            qb.push(" AND ").push(col).push(" < ").push_bind(v.clone());
        }
        if let Some(v) = &self.lte {
            qb.push(" AND ").push(col).push(" <= ").push_bind(v.clone());
        }
        if let Some(v) = &self.gt {
            qb.push(" AND ").push(col).push(" > ").push_bind(v.clone());
        }
        if let Some(v) = &self.gte {
            qb.push(" AND ").push(col).push(" >= ").push_bind(v.clone());
        }
        if let Some(v) = &self.contains {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("%{}%", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        if let Some(v) = &self.starts_with {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("{}%", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        if let Some(v) = &self.ends_with {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("%{}", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        if let Some(f) = &self.not {
            qb.push(" AND NOT ");
            f.push_sql(col, qb);
        }
        qb.push(")");
    }
}

/// Filter over a nullable TEXT column. `equals`/`not` accept JSON `null`
/// to express IS NULL / IS NOT NULL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringNullableFilter {
    #[serde(default, deserialize_with = "double_option")]
    pub equals: Option<Option<String>>,
    pub r#in: Option<Vec<String>>,
    pub not_in: Option<Vec<String>>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub not: Option<Option<Box<StringNullableFilterInput>>>,
}

/// Bare string, JSON `null`, or a full [`StringNullableFilter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringNullableFilterInput {
    Value(Option<String>),
    Filter(StringNullableFilter),
}

impl StringNullableFilterInput {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            StringNullableFilterInput::Value(None) => {
                qb.push("(").push(col).push(" IS NULL)");
            }
            StringNullableFilterInput::Value(Some(v)) => {
                qb.push("(")
                    .push(col)
                    .push(" = ")
                    .push_bind(v.clone())
                    .push(")");
            }
            StringNullableFilterInput::Filter(f) => f.push_sql(col, qb),
        }
    }
}

impl StringNullableFilter {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        match &self.equals {
            Some(None) => {
                qb.push(" AND ").push(col).push(" IS NULL");
            }
            Some(Some(v)) => {
                qb.push(" AND ").push(col).push(" = ").push_bind(v.clone());
            }
            None => {}
        }
        push_in_list(col, self.r#in.as_deref(), false, qb, |qb, v| {
            qb.push_bind(v.clone());
        });
        push_in_list(col, self.not_in.as_deref(), true, qb, |qb, v| {
            qb.push_bind(v.clone());
        });
        if let Some(v) = &self.lt {
            qb.push(" AND ").push(col).push(" < ").push_bind(v.clone());
        }
        if let Some(v) = &self.lte {
            qb.push(" AND ").push(col).push(" <= ").push_bind(v.clone());
        }
        if let Some(v) = &self.gt {
            qb.push(" AND ").push(col).push(" > ").push_bind(v.clone());
        }
        if let Some(v) = &self.gte {
            qb.push(" AND ").push(col).push(" >= ").push_bind(v.clone());
        }
        if let Some(v) = &self.contains {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("%{}%", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        if let Some(v) = &self.starts_with {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("{}%", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        if let Some(v) = &self.ends_with {
            qb.push(" AND ")
                .push(col)
                .push(" LIKE ")
                .push_bind(format!("%{}", escape_like(v)))
                .push(" ESCAPE '\\'");
        }
        match &self.not {
            Some(None) => {
                qb.push(" AND ").push(col).push(" IS NOT NULL");
            }
            Some(Some(f)) => {
                qb.push(" AND NOT ");
                f.push_sql(col, qb);
            }
            None => {}
        }
        qb.push(")");
    }
}

// ---------------------------------------------------------------------
// Int / DateTime / Bool filters
// ---------------------------------------------------------------------

/// Filter over an INTEGER column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IntFilter {
    pub equals: Option<i64>,
    pub r#in: Option<Vec<i64>>,
    pub not_in: Option<Vec<i64>>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub not: Option<Box<IntFilterInput>>,
}

/// Bare integer shorthand or a full [`IntFilter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntFilterInput {
    Value(i64),
    Filter(IntFilter),
}

impl IntFilterInput {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            IntFilterInput::Value(v) => {
                qb.push("(").push(col).push(" = ").push_bind(*v).push(")");
            }
            IntFilterInput::Filter(f) => f.push_sql(col, qb),
        }
    }
}

impl IntFilter {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        if let Some(v) = self.equals {
            qb.push(" AND ").push(col).push(" = ").push_bind(v);
        }
        push_in_list(col, self.r#in.as_deref(), false, qb, |qb, v| {
            qb.push_bind(*v);
        });
        push_in_list(col, self.not_in.as_deref(), true, qb, |qb, v| {
            qb.push_bind(*v);
        });
        if let Some(v) = self.lt {
            qb.push(" AND ").push(col).push(" < ").push_bind(v);
        }
        if let Some(v) = self.lte {
            qb.push(" AND ").push(col).push(" <= ").push_bind(v);
        }
        if let Some(v) = self.gt {
            qb.push(" AND ").push(col).push(" > ").push_bind(v);
        }
        if let Some(v) = self.gte {
            qb.push(" AND ").push(col).push(" >= ").push_bind(v);
        }
        if let Some(f) = &self.not {
            qb.push(" AND NOT ");
            f.push_sql(col, qb);
        }
        qb.push(")");
    }
}

/// Filter over a datetime column. Timestamps are stored as RFC3339 UTC
/// text, which compares lexicographically, so bound values are the
/// RFC3339 rendering of the parsed input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateTimeFilter {
    pub equals: Option<DateTime<Utc>>,
    pub r#in: Option<Vec<DateTime<Utc>>>,
    pub not_in: Option<Vec<DateTime<Utc>>>,
    pub lt: Option<DateTime<Utc>>,
    pub lte: Option<DateTime<Utc>>,
    pub gt: Option<DateTime<Utc>>,
    pub gte: Option<DateTime<Utc>>,
    pub not: Option<Box<DateTimeFilterInput>>,
}

/// Bare RFC3339 datetime shorthand or a full [`DateTimeFilter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateTimeFilterInput {
    Value(DateTime<Utc>),
    Filter(DateTimeFilter),
}

impl DateTimeFilterInput {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            DateTimeFilterInput::Value(v) => {
                qb.push("(")
                    .push(col)
                    .push(" = ")
                    .push_bind(v.to_rfc3339())
                    .push(")");
            }
            DateTimeFilterInput::Filter(f) => f.push_sql(col, qb),
        }
    }
}

impl DateTimeFilter {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        if let Some(v) = &self.equals {
            qb.push(" AND ")
                .push(col)
                .push(" = ")
                .push_bind(v.to_rfc3339());
        }
        push_in_list(col, self.r#in.as_deref(), false, qb, |qb, v| {
            qb.push_bind(v.to_rfc3339());
        });
        push_in_list(col, self.not_in.as_deref(), true, qb, |qb, v| {
            qb.push_bind(v.to_rfc3339());
        });
        if let Some(v) = &self.lt {
            qb.push(" AND ")
                .push(col)
                .push(" < ")
                .push_bind(v.to_rfc3339());
        }
        if let Some(v) = &self.lte {
            qb.push(" AND ")
                .push(col)
                .push(" <= ")
                .push_bind(v.to_rfc3339());
        }
        if let Some(v) = &self.gt {
            qb.push(" AND ")
                .push(col)
                .push(" > ")
                .push_bind(v.to_rfc3339());
        }
        if let Some(v) = &self.gte {
            qb.push(" AND ")
                .push(col)
                .push(" >= ")
                .push_bind(v.to_rfc3339());
        }
        if let Some(f) = &self.not {
            qb.push(" AND NOT ");
            f.push_sql(col, qb);
        }
        qb.push(")");
    }
}

/// Filter over a BOOLEAN column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoolFilter {
    pub equals: Option<bool>,
    pub not: Option<Box<BoolFilterInput>>,
}

/// Bare boolean shorthand or a full [`BoolFilter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BoolFilterInput {
    Value(bool),
    Filter(BoolFilter),
}

impl BoolFilterInput {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            BoolFilterInput::Value(v) => {
                qb.push("(").push(col).push(" = ").push_bind(*v).push(")");
            }
            BoolFilterInput::Filter(f) => f.push_sql(col, qb),
        }
    }
}

impl BoolFilter {
    pub fn push_sql(&self, col: &str, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push("(1=1");
        if let Some(v) = self.equals {
            qb.push(" AND ").push(col).push(" = ").push_bind(v);
        }
        if let Some(f) = &self.not {
            qb.push(" AND NOT ");
            f.push_sql(col, qb);
        }
        qb.push(")");
    }
}

/// Render an IN / NOT IN list. An empty IN list matches nothing; an empty
/// NOT IN list matches everything.
fn push_in_list<'a, T, F>(
    col: &str,
    list: Option<&'a [T]>,
    negated: bool,
    qb: &mut QueryBuilder<'_, Sqlite>,
    bind: F,
) where
    F: Fn(&mut sqlx::query_builder::Separated<'_, '_, Sqlite, &'static str>, &'a T),
{
    let Some(list) = list else { return };
    if list.is_empty() {
        qb.push(if negated { " AND 1" } else { " AND 0" });
        return;
    }
    qb.push(" AND ").push(col);
    qb.push(if negated { " NOT IN (" } else { " IN (" });
    let mut sep = qb.separated(", ");
    for v in list {
        bind(&mut sep, v);
    }
    qb.push(")");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut QueryBuilder<'static, Sqlite>),
    {
        let mut qb = QueryBuilder::new("");
        f(&mut qb);
        qb.into_sql()
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_done\\"), "50\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn string_filter_rejects_unknown_fields() {
        let err = serde_json::from_value::<StringFilter>(json!({ "equal": "x" }));
        assert!(err.is_err());
    }

    #[test]
    fn string_shorthand_accepts_bare_value() {
        let input: StringFilterInput = serde_json::from_value(json!("alice")).unwrap();
        let sql = render(|qb| input.push_sql("users.name", qb));
        assert_eq!(sql, "(users.name = ?)");
    }

    #[test]
    fn string_filter_renders_all_operators() {
        let input: StringFilterInput = serde_json::from_value(json!({
            "contains": "li",
            "startsWith": "a",
            "notIn": ["bob"],
            "not": { "endsWith": "z" }
        }))
        .unwrap();
        let sql = render(|qb| input.push_sql("u.name", qb));
        assert!(sql.contains("u.name NOT IN (?)"));
        assert!(sql.contains("u.name LIKE ? ESCAPE '\\'"));
        assert!(sql.contains("AND NOT (1=1 AND u.name LIKE ? ESCAPE '\\')"));
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let f = StringFilter {
            r#in: Some(vec![]),
            ..Default::default()
        };
        let sql = render(|qb| f.push_sql("t.c", qb));
        assert_eq!(sql, "(1=1 AND 0)");
    }

    #[test]
    fn nullable_filter_distinguishes_null_from_absent() {
        let f: StringNullableFilter = serde_json::from_value(json!({ "equals": null })).unwrap();
        let sql = render(|qb| f.push_sql("users.name", qb));
        assert_eq!(sql, "(1=1 AND users.name IS NULL)");

        let f: StringNullableFilter = serde_json::from_value(json!({})).unwrap();
        let sql = render(|qb| f.push_sql("users.name", qb));
        assert_eq!(sql, "(1=1)");
    }

    #[test]
    fn nullable_not_null_renders_is_not_null() {
        let f: StringNullableFilter = serde_json::from_value(json!({ "not": null })).unwrap();
        let sql = render(|qb| f.push_sql("users.name", qb));
        assert_eq!(sql, "(1=1 AND users.name IS NOT NULL)");
    }

    #[test]
    fn int_filter_range() {
        let f: IntFilter = serde_json::from_value(json!({ "gte": 1, "lt": 10 })).unwrap();
        let sql = render(|qb| f.push_sql("lk.max_devices", qb));
        assert_eq!(sql, "(1=1 AND lk.max_devices < ? AND lk.max_devices >= ?)");
    }

    #[test]
    fn datetime_filter_parses_rfc3339() {
        let f: DateTimeFilterInput =
            serde_json::from_value(json!({ "lt": "2030-01-01T00:00:00Z" })).unwrap();
        let sql = render(|qb| f.push_sql("lk.expires", qb));
        assert_eq!(sql, "(1=1 AND lk.expires < ?)");
    }

    #[test]
    fn bool_shorthand() {
        let f: BoolFilterInput = serde_json::from_value(json!(true)).unwrap();
        let sql = render(|qb| f.push_sql("lk.is_enable", qb));
        assert_eq!(sql, "(lk.is_enable = ?)");
    }

    #[test]
    fn nullable_sort_order_terms() {
        let o: NullableSortOrder = serde_json::from_value(json!("desc")).unwrap();
        assert_eq!(o.term("users.name"), "users.name DESC");

        let o: NullableSortOrder =
            serde_json::from_value(json!({ "sort": "asc", "nulls": "last" })).unwrap();
        assert_eq!(o.term("users.name"), "users.name ASC NULLS LAST");
    }

    #[test]
    fn one_or_many_accepts_both_forms() {
        let one: OneOrMany<i64> = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(one.as_slice(), &[3]);
        let many: OneOrMany<i64> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(many.as_slice(), &[1, 2]);
    }
}
