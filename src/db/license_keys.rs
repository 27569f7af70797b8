use crate::db::models::LicenseKey;
use crate::error::{AppError, AppResult};
use crate::schema::license_key::{
    LicenseKeyCreate, LicenseKeyOrderBy, LicenseKeyUpdate, LicenseKeyWhere,
};
use crate::schema::{push_query_tail, QueryArgs};
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool};

pub async fn create(pool: &SqlitePool, input: LicenseKeyCreate) -> AppResult<LicenseKey> {
    let key = LicenseKey::new(input);

    sqlx::query(
        "INSERT INTO license_keys
            (id, max_devices, expires, issued, updated_at, language, is_activated, is_enable, user_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&key.id)
    .bind(key.max_devices)
    .bind(&key.expires)
    .bind(&key.issued)
    .bind(&key.updated_at)
    .bind(&key.language)
    .bind(key.is_activated)
    .bind(key.is_enable)
    .bind(&key.user_id)
    .execute(pool)
    .await?;

    Ok(key)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<LicenseKey> {
    let key = sqlx::query_as::<_, LicenseKey>("SELECT * FROM license_keys WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("License key with id '{}' not found", id))
            }
            _ => AppError::Database(e),
        })?;

    Ok(key)
}

pub async fn list(
    pool: &SqlitePool,
    args: &QueryArgs<LicenseKeyWhere, LicenseKeyOrderBy>,
) -> AppResult<Vec<LicenseKey>> {
    let mut qb = QueryBuilder::new("SELECT * FROM license_keys");
    push_query_tail(args, "license_keys", &mut qb);

    let keys = qb.build_query_as::<LicenseKey>().fetch_all(pool).await?;
    Ok(keys)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<LicenseKey>> {
    let keys = sqlx::query_as::<_, LicenseKey>(
        "SELECT * FROM license_keys WHERE user_id = ? ORDER BY issued",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(keys)
}

pub async fn update(pool: &SqlitePool, id: &str, input: LicenseKeyUpdate) -> AppResult<LicenseKey> {
    // updated_at is refreshed on every update, so the SET list is never
    // empty
    let updated_at = input
        .updated_at
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let mut qb = QueryBuilder::new("UPDATE license_keys SET ");
    {
        let mut sep = qb.separated(", ");
        sep.push("updated_at = ");
        sep.push_bind_unseparated(updated_at);
        if let Some(v) = &input.id {
            sep.push("id = ");
            sep.push_bind_unseparated(v.clone());
        }
        if let Some(v) = input.max_devices {
            sep.push("max_devices = ");
            sep.push_bind_unseparated(v);
        }
        if let Some(v) = &input.expires {
            sep.push("expires = ");
            sep.push_bind_unseparated(v.to_rfc3339());
        }
        if let Some(v) = &input.issued {
            sep.push("issued = ");
            sep.push_bind_unseparated(v.to_rfc3339());
        }
        if let Some(v) = &input.language {
            sep.push("language = ");
            sep.push_bind_unseparated(v.clone());
        }
        if let Some(v) = input.is_activated {
            sep.push("is_activated = ");
            sep.push_bind_unseparated(v);
        }
        if let Some(v) = input.is_enable {
            sep.push("is_enable = ");
            sep.push_bind_unseparated(v);
        }
        if let Some(v) = &input.user_id {
            sep.push("user_id = ");
            sep.push_bind_unseparated(v.clone());
        }
    }

    qb.push(" WHERE id = ").push_bind(id.to_string());
    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "License key with id '{}' not found",
            id
        )));
    }

    let current_id = input.id.as_deref().unwrap_or(id);
    find_by_id(pool, current_id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM license_keys WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "License key with id '{}' not found",
            id
        )));
    }

    Ok(())
}
