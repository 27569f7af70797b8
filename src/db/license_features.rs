use crate::db::models::LicenseFeature;
use crate::error::{AppError, AppResult};
use crate::schema::license_feature::{
    LicenseFeatureCreate, LicenseFeatureOrderBy, LicenseFeatureUpdate, LicenseFeatureWhere,
};
use crate::schema::{push_query_tail, QueryArgs};
use sqlx::{QueryBuilder, SqlitePool};

pub async fn create(pool: &SqlitePool, input: LicenseFeatureCreate) -> AppResult<LicenseFeature> {
    // The id is database-assigned unless the client supplies one, so the
    // inserted row comes back via RETURNING.
    let feature = if let Some(id) = input.id {
        sqlx::query_as::<_, LicenseFeature>(
            "INSERT INTO license_features (id, name, license_key_id)
             VALUES (?, ?, ?)
             RETURNING id, name, license_key_id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.license_key_id)
        .fetch_one(pool)
        .await?
    } else {
        sqlx::query_as::<_, LicenseFeature>(
            "INSERT INTO license_features (name, license_key_id)
             VALUES (?, ?)
             RETURNING id, name, license_key_id",
        )
        .bind(&input.name)
        .bind(&input.license_key_id)
        .fetch_one(pool)
        .await?
    };

    Ok(feature)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<LicenseFeature> {
    let feature = sqlx::query_as::<_, LicenseFeature>("SELECT * FROM license_features WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("License feature with id '{}' not found", id))
            }
            _ => AppError::Database(e),
        })?;

    Ok(feature)
}

pub async fn list(
    pool: &SqlitePool,
    args: &QueryArgs<LicenseFeatureWhere, LicenseFeatureOrderBy>,
) -> AppResult<Vec<LicenseFeature>> {
    let mut qb = QueryBuilder::new("SELECT * FROM license_features");
    push_query_tail(args, "license_features", &mut qb);

    let features = qb
        .build_query_as::<LicenseFeature>()
        .fetch_all(pool)
        .await?;
    Ok(features)
}

pub async fn list_for_license_key(
    pool: &SqlitePool,
    license_key_id: &str,
) -> AppResult<Vec<LicenseFeature>> {
    let features = sqlx::query_as::<_, LicenseFeature>(
        "SELECT * FROM license_features WHERE license_key_id = ? ORDER BY name",
    )
    .bind(license_key_id)
    .fetch_all(pool)
    .await?;

    Ok(features)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: LicenseFeatureUpdate,
) -> AppResult<LicenseFeature> {
    let mut qb = QueryBuilder::new("UPDATE license_features SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        if let Some(v) = input.id {
            sep.push("id = ");
            sep.push_bind_unseparated(v);
            any = true;
        }
        if let Some(v) = &input.name {
            sep.push("name = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.license_key_id {
            sep.push("license_key_id = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
    }
    if !any {
        return find_by_id(pool, id).await;
    }

    qb.push(" WHERE id = ").push_bind(id);
    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "License feature with id '{}' not found",
            id
        )));
    }

    let current_id = input.id.unwrap_or(id);
    find_by_id(pool, current_id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM license_features WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "License feature with id '{}' not found",
            id
        )));
    }

    Ok(())
}
