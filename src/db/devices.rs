use crate::db::models::Device;
use crate::error::{AppError, AppResult};
use crate::schema::device::{DeviceCreate, DeviceOrderBy, DeviceUpdate, DeviceWhere};
use crate::schema::{push_query_tail, QueryArgs};
use sqlx::{QueryBuilder, SqlitePool};

pub async fn create(pool: &SqlitePool, input: DeviceCreate) -> AppResult<Device> {
    let device = Device::new(input);

    sqlx::query(
        "INSERT INTO devices
            (id, device_hw_id, device_name, device_type, device_os, license_key_id)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&device.id)
    .bind(&device.device_hw_id)
    .bind(&device.device_name)
    .bind(&device.device_type)
    .bind(&device.device_os)
    .bind(&device.license_key_id)
    .execute(pool)
    .await?;

    Ok(device)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Device> {
    let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("Device with id '{}' not found", id))
            }
            _ => AppError::Database(e),
        })?;

    Ok(device)
}

pub async fn list(
    pool: &SqlitePool,
    args: &QueryArgs<DeviceWhere, DeviceOrderBy>,
) -> AppResult<Vec<Device>> {
    let mut qb = QueryBuilder::new("SELECT * FROM devices");
    push_query_tail(args, "devices", &mut qb);

    let devices = qb.build_query_as::<Device>().fetch_all(pool).await?;
    Ok(devices)
}

pub async fn list_for_license_key(
    pool: &SqlitePool,
    license_key_id: &str,
) -> AppResult<Vec<Device>> {
    let devices = sqlx::query_as::<_, Device>(
        "SELECT * FROM devices WHERE license_key_id = ? ORDER BY device_name",
    )
    .bind(license_key_id)
    .fetch_all(pool)
    .await?;

    Ok(devices)
}

pub async fn update(pool: &SqlitePool, id: &str, input: DeviceUpdate) -> AppResult<Device> {
    let mut qb = QueryBuilder::new("UPDATE devices SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        if let Some(v) = &input.id {
            sep.push("id = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.device_hw_id {
            sep.push("device_hw_id = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.device_name {
            sep.push("device_name = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.device_type {
            sep.push("device_type = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.device_os {
            sep.push("device_os = ");
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

    qb.push(" WHERE id = ").push_bind(id.to_string());
    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Device with id '{}' not found",
            id
        )));
    }

    let current_id = input.id.as_deref().unwrap_or(id);
    find_by_id(pool, current_id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM devices WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Device with id '{}' not found",
            id
        )));
    }

    Ok(())
}
