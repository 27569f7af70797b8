use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::schema::user::{UserCreate, UserOrderBy, UserUpdate, UserWhere};
use crate::schema::{push_query_tail, QueryArgs};
use sqlx::{QueryBuilder, SqlitePool};

pub async fn create(pool: &SqlitePool, input: UserCreate) -> AppResult<User> {
    let user = User::new(input);

    sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .execute(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("User with id '{}' not found", id))
            }
            _ => AppError::Database(e),
        })?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("User with email '{}' not found", email))
            }
            _ => AppError::Database(e),
        })?;

    Ok(user)
}

pub async fn list(
    pool: &SqlitePool,
    args: &QueryArgs<UserWhere, UserOrderBy>,
) -> AppResult<Vec<User>> {
    let mut qb = QueryBuilder::new("SELECT * FROM users");
    push_query_tail(args, "users", &mut qb);

    let users = qb.build_query_as::<User>().fetch_all(pool).await?;
    Ok(users)
}

pub async fn update(pool: &SqlitePool, id: &str, input: UserUpdate) -> AppResult<User> {
    let mut qb = QueryBuilder::new("UPDATE users SET ");
    let mut any = false;
    {
        let mut sep = qb.separated(", ");
        if let Some(v) = &input.id {
            sep.push("id = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.name {
            sep.push("name = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
        if let Some(v) = &input.email {
            sep.push("email = ");
            sep.push_bind_unseparated(v.clone());
            any = true;
        }
    }
    if !any {
        // nothing to change; still report whether the row exists
        return find_by_id(pool, id).await;
    }

    qb.push(" WHERE id = ").push_bind(id.to_string());
    let result = qb.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "User with id '{}' not found",
            id
        )));
    }

    let current_id = input.id.as_deref().unwrap_or(id);
    find_by_id(pool, current_id).await
}

pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "User with id '{}' not found",
            id
        )));
    }

    Ok(())
}
