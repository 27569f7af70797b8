//! # Greeting Handlers
//!
//! The two greeting endpoints. Both validate the `name` query parameter
//! and return a formatted greeting.

use crate::error::{AppError, AppResult};
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Query parameters for the greeting endpoints.
#[derive(Debug, Deserialize)]
pub struct GreetParams {
    pub name: Option<String>,
}

/// Say hello
///
/// ## Route
/// GET /api/hello?name=Ada
///
/// ## Response
/// ```json
/// { "message": "Hello! Ada!" }
/// ```
///
/// A missing `name` is a 400. An empty `name` is accepted as-is.
pub async fn hello(Query(params): Query<GreetParams>) -> AppResult<Json<Value>> {
    let name = require_name(params)?;
    Ok(Json(json!({
        "message": format!("Hello! {}!", name),
    })))
}

/// Say goodbye
///
/// ## Route
/// GET /api/goodbye?name=Ada
///
/// ## Response
/// ```json
/// { "message": "Goodbye! Ada!" }
/// ```
pub async fn goodbye(Query(params): Query<GreetParams>) -> AppResult<Json<Value>> {
    let name = require_name(params)?;
    Ok(Json(json!({
        "message": format!("Goodbye! {}!", name),
    })))
}

fn require_name(params: GreetParams) -> AppResult<String> {
    params
        .name
        .ok_or_else(|| AppError::BadRequest("missing required query parameter 'name'".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hello_formats_the_name() {
        let Json(body) = hello(Query(GreetParams {
            name: Some("Ada".to_string()),
        }))
        .await
        .unwrap();
        assert_eq!(body["message"], "Hello! Ada!");
    }

    #[tokio::test]
    async fn goodbye_formats_the_name() {
        let Json(body) = goodbye(Query(GreetParams {
            name: Some("Ada".to_string()),
        }))
        .await
        .unwrap();
        assert_eq!(body["message"], "Goodbye! Ada!");
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let err = hello(Query(GreetParams { name: None })).await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn empty_name_is_greeted_verbatim() {
        let Json(body) = hello(Query(GreetParams {
            name: Some(String::new()),
        }))
        .await
        .unwrap();
        assert_eq!(body["message"], "Hello! !");
    }
}
