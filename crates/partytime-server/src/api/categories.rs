use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use partytime_shared::protocol::{CategoryRequest, MessageResponse};
use partytime_store::Category;

use super::extract::{parse_id, ApiJson, ApiPath};
use super::AppState;
use crate::error::ServerError;

fn not_found() -> ServerError {
    ServerError::NotFound("Category not found.".to_string())
}

#[derive(Serialize)]
pub struct CategoryCreated {
    message: String,
    category: Category,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_categories()?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let rejected =
        || ServerError::BadRequest("Category already exists or invalid data.".to_string());

    let name = req.name.trim();
    if name.is_empty() {
        return Err(rejected());
    }

    let category = Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
    };

    let db = state.db.lock().await;
    match db.create_category(&category) {
        Ok(()) => {}
        Err(e) if e.is_constraint_violation() => {
            warn!(name = %category.name, "Duplicate category");
            return Err(rejected());
        }
        Err(e) => return Err(e.into()),
    }

    info!(id = %category.id, name = %category.name, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category created successfully.".to_string(),
            category,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Json<Category>, ServerError> {
    let id = parse_id(&id, not_found)?;
    let rejected = || ServerError::BadRequest("Could not update category.".to_string());

    let name = req.name.trim();
    if name.is_empty() {
        return Err(rejected());
    }

    let db = state.db.lock().await;
    match db.rename_category(id, name) {
        Ok(true) => {}
        Ok(false) => return Err(not_found()),
        Err(e) if e.is_constraint_violation() => return Err(rejected()),
        Err(e) => return Err(e.into()),
    }

    info!(id = %id, name = %name, "Category renamed");
    Ok(Json(db.get_category(id)?))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id, not_found)?;
    let db = state.db.lock().await;
    match db.delete_category(id) {
        Ok(true) => {}
        Ok(false) => return Err(not_found()),
        Err(e) if e.is_constraint_violation() => {
            warn!(id = %id, "Refusing to delete a category that still has decorations");
            return Err(ServerError::BadRequest("Could not delete category.".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    info!(id = %id, "Category deleted");
    Ok(Json(MessageResponse::new("Category deleted.")))
}
