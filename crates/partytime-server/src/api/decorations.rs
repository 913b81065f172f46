//! Catalog items and their images.
//!
//! Mutations go through [`MediaStore::replace`](crate::media::MediaStore::replace)
//! so that a record only ever points at a file that was fully written, and
//! the previous file is removed only once the record has moved on.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use partytime_shared::constants::IMAGE_FIELD;
use partytime_shared::pricing::{discount_percentage, is_valid_price};
use partytime_shared::protocol::{DecorationQuery, MessageResponse};
use partytime_store::{Decoration, DecorationFilter, DecorationWithCategory, StoreError};

use super::extract::{parse_id, ApiMultipart, ApiPath, ApiQuery};
use super::AppState;
use crate::error::ServerError;
use crate::media::Upload;

fn not_found() -> ServerError {
    ServerError::NotFound("Decoration not found.".to_string())
}

/// Text fields of the create/update form, all optional at parse time.
#[derive(Debug, Default)]
struct DecorationForm {
    title: Option<String>,
    description: Option<String>,
    original_price: Option<f64>,
    discounted_price: Option<f64>,
    category_id: Option<Uuid>,
    image: Option<Upload>,
}

fn form_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::BadRequest(format!("Invalid form data: {}", e.body_text()))
    }
}

fn parse_price(field: &str, raw: &str) -> Result<f64, ServerError> {
    match raw.trim().parse::<f64>() {
        Ok(price) if is_valid_price(price) => Ok(price),
        _ => Err(ServerError::BadRequest(format!("Invalid {field}."))),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<DecorationForm, ServerError> {
    let mut form = DecorationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(form_error)?;
            // Browsers send an empty part when no file was chosen.
            if !data.is_empty() {
                form.image = Some(Upload { file_name, data });
            }
            continue;
        }

        let value = field.text().await.map_err(form_error)?;
        match name.as_str() {
            "title" => form.title = Some(value.trim().to_string()),
            "description" => form.description = Some(value),
            "originalPrice" => form.original_price = Some(parse_price("originalPrice", &value)?),
            "discountedPrice" => {
                form.discounted_price = Some(parse_price("discountedPrice", &value)?)
            }
            "categoryId" => {
                let id = Uuid::parse_str(value.trim())
                    .map_err(|_| ServerError::BadRequest("Invalid categoryId.".to_string()))?;
                form.category_id = Some(id);
            }
            // Always recomputed from the two prices.
            "discountPercentage" => {}
            other => debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn check_prices(decoration: &Decoration) -> Result<(), ServerError> {
    if decoration.discounted_price > decoration.original_price {
        return Err(ServerError::BadRequest(
            "Discounted price cannot exceed the original price.".to_string(),
        ));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DecorationQuery>,
) -> Result<Json<Vec<DecorationWithCategory>>, ServerError> {
    let category_id = match query.category_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| ServerError::BadRequest("Invalid categoryId.".to_string()))?,
        ),
    };
    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let filter = DecorationFilter {
        category_id,
        search,
    };

    let db = state.db.lock().await;
    Ok(Json(db.list_decorations(&filter)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<DecorationWithCategory>, ServerError> {
    let id = parse_id(&id, not_found)?;
    let db = state.db.lock().await;
    match db.get_decoration_with_category(id) {
        Ok(decoration) => Ok(Json(decoration)),
        Err(StoreError::NotFound) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

pub async fn create(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<(StatusCode, Json<DecorationWithCategory>), ServerError> {
    let mut form = read_form(multipart).await?;
    let image = form.image.take();

    let missing = |field: &str| ServerError::BadRequest(format!("Missing {field}."));
    let title = form.title.filter(|t| !t.is_empty()).ok_or_else(|| missing("title"))?;
    let original_price = form.original_price.ok_or_else(|| missing("originalPrice"))?;
    let discounted_price = form.discounted_price.ok_or_else(|| missing("discountedPrice"))?;
    let category_id = form.category_id.ok_or_else(|| missing("categoryId"))?;

    let now = Utc::now();
    let mut decoration = Decoration {
        id: Uuid::new_v4(),
        title,
        description: form.description.unwrap_or_default(),
        original_price,
        discounted_price,
        discount_percentage: discount_percentage(original_price, discounted_price),
        image_url: None,
        category_id,
        created_at: now,
        updated_at: now,
    };
    check_prices(&decoration)?;

    let db = state.db.clone();
    let created = state
        .media
        .replace(None, image.as_ref(), |image_url| async move {
            decoration.image_url = image_url;

            let db = db.lock().await;
            match db.create_decoration(&decoration) {
                Ok(()) => {}
                Err(e) if e.is_constraint_violation() => {
                    warn!(category = %decoration.category_id, "Decoration rejected by constraints");
                    return Err(ServerError::BadRequest(
                        "Could not create decoration.".to_string(),
                    ));
                }
                Err(e) => return Err(e.into()),
            }
            Ok::<_, ServerError>(db.get_decoration_with_category(decoration.id)?)
        })
        .await?;

    info!(
        id = %created.decoration.id,
        image = created.decoration.image_url.as_deref().unwrap_or("-"),
        "Decoration created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partial update: fields absent from the form keep their current value.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<DecorationWithCategory>, ServerError> {
    let id = parse_id(&id, not_found)?;
    let mut form = read_form(multipart).await?;
    let image = form.image.take();

    let existing = {
        let db = state.db.lock().await;
        match db.get_decoration(id) {
            Ok(decoration) => decoration,
            Err(StoreError::NotFound) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        }
    };

    let mut updated = existing.clone();
    if let Some(title) = form.title.filter(|t| !t.is_empty()) {
        updated.title = title;
    }
    if let Some(description) = form.description {
        updated.description = description;
    }
    if let Some(price) = form.original_price {
        updated.original_price = price;
    }
    if let Some(price) = form.discounted_price {
        updated.discounted_price = price;
    }
    if let Some(category_id) = form.category_id {
        updated.category_id = category_id;
    }
    updated.discount_percentage =
        discount_percentage(updated.original_price, updated.discounted_price);
    updated.updated_at = Utc::now();
    check_prices(&updated)?;

    let db = state.db.clone();
    let saved = state
        .media
        .replace(
            existing.image_url.as_deref(),
            image.as_ref(),
            |image_url| async move {
                updated.image_url = image_url;

                let db = db.lock().await;
                match db.update_decoration(&updated) {
                    Ok(true) => {}
                    Ok(false) => return Err(not_found()),
                    Err(e) if e.is_constraint_violation() => {
                        return Err(ServerError::BadRequest(
                            "Could not update decoration.".to_string(),
                        ));
                    }
                    Err(e) => return Err(e.into()),
                }
                Ok::<_, ServerError>(db.get_decoration_with_category(updated.id)?)
            },
        )
        .await?;

    info!(
        id = %id,
        image_replaced = image.is_some(),
        "Decoration updated"
    );
    Ok(Json(saved))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id, not_found)?;
    let image_url = {
        let db = state.db.lock().await;
        let decoration = match db.get_decoration(id) {
            Ok(decoration) => decoration,
            Err(StoreError::NotFound) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        if !db.delete_decoration(id)? {
            return Err(not_found());
        }
        decoration.image_url
    };

    if let Some(url) = image_url {
        state.media.release(&url).await;
    }

    info!(id = %id, "Decoration deleted");
    Ok(Json(MessageResponse::new("Decoration deleted.")))
}
