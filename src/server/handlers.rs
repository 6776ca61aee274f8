//! HTTP handlers for the `/books` resource
//!
//! Request bodies are decoded from raw bytes so that every decoding failure,
//! whatever the content type, is reported as 400.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::model::Book;
use crate::store::Store;

fn parse_book(body: &[u8]) -> ApiResult<Book> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected malformed book body: {}", e);
        ApiError::from(e)
    })
}

/// POST /books
pub async fn create_book(
    State(store): State<Arc<Store>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let book = parse_book(&body)?.with_id(Uuid::new_v4().to_string());
    store.add(book.clone());

    info!("Created book {}", book.id);
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books
pub async fn list_books(State(store): State<Arc<Store>>) -> Json<Vec<Book>> {
    let books = store.get_all();
    info!("Listing {} books", books.len());
    Json(books)
}

/// PUT /books/{id}
pub async fn update_book(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    // The path id wins over whatever the body carries.
    let book = parse_book(&body)?.with_id(id);

    if store.update(book.clone()) {
        info!("Updated book {}", book.id);
        Ok(StatusCode::OK)
    } else {
        warn!("Update of unknown book {}", book.id);
        Err(ApiError::NotFound)
    }
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store.delete(&id) {
        info!("Deleted book {}", id);
        Ok(StatusCode::OK)
    } else {
        warn!("Delete of unknown book {}", id);
        Err(ApiError::NotFound)
    }
}
