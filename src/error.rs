// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::HttpResponse;
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::files::StorageError;
use crate::storage::StoreError;

/// Request-level error taxonomy. Storage and persistence failures are
/// logged server-side; clients only ever see a generic message for them.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    PayloadTooLarge(String),
    Storage(String),
    Persistence(String),
    Duplicate(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "validation failed: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "payload too large: {}", msg),
            ApiError::Storage(msg) => write!(f, "file storage failed: {}", msg),
            ApiError::Persistence(msg) => write!(f, "persistence failed: {}", msg),
            ApiError::Duplicate(msg) => write!(f, "duplicate key: {}", msg),
        }
    }
}

impl Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Not found".to_string()),
            StoreError::Duplicate => ApiError::Duplicate("Already exists".to_string()),
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl ApiError {
    /// Maps the error to its HTTP response. Duplicate-key collisions are
    /// reported as success so retried subscribes stay idempotent.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(msg) => {
                HttpResponse::BadRequest().json(json!({ "success": false, "message": msg }))
            }
            ApiError::NotFound(msg) => {
                HttpResponse::NotFound().json(json!({ "success": false, "message": msg }))
            }
            ApiError::PayloadTooLarge(msg) => {
                HttpResponse::PayloadTooLarge().json(json!({ "success": false, "message": msg }))
            }
            ApiError::Storage(msg) => {
                log::error!("File storage error: {}", msg);
                server_error_response()
            }
            ApiError::Persistence(msg) => {
                log::error!("Persistence error: {}", msg);
                server_error_response()
            }
            ApiError::Duplicate(msg) => {
                HttpResponse::Ok().json(json!({ "success": true, "message": msg }))
            }
        }
    }
}

pub fn server_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "success": false, "message": "Server error" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_api_not_found() {
        let err = ApiError::from(StoreError::NotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn store_duplicate_maps_to_duplicate() {
        let err = ApiError::from(StoreError::Duplicate);
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[test]
    fn persistence_errors_do_not_leak_detail() {
        let response =
            ApiError::Persistence("data/contact_messages.json is corrupt".to_string()).to_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = ApiError::Validation("Name is required".to_string()).to_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
