// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::storage::{Document, DocumentFields, StoreError};

use super::{ListQuery, created_within, list_response, matches_text};

const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conference {
    pub name: String,
}

impl DocumentFields for Conference {
    const COLLECTION: &'static str = "conferences";
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConferenceBody {
    name: String,
}

async fn create_conference(
    body: web::Json<ConferenceBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Ok(ApiError::Validation("Name is required".to_string()).to_response());
    }

    let mut doc = Document::new(Conference { name });
    match state.db.collection::<Conference>().save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn list_conferences(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let paging = query.paging(MAX_PAGE_SIZE);
    let needle = query.text_filter();
    let (from, to) = query.date_range();

    let result = state.db.collection::<Conference>().list(
        |doc| {
            if let Some(needle) = &needle {
                if !matches_text(needle, &[doc.fields.name.as_str()]) {
                    return false;
                }
            }
            created_within(doc.created_at, from, to)
        },
        paging.page,
        paging.limit,
    );

    match result {
        Ok(page) => Ok(list_response(&page.items, page.total, paging)),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn update_conference(
    path: web::Path<String>,
    body: web::Json<ConferenceBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let repo = state.db.collection::<Conference>();
    let mut doc = match repo.find_by_id(&path) {
        Ok(doc) => doc,
        Err(StoreError::NotFound) => {
            return Ok(ApiError::NotFound("Not found".to_string()).to_response());
        }
        Err(err) => return Ok(ApiError::from(err).to_response()),
    };

    let name = body.name.trim().to_string();
    if !name.is_empty() {
        doc.fields.name = name;
    }

    match repo.save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn delete_conference(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.db.collection::<Conference>().delete_by_id(&path) {
        Ok(()) => Ok(
            HttpResponse::Ok().json(json!({ "success": true, "message": "Deleted successfully" }))
        ),
        Err(StoreError::NotFound) => {
            Ok(ApiError::NotFound("Not found".to_string()).to_response())
        }
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/conferences")
            .route(web::get().to(list_conferences))
            .route(web::post().to(create_conference)),
    )
    .service(
        web::resource("/api/conferences/{id}")
            .route(web::patch().to(update_conference))
            .route(web::delete().to(delete_conference)),
    );
}
