// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::storage::{Document, DocumentFields, StoreError};

use super::{ListQuery, client_meta, created_within, list_response, matches_text};

const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Archived,
}

impl ContactStatus {
    /// Unknown values are ignored rather than erroring, so a bad status
    /// query falls back to "no status filter".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(ContactStatus::New),
            "read" => Some(ContactStatus::Read),
            "archived" => Some(ContactStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub note: String,
    pub ip: String,
    pub user_agent: String,
}

impl DocumentFields for ContactMessage {
    const COLLECTION: &'static str = "contact_messages";
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateContactBody {
    name: String,
    email: String,
    subject: String,
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateContactBody {
    status: Option<String>,
    note: Option<String>,
}

async fn create_contact(
    req: HttpRequest,
    body: web::Json<CreateContactBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Ok(
            ApiError::Validation("Name and email are required.".to_string()).to_response(),
        );
    }

    let meta = client_meta(&req);
    let mut doc = Document::new(ContactMessage {
        name: body.name.trim().to_string(),
        email: body.email.trim().to_string(),
        subject: body.subject.trim().to_string(),
        message: body.message.trim().to_string(),
        status: ContactStatus::New,
        note: String::new(),
        ip: meta.ip,
        user_agent: meta.user_agent,
    });

    match state.db.collection::<ContactMessage>().save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn list_contacts(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let paging = query.paging(MAX_PAGE_SIZE);
    let needle = query.text_filter();
    let status = query.status.as_deref().and_then(ContactStatus::parse);
    let (from, to) = query.date_range();

    let result = state.db.collection::<ContactMessage>().list(
        |doc| {
            if let Some(status) = status {
                if doc.fields.status != status {
                    return false;
                }
            }
            if let Some(needle) = &needle {
                let fields = [
                    doc.fields.name.as_str(),
                    doc.fields.email.as_str(),
                    doc.fields.subject.as_str(),
                    doc.fields.message.as_str(),
                ];
                if !matches_text(needle, &fields) {
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

async fn get_contact(path: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.db.collection::<ContactMessage>().find_by_id(&path) {
        Ok(doc) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(StoreError::NotFound) => {
            Ok(ApiError::NotFound("Not found".to_string()).to_response())
        }
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn update_contact(
    path: web::Path<String>,
    body: web::Json<UpdateContactBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let repo = state.db.collection::<ContactMessage>();
    let mut doc = match repo.find_by_id(&path) {
        Ok(doc) => doc,
        Err(StoreError::NotFound) => {
            return Ok(ApiError::NotFound("Not found".to_string()).to_response());
        }
        Err(err) => return Ok(ApiError::from(err).to_response()),
    };

    if let Some(status) = body.status.as_deref().and_then(ContactStatus::parse) {
        doc.fields.status = status;
    }
    if let Some(note) = &body.note {
        doc.fields.note = note.clone();
    }

    match repo.save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn delete_contact(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.db.collection::<ContactMessage>().delete_by_id(&path) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Deleted" }))),
        Err(StoreError::NotFound) => {
            Ok(ApiError::NotFound("Not found".to_string()).to_response())
        }
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/contact")
            .route(web::post().to(create_contact))
            .route(web::get().to(list_contacts)),
    )
    .service(
        web::resource("/api/contact/{id}")
            .route(web::get().to(get_contact))
            .route(web::patch().to(update_contact))
            .route(web::delete().to(delete_contact)),
    );
}
