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
use crate::validation::{normalize_email, validate_email_field};

use super::{ListQuery, client_meta, created_within, list_response, matches_text};

const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    #[default]
    Subscribed,
    Unsubscribed,
}

impl SubscriberStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "subscribed" => Some(SubscriberStatus::Subscribed),
            "unsubscribed" => Some(SubscriberStatus::Unsubscribed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subscriber {
    pub email: String,
    pub status: SubscriberStatus,
    pub source: String,
    pub ip: String,
    pub user_agent: String,
    pub note: String,
}

impl Default for Subscriber {
    fn default() -> Self {
        Self {
            email: String::new(),
            status: SubscriberStatus::Subscribed,
            source: "site".to_string(),
            ip: String::new(),
            user_agent: String::new(),
            note: String::new(),
        }
    }
}

impl DocumentFields for Subscriber {
    const COLLECTION: &'static str = "subscribers";
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubscribeBody {
    email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateSubscriberBody {
    status: Option<String>,
    note: Option<String>,
}

/// Upsert keyed by normalized email: an existing record flips back to
/// subscribed instead of duplicating, and a lost insert race reports
/// success so retries stay idempotent.
async fn subscribe(
    req: HttpRequest,
    body: web::Json<SubscribeBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let email = normalize_email(&body.email);
    if validate_email_field(&email).is_err() {
        return Ok(ApiError::Validation("Valid email required".to_string()).to_response());
    }

    let meta = client_meta(&req);
    let repo = state.db.collection::<Subscriber>();

    let existing = match repo.find_first(|doc| doc.fields.email == email) {
        Ok(existing) => existing,
        Err(err) => return Ok(ApiError::from(err).to_response()),
    };

    if let Some(mut doc) = existing {
        doc.fields.status = SubscriberStatus::Subscribed;
        doc.fields.source = "site".to_string();
        doc.fields.ip = meta.ip;
        doc.fields.user_agent = meta.user_agent;
        return match repo.save(&mut doc) {
            Ok(()) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": doc }))),
            Err(err) => Ok(ApiError::from(err).to_response()),
        };
    }

    let doc = Document::new(Subscriber {
        email: email.clone(),
        ip: meta.ip,
        user_agent: meta.user_agent,
        ..Subscriber::default()
    });
    match repo.insert_unique(doc, |existing| existing.fields.email == email) {
        Ok(doc) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": doc }))),
        Err(StoreError::Duplicate) => {
            Ok(ApiError::Duplicate("Already subscribed".to_string()).to_response())
        }
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn list_subscribers(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let paging = query.paging(MAX_PAGE_SIZE);
    let needle = query.text_filter();
    let status = query.status.as_deref().and_then(SubscriberStatus::parse);
    let (from, to) = query.date_range();

    let result = state.db.collection::<Subscriber>().list(
        |doc| {
            if let Some(status) = status {
                if doc.fields.status != status {
                    return false;
                }
            }
            if let Some(needle) = &needle {
                if !matches_text(needle, &[doc.fields.email.as_str()]) {
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

async fn update_subscriber(
    path: web::Path<String>,
    body: web::Json<UpdateSubscriberBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let repo = state.db.collection::<Subscriber>();
    let mut doc = match repo.find_by_id(&path) {
        Ok(doc) => doc,
        Err(StoreError::NotFound) => {
            return Ok(ApiError::NotFound("Not found".to_string()).to_response());
        }
        Err(err) => return Ok(ApiError::from(err).to_response()),
    };

    if let Some(status) = body.status.as_deref().and_then(SubscriberStatus::parse) {
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

async fn delete_subscriber(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.db.collection::<Subscriber>().delete_by_id(&path) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Deleted" }))),
        Err(StoreError::NotFound) => {
            Ok(ApiError::NotFound("Not found".to_string()).to_response())
        }
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/newsletter/subscribe", web::post().to(subscribe))
        .route("/api/newsletter", web::get().to(list_subscribers))
        .service(
            web::resource("/api/newsletter/{id}")
                .route(web::patch().to(update_subscriber))
                .route(web::delete().to(delete_subscriber)),
        );
}
