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
pub struct Sponsor {
    pub title: String,
    pub name: String,
    pub email: String,
    pub organization: String,
    pub phone: String,
    pub city: String,
    pub country: String,
    /// Conference id the sponsorship belongs to, if any. Stored as the
    /// plain id; consumers resolve names via /api/conferences.
    pub sponsor: Option<String>,
}

impl DocumentFields for Sponsor {
    const COLLECTION: &'static str = "sponsors";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SponsorBody {
    title: String,
    name: String,
    email: String,
    organization: String,
    phone: String,
    city: String,
    country: String,
    sponsor: Option<String>,
}

async fn create_sponsor(
    body: web::Json<SponsorBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.country.trim().is_empty()
    {
        return Ok(ApiError::Validation(
            "Name, email and country are required".to_string(),
        )
        .to_response());
    }

    let mut doc = Document::new(Sponsor {
        title: body.title.trim().to_string(),
        name: body.name.trim().to_string(),
        email: body.email.trim().to_string(),
        organization: body.organization.trim().to_string(),
        phone: body.phone.trim().to_string(),
        city: body.city.trim().to_string(),
        country: body.country.trim().to_string(),
        sponsor: body.sponsor.filter(|id| !id.trim().is_empty()),
    });

    match state.db.collection::<Sponsor>().save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Created().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn list_sponsors(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let paging = query.paging(MAX_PAGE_SIZE);
    let needle = query.text_filter();
    let (from, to) = query.date_range();

    let result = state.db.collection::<Sponsor>().list(
        |doc| {
            if let Some(needle) = &needle {
                let fields = [
                    doc.fields.name.as_str(),
                    doc.fields.email.as_str(),
                    doc.fields.organization.as_str(),
                    doc.fields.city.as_str(),
                    doc.fields.country.as_str(),
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

async fn update_sponsor(
    path: web::Path<String>,
    body: web::Json<SponsorBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let repo = state.db.collection::<Sponsor>();
    let mut doc = match repo.find_by_id(&path) {
        Ok(doc) => doc,
        Err(StoreError::NotFound) => {
            return Ok(ApiError::NotFound("Not found".to_string()).to_response());
        }
        Err(err) => return Ok(ApiError::from(err).to_response()),
    };

    let body = body.into_inner();
    if !body.name.trim().is_empty() {
        doc.fields.name = body.name.trim().to_string();
    }
    if !body.email.trim().is_empty() {
        doc.fields.email = body.email.trim().to_string();
    }
    if !body.country.trim().is_empty() {
        doc.fields.country = body.country.trim().to_string();
    }
    if !body.title.trim().is_empty() {
        doc.fields.title = body.title.trim().to_string();
    }
    if !body.organization.trim().is_empty() {
        doc.fields.organization = body.organization.trim().to_string();
    }
    if !body.phone.trim().is_empty() {
        doc.fields.phone = body.phone.trim().to_string();
    }
    if !body.city.trim().is_empty() {
        doc.fields.city = body.city.trim().to_string();
    }
    if let Some(sponsor) = body.sponsor {
        doc.fields.sponsor = Some(sponsor).filter(|id| !id.trim().is_empty());
    }

    match repo.save(&mut doc) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn delete_sponsor(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match state.db.collection::<Sponsor>().delete_by_id(&path) {
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
        web::resource("/api/sponsors")
            .route(web::get().to(list_sponsors))
            .route(web::post().to(create_sponsor)),
    )
    .service(
        web::resource("/api/sponsors/{id}")
            .route(web::patch().to(update_sponsor))
            .route(web::delete().to(delete_sponsor)),
    );
}
