// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::storage::{Document, DocumentFields};

/// Speaker guidelines, kept as one document by convention: reads return
/// the first document (or null), saves update it in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guideline {
    // Rich text HTML from the admin editor.
    pub speaker: String,
}

impl DocumentFields for Guideline {
    const COLLECTION: &'static str = "guidelines";
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveGuidelineBody {
    speaker: Option<String>,
}

async fn get_guideline(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.db.collection::<Guideline>().find_first(|_| true) {
        Ok(doc) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

async fn save_guideline(
    body: web::Json<SaveGuidelineBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let speaker = body.speaker.clone().unwrap_or_default();
    if speaker.trim().is_empty() {
        return Ok(
            ApiError::Validation("Speaker guidelines are required".to_string()).to_response(),
        );
    }

    let repo = state.db.collection::<Guideline>();
    let result = repo.find_first(|_| true).and_then(|existing| {
        let mut doc = existing.unwrap_or_else(|| Document::new(Guideline::default()));
        doc.fields.speaker = speaker.clone();
        repo.save(&mut doc)?;
        Ok(doc)
    });

    match result {
        Ok(doc) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": doc }))),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/guidelines")
            .route(web::get().to(get_guideline))
            .route(web::post().to(save_guideline)),
    );
}
