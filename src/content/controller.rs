// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeSet;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::files::{FileStore, StorageError};
use crate::storage::{Document, DocumentFields};

use super::payload::{PagePayload, SlotSpec, UploadSet, read_page_payload};

/// One editable page document: its field structure, its upload slot
/// table, and how incoming updates reconcile into it.
///
/// `apply_patch` merges the plain fields: scalars overwrite when present,
/// whole arrays replace when present, everything absent is retained.
/// `apply_uploads` stores files and writes the returned paths into the
/// matching fields. It never deletes; superseded paths fall out of the
/// document and are swept by the owned-path diff in the handlers below.
pub trait ContentPage: DocumentFields + 'static {
    /// Human label used in not-found messages ("Home not found").
    const LABEL: &'static str;
    /// Namespace directory the type's uploads are stored under.
    const NAMESPACE: &'static str;
    const SLOTS: &'static [SlotSpec];

    type Patch: DeserializeOwned;

    fn apply_patch(&mut self, patch: Self::Patch);
    fn apply_uploads(
        &mut self,
        uploads: &mut UploadSet,
        store: &FileStore,
    ) -> Result<(), StorageError>;

    /// Every file-reference value reachable in the document tree, owned
    /// or external.
    fn image_paths(&self) -> Vec<String>;
}

fn owned_paths<P: ContentPage>(page: &P) -> BTreeSet<String> {
    page.image_paths()
        .into_iter()
        .filter(|path| FileStore::is_owned(path))
        .collect()
}

pub async fn get_page<P: ContentPage>(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.db.collection::<P>().find_singleton() {
        Ok(doc) => Ok(HttpResponse::Ok().json(doc)),
        Err(err) => Ok(ApiError::from(err).to_response()),
    }
}

pub async fn create_page<P: ContentPage>(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let payload = match read_page_payload(&req, body, P::SLOTS, state.upload_limit_bytes).await {
        Ok(payload) => payload,
        Err(err) => return Ok(err.to_response()),
    };
    match create_document::<P>(payload, &state) {
        Ok(doc) => Ok(HttpResponse::Created().json(doc)),
        Err(err) => Ok(err.to_response()),
    }
}

pub async fn update_page<P: ContentPage>(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let payload = match read_page_payload(&req, body, P::SLOTS, state.upload_limit_bytes).await {
        Ok(payload) => payload,
        Err(err) => return Ok(err.to_response()),
    };
    match update_document::<P>(&path, payload, &state) {
        Ok(doc) => Ok(HttpResponse::Ok().json(doc)),
        Err(err) => Ok(err.to_response()),
    }
}

pub async fn delete_page<P: ContentPage>(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match delete_document::<P>(&path, &state) {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "message": format!("{} deleted", P::LABEL)
        }))),
        Err(err) => Ok(err.to_response()),
    }
}

fn create_document<P: ContentPage>(
    payload: PagePayload,
    state: &AppState,
) -> Result<Document<P>, ApiError> {
    let (patch, mut uploads) = payload.decode::<P::Patch>()?;
    let mut doc = Document::new(P::default());
    doc.fields.apply_patch(patch);
    doc.fields.apply_uploads(&mut uploads, &state.files)?;
    state.db.collection::<P>().save(&mut doc)?;
    Ok(doc)
}

fn update_document<P: ContentPage>(
    id: &str,
    payload: PagePayload,
    state: &AppState,
) -> Result<Document<P>, ApiError> {
    let repo = state.db.collection::<P>();
    let mut doc = repo.find_by_id(id).map_err(|err| match err {
        crate::storage::StoreError::NotFound => not_found::<P>(),
        other => ApiError::from(other),
    })?;

    // Reconcile against the owned-path set captured up front: whatever
    // the update drops, replaced single-valued fields and removed list
    // entries alike, is exactly the before/after set difference.
    // A path still referenced elsewhere in the document survives.
    let before = owned_paths(&doc.fields);

    let (patch, mut uploads) = payload.decode::<P::Patch>()?;
    doc.fields.apply_patch(patch);
    doc.fields.apply_uploads(&mut uploads, &state.files)?;

    let after = owned_paths(&doc.fields);
    for stale in before.difference(&after) {
        state.files.best_effort_delete(stale);
    }

    repo.save(&mut doc)?;
    Ok(doc)
}

fn delete_document<P: ContentPage>(id: &str, state: &AppState) -> Result<(), ApiError> {
    let repo = state.db.collection::<P>();
    let doc = repo.find_by_id(id).map_err(|err| match err {
        crate::storage::StoreError::NotFound => not_found::<P>(),
        other => ApiError::from(other),
    })?;

    for path in owned_paths(&doc.fields) {
        state.files.best_effort_delete(&path);
    }

    repo.delete_by_id(id)?;
    Ok(())
}

fn not_found<P: ContentPage>() -> ApiError {
    ApiError::NotFound(format!("{} not found", P::LABEL))
}

/// Wires the uniform resource group for one page type:
/// GET/POST on the collection path, PATCH/DELETE on `/{id}`.
pub fn register<P: ContentPage>(cfg: &mut web::ServiceConfig, base_path: &str) {
    cfg.service(
        web::resource(base_path)
            .route(web::get().to(get_page::<P>))
            .route(web::post().to(create_page::<P>)),
    )
    .service(
        web::resource(format!("{}/{{id}}", base_path))
            .route(web::patch().to(update_page::<P>))
            .route(web::delete().to(delete_page::<P>)),
    );
}
