// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpRequest, web};
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;

/// How a content type's upload slot names are shaped on the wire.
///
/// The admin sends file parts named by convention: a fixed name for
/// singleton fields (`heroBg`), `<name><i>` for single-level arrays
/// (`serviceImgs0`) and `<name><y>_<e>` for nested arrays
/// (`eventImgs0_1`). Each content type declares its table once; parsing
/// produces typed slots instead of string keys.
#[derive(Debug, Clone, Copy)]
pub enum SlotArity {
    Fixed,
    Indexed,
    Nested,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub name: &'static str,
    pub arity: SlotArity,
}

impl SlotSpec {
    pub const fn fixed(name: &'static str) -> Self {
        Self {
            name,
            arity: SlotArity::Fixed,
        }
    }

    pub const fn indexed(name: &'static str) -> Self {
        Self {
            name,
            arity: SlotArity::Indexed,
        }
    }

    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            arity: SlotArity::Nested,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Fixed(&'static str),
    Indexed(&'static str, usize),
    Nested(&'static str, usize, usize),
}

pub fn parse_slot(field_name: &str, specs: &[SlotSpec]) -> Option<Slot> {
    for spec in specs {
        let Some(rest) = field_name.strip_prefix(spec.name) else {
            continue;
        };
        match spec.arity {
            SlotArity::Fixed => {
                if rest.is_empty() {
                    return Some(Slot::Fixed(spec.name));
                }
            }
            SlotArity::Indexed => {
                if let Ok(index) = rest.parse::<usize>() {
                    return Some(Slot::Indexed(spec.name, index));
                }
            }
            SlotArity::Nested => {
                if let Some((outer, inner)) = rest.split_once('_') {
                    if let (Ok(outer), Ok(inner)) = (outer.parse::<usize>(), inner.parse::<usize>())
                    {
                        return Some(Slot::Nested(spec.name, outer, inner));
                    }
                }
            }
        }
    }
    None
}

#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Uploaded files grouped by typed slot. Single-file APIs and multi-file
/// pickers both end up as a sequence here, so consumers process one shape.
#[derive(Debug, Default)]
pub struct UploadSet {
    files: HashMap<Slot, Vec<UploadedFile>>,
}

impl UploadSet {
    fn push(&mut self, slot: Slot, file: UploadedFile) {
        self.files.entry(slot).or_default().push(file);
    }

    pub fn take(&mut self, slot: &Slot) -> Vec<UploadedFile> {
        self.files.remove(slot).unwrap_or_default()
    }

    /// For single-valued fields: the final file wins when several arrive
    /// under one slot; the earlier ones are never stored.
    pub fn take_last(&mut self, slot: &Slot) -> Option<UploadedFile> {
        self.take(slot).pop()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A parsed request body: the JSON field structure plus any uploads,
/// ready for the field and file reconcilers.
pub struct PagePayload {
    body: Map<String, Value>,
    pub uploads: UploadSet,
}

impl PagePayload {
    pub fn decode<T: DeserializeOwned>(self) -> Result<(T, UploadSet), ApiError> {
        let patch = serde_json::from_value(Value::Object(self.body))
            .map_err(|err| ApiError::Validation(format!("Invalid payload: {}", err)))?;
        Ok((patch, self.uploads))
    }
}

/// Reads a content-type request body. Multipart bodies carry
/// JSON-stringified field parts plus file parts named by the slot
/// convention; plain JSON bodies carry the field structure directly.
/// The upload size cap is enforced while the stream is read, before any
/// document is touched.
pub async fn read_page_payload(
    req: &HttpRequest,
    body: web::Payload,
    specs: &[SlotSpec],
    max_part_bytes: usize,
) -> Result<PagePayload, ApiError> {
    if is_multipart(req) {
        read_multipart_payload(req, body, specs, max_part_bytes).await
    } else {
        read_json_payload(body, max_part_bytes).await
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart_payload(
    req: &HttpRequest,
    body: web::Payload,
    specs: &[SlotSpec],
    max_part_bytes: usize,
) -> Result<PagePayload, ApiError> {
    let mut multipart = Multipart::new(req.headers(), body);
    let mut fields = Map::new();
    let mut uploads = UploadSet::default();

    while let Some(mut field) = multipart
        .try_next()
        .await
        .map_err(|err| ApiError::Validation(format!("Malformed multipart body: {}", err)))?
    {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or("").to_string();
        let filename = disposition.get_filename().map(|value| value.to_string());

        let data = read_field_bytes(&mut field, max_part_bytes).await?;

        match filename {
            Some(filename) => match parse_slot(&name, specs) {
                Some(slot) => uploads.push(
                    slot,
                    UploadedFile {
                        original_name: filename,
                        data,
                    },
                ),
                None => log::debug!("Dropping file part with undeclared slot name '{}'", name),
            },
            None => {
                let text = String::from_utf8(data).map_err(|_| {
                    ApiError::Validation(format!("Field '{}' is not valid UTF-8", name))
                })?;
                fields.insert(name, json_or_string(&text));
            }
        }
    }

    Ok(PagePayload {
        body: fields,
        uploads,
    })
}

async fn read_json_payload(mut body: web::Payload, limit: usize) -> Result<PagePayload, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|err| ApiError::Validation(format!("Failed to read request body: {}", err)))?
    {
        if data.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(format!(
                "Request body exceeds the {} byte limit",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Ok(PagePayload {
            body: Map::new(),
            uploads: UploadSet::default(),
        });
    }

    let value: Value = serde_json::from_slice(&data)
        .map_err(|err| ApiError::Validation(format!("Invalid JSON body: {}", err)))?;
    let Value::Object(body) = value else {
        return Err(ApiError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    };

    Ok(PagePayload {
        body,
        uploads: UploadSet::default(),
    })
}

async fn read_field_bytes(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| ApiError::Validation(format!("Failed to read multipart part: {}", err)))?
    {
        if data.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(format!(
                "Uploaded part exceeds the {} byte limit",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Multipart text parts are JSON-stringified structures; bare strings are
/// kept as strings. The typed decode later fails closed on wrong shapes.
fn json_or_string(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
