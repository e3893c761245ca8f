// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod conferences;
pub mod contact;
pub mod newsletter;
pub mod sponsors;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_PAGE_SIZE: usize = 20;

pub fn configure(cfg: &mut web::ServiceConfig) {
    contact::configure(cfg);
    newsletter::configure(cfg);
    conferences::configure(cfg);
    sponsors::configure(cfg);
}

/// Query parameters of the list endpoints. Everything arrives as text
/// and is parsed leniently; unusable values degrade to "no filter"
/// instead of erroring.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: usize,
    pub limit: usize,
}

impl ListQuery {
    pub fn paging(&self, max_limit: usize) -> Paging {
        let page = parse_usize(self.page.as_deref()).unwrap_or(1).max(1);
        let limit = parse_usize(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_limit);
        Paging { page, limit }
    }

    pub fn text_filter(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }

    /// Inclusive creation-date range. A `to` date given without a time
    /// component covers that whole day.
    pub fn date_range(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            parse_date(self.from.as_deref(), false),
            parse_date(self.to.as_deref(), true),
        )
    }
}

fn parse_usize(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
}

fn parse_date(raw: Option<&str>, end_of_day: bool) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(Utc.from_utc_datetime(&time))
}

pub fn created_within(
    created_at: DateTime<Utc>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if let Some(from) = from {
        if created_at < from {
            return false;
        }
    }
    if let Some(to) = to {
        if created_at > to {
            return false;
        }
    }
    true
}

/// Case-insensitive substring match over the resource's declared text
/// fields, combined with OR. `needle` must already be lowercased.
pub fn matches_text(needle: &str, fields: &[&str]) -> bool {
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

pub fn list_response<T: Serialize>(items: &[T], total: usize, paging: Paging) -> HttpResponse {
    let pages = total.div_ceil(paging.limit);
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": items,
        "page": paging.page,
        "limit": paging.limit,
        "total": total,
        "pages": pages,
    }))
}

/// Request metadata recorded on inbound contact/newsletter documents.
pub struct ClientMeta {
    pub ip: String,
    pub user_agent: String,
}

pub fn client_meta(req: &HttpRequest) -> ClientMeta {
    let ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    ClientMeta { ip, user_agent }
}
