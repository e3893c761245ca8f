// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod about;
pub mod controller;
pub mod gallery;
pub mod guidelines;
pub mod home;
pub mod payload;
pub mod services;
pub mod upcoming;

pub use controller::ContentPage;

use actix_web::web;
use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub fn configure(cfg: &mut web::ServiceConfig) {
    controller::register::<home::HomePage>(cfg, "/api/home");
    controller::register::<about::AboutPage>(cfg, "/api/aboutus");
    controller::register::<services::ServicesPage>(cfg, "/api/services");
    controller::register::<gallery::GalleryPage>(cfg, "/api/gallery");
    controller::register::<upcoming::UpcomingPage>(cfg, "/api/upcoming");
    guidelines::configure(cfg);
}

/// Hero block shared by the About, Services, Gallery and Upcoming pages.
/// `bgImage` is a file reference written only by the `heroBg` upload
/// slot, never by the field reconciler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageHero {
    pub title: String,
    pub subtitle: String,
    pub bg_image: String,
}

impl PageHero {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageHeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

pub(crate) fn merge_hero(hero: &mut PageHero, patch: PageHeroPatch) {
    if let Some(title) = patch.title {
        hero.title = title;
    }
    if let Some(subtitle) = patch.subtitle {
        hero.subtitle = subtitle;
    }
}

/// Number-or-numeric-string coercion for numeric sub-fields; anything
/// else becomes 0.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value).unwrap_or(0))
}

/// Like `lenient_i64` but falls back to the current year, for gallery
/// year blocks arriving without a usable number.
pub(crate) fn lenient_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value)
        .and_then(|year| i32::try_from(year).ok())
        .unwrap_or_else(|| chrono::Utc::now().year()))
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|float| float as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "lenient_i64")]
        value: i64,
        #[serde(deserialize_with = "lenient_year")]
        year: i32,
    }

    #[test]
    fn numeric_fields_coerce_from_numbers_and_strings() {
        let parsed: Wrapper =
            serde_json::from_value(serde_json::json!({"value": 12, "year": "2023"})).unwrap();
        assert_eq!(parsed.value, 12);
        assert_eq!(parsed.year, 2023);

        let parsed: Wrapper =
            serde_json::from_value(serde_json::json!({"value": "250", "year": 2019.0})).unwrap();
        assert_eq!(parsed.value, 250);
        assert_eq!(parsed.year, 2019);
    }

    #[test]
    fn unusable_numbers_fall_back() {
        let parsed: Wrapper =
            serde_json::from_value(serde_json::json!({"value": "lots", "year": null})).unwrap();
        assert_eq!(parsed.value, 0);
        assert_eq!(parsed.year, chrono::Utc::now().year());
    }

    #[test]
    fn merge_hero_retains_absent_fields() {
        let mut hero = PageHero::titled("Our Gallery");
        hero.bg_image = "/uploads/gallery/a.png".to_string();
        merge_hero(
            &mut hero,
            PageHeroPatch {
                title: None,
                subtitle: Some("2024 edition".to_string()),
            },
        );
        assert_eq!(hero.title, "Our Gallery");
        assert_eq!(hero.subtitle, "2024 edition");
        assert_eq!(hero.bg_image, "/uploads/gallery/a.png");
    }
}
