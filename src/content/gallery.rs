// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

use crate::files::{FileStore, StorageError};
use crate::storage::DocumentFields;

use super::controller::ContentPage;
use super::lenient_year;
use super::payload::{Slot, SlotSpec, UploadSet};
use super::{PageHero, PageHeroPatch, merge_hero};

const HERO_BG: &str = "heroBg";
const EVENT_IMGS: &str = "eventImgs";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryEvent {
    pub title: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YearBlock {
    #[serde(deserialize_with = "lenient_year")]
    pub year: i32,
    pub events: Vec<GalleryEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryPage {
    pub hero: PageHero,
    pub years: Vec<YearBlock>,
}

impl Default for GalleryPage {
    fn default() -> Self {
        Self {
            hero: PageHero::titled("Our Gallery"),
            years: Vec::new(),
        }
    }
}

impl DocumentFields for GalleryPage {
    const COLLECTION: &'static str = "gallery";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryPatch {
    pub hero: Option<PageHeroPatch>,
    pub years: Option<Vec<YearBlock>>,
}

impl ContentPage for GalleryPage {
    const LABEL: &'static str = "Gallery";
    const NAMESPACE: &'static str = "gallery";
    const SLOTS: &'static [SlotSpec] =
        &[SlotSpec::fixed(HERO_BG), SlotSpec::nested(EVENT_IMGS)];

    type Patch = GalleryPatch;

    fn apply_patch(&mut self, patch: GalleryPatch) {
        if let Some(hero) = patch.hero {
            merge_hero(&mut self.hero, hero);
        }
        if let Some(mut years) = patch.years {
            for year in &mut years {
                for event in &mut year.events {
                    event.images.retain(|path| !path.is_empty());
                }
            }
            self.years = years;
        }
    }

    /// New event images are appended, never replacing the entries the
    /// payload kept; client-side removals surface through the caller's
    /// before/after diff.
    fn apply_uploads(
        &mut self,
        uploads: &mut UploadSet,
        store: &FileStore,
    ) -> Result<(), StorageError> {
        if let Some(file) = uploads.take_last(&Slot::Fixed(HERO_BG)) {
            self.hero.bg_image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
        }
        for (year_index, year) in self.years.iter_mut().enumerate() {
            for (event_index, event) in year.events.iter_mut().enumerate() {
                for file in uploads.take(&Slot::Nested(EVENT_IMGS, year_index, event_index)) {
                    event
                        .images
                        .push(store.store(&file.original_name, &file.data, Self::NAMESPACE)?);
                }
            }
        }
        Ok(())
    }

    fn image_paths(&self) -> Vec<String> {
        let mut paths = vec![self.hero.bg_image.clone()];
        for year in &self.years {
            for event in &year.events {
                paths.extend(event.images.iter().cloned());
            }
        }
        paths.retain(|path| !path.is_empty());
        paths
    }
}
