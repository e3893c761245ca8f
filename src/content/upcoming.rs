// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

use crate::files::{FileStore, StorageError};
use crate::storage::DocumentFields;

use super::controller::ContentPage;
use super::payload::{Slot, SlotSpec, UploadSet};
use super::{PageHero, PageHeroPatch, merge_hero};

const HERO_BG: &str = "heroBg";
const EVENT_IMG: &str = "eventImg";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpcomingEvent {
    pub title: String,
    // Dates travel as strings, 'YYYY-MM-DD' or ISO.
    pub start_date: String,
    pub end_date: String,
    pub country: String,
    pub city: String,
    pub image: String,
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpcomingPage {
    pub hero: PageHero,
    pub events: Vec<UpcomingEvent>,
}

impl Default for UpcomingPage {
    fn default() -> Self {
        Self {
            hero: PageHero::titled("Upcoming Events"),
            events: Vec::new(),
        }
    }
}

impl DocumentFields for UpcomingPage {
    const COLLECTION: &'static str = "upcoming";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpcomingPatch {
    pub hero: Option<PageHeroPatch>,
    pub events: Option<Vec<UpcomingEvent>>,
}

impl ContentPage for UpcomingPage {
    const LABEL: &'static str = "Upcoming";
    const NAMESPACE: &'static str = "upcoming";
    const SLOTS: &'static [SlotSpec] =
        &[SlotSpec::fixed(HERO_BG), SlotSpec::indexed(EVENT_IMG)];

    type Patch = UpcomingPatch;

    fn apply_patch(&mut self, patch: UpcomingPatch) {
        if let Some(hero) = patch.hero {
            merge_hero(&mut self.hero, hero);
        }
        if let Some(events) = patch.events {
            self.events = events;
        }
    }

    fn apply_uploads(
        &mut self,
        uploads: &mut UploadSet,
        store: &FileStore,
    ) -> Result<(), StorageError> {
        if let Some(file) = uploads.take_last(&Slot::Fixed(HERO_BG)) {
            self.hero.bg_image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
        }
        for (index, event) in self.events.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(EVENT_IMG, index)) {
                event.image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }
        Ok(())
    }

    fn image_paths(&self) -> Vec<String> {
        let mut paths = vec![self.hero.bg_image.clone()];
        paths.extend(self.events.iter().map(|event| event.image.clone()));
        paths.retain(|path| !path.is_empty());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_replace_wholesale_and_keep_round_tripped_paths() {
        let mut page = UpcomingPage::default();
        page.events = vec![
            UpcomingEvent {
                title: "Removed".to_string(),
                image: "/uploads/upcoming/removed.png".to_string(),
                ..UpcomingEvent::default()
            },
            UpcomingEvent {
                title: "Kept".to_string(),
                image: "/uploads/upcoming/kept.png".to_string(),
                ..UpcomingEvent::default()
            },
        ];

        let patch: UpcomingPatch = serde_json::from_value(serde_json::json!({
            "events": [{
                "title": "Kept",
                "startDate": "2026-09-01",
                "image": "/uploads/upcoming/kept.png"
            }]
        }))
        .expect("patch");
        page.apply_patch(patch);

        assert_eq!(page.events.len(), 1);
        assert_eq!(page.events[0].image, "/uploads/upcoming/kept.png");
        assert_eq!(page.events[0].start_date, "2026-09-01");
        assert_eq!(page.events[0].country, "");
    }
}
