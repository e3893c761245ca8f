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
const SECTION_IMGS: &str = "sectionImgs";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSection {
    pub heading: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Counter {
    pub title: String,
    // Display string, "124+" and the like.
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApproachItem {
    pub title: String,
    pub text: String,
    pub color: String,
    pub color_hex: String,
}

impl Default for ApproachItem {
    fn default() -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            color: "border-blue-500".to_string(),
            color_hex: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutPage {
    pub hero: PageHero,
    pub content_sections: Vec<ContentSection>,
    pub counters: Vec<Counter>,
    pub approach: Vec<ApproachItem>,
}

impl Default for AboutPage {
    fn default() -> Self {
        Self {
            hero: PageHero::titled("About Proxima"),
            content_sections: Vec::new(),
            counters: Vec::new(),
            approach: Vec::new(),
        }
    }
}

impl DocumentFields for AboutPage {
    const COLLECTION: &'static str = "about";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutPatch {
    pub hero: Option<PageHeroPatch>,
    pub content_sections: Option<Vec<ContentSection>>,
    pub counters: Option<Vec<Counter>>,
    pub approach: Option<Vec<ApproachItem>>,
}

impl ContentPage for AboutPage {
    const LABEL: &'static str = "About";
    const NAMESPACE: &'static str = "about";
    const SLOTS: &'static [SlotSpec] =
        &[SlotSpec::fixed(HERO_BG), SlotSpec::indexed(SECTION_IMGS)];

    type Patch = AboutPatch;

    fn apply_patch(&mut self, patch: AboutPatch) {
        if let Some(hero) = patch.hero {
            merge_hero(&mut self.hero, hero);
        }
        if let Some(sections) = patch.content_sections {
            self.content_sections = sections;
        }
        if let Some(counters) = patch.counters {
            self.counters = counters;
        }
        if let Some(approach) = patch.approach {
            self.approach = approach;
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
        for (index, section) in self.content_sections.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(SECTION_IMGS, index)) {
                section.image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }
        Ok(())
    }

    fn image_paths(&self) -> Vec<String> {
        let mut paths = vec![self.hero.bg_image.clone()];
        paths.extend(self.content_sections.iter().map(|section| section.image.clone()));
        paths.retain(|path| !path.is_empty());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_carries_type_specific_hero() {
        let page = AboutPage::default();
        assert_eq!(page.hero.title, "About Proxima");
        assert_eq!(page.hero.bg_image, "");
    }

    #[test]
    fn sections_round_trip_existing_image_paths() {
        let mut page = AboutPage::default();
        page.content_sections = vec![ContentSection {
            heading: "Who we are".to_string(),
            description: String::new(),
            image: "/uploads/about/old.png".to_string(),
        }];

        // Client resends the section with its kept path, editing only text.
        let patch: AboutPatch = serde_json::from_value(serde_json::json!({
            "contentSections": [
                { "heading": "Who we are", "description": "Updated", "image": "/uploads/about/old.png" }
            ]
        }))
        .expect("patch");
        page.apply_patch(patch);

        assert_eq!(page.content_sections[0].description, "Updated");
        assert_eq!(page.content_sections[0].image, "/uploads/about/old.png");
    }

    #[test]
    fn approach_items_default_the_tailwind_color() {
        let patch: AboutPatch = serde_json::from_value(serde_json::json!({
            "approach": [{ "title": "Quality", "text": "We review everything" }]
        }))
        .expect("patch");
        let mut page = AboutPage::default();
        page.apply_patch(patch);
        assert_eq!(page.approach[0].color, "border-blue-500");
    }
}
