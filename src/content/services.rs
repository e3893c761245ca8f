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
const SERVICE_IMGS: &str = "serviceImgs";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceItem {
    pub title: String,
    pub description: String,
    pub points: Vec<String>,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesPage {
    pub hero: PageHero,
    pub services: Vec<ServiceItem>,
}

impl Default for ServicesPage {
    fn default() -> Self {
        Self {
            hero: PageHero::titled("Our Services"),
            services: Vec::new(),
        }
    }
}

impl DocumentFields for ServicesPage {
    const COLLECTION: &'static str = "services";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesPatch {
    pub hero: Option<PageHeroPatch>,
    pub services: Option<Vec<ServiceItem>>,
}

impl ContentPage for ServicesPage {
    const LABEL: &'static str = "Services";
    const NAMESPACE: &'static str = "services";
    const SLOTS: &'static [SlotSpec] =
        &[SlotSpec::fixed(HERO_BG), SlotSpec::indexed(SERVICE_IMGS)];

    type Patch = ServicesPatch;

    fn apply_patch(&mut self, patch: ServicesPatch) {
        if let Some(hero) = patch.hero {
            merge_hero(&mut self.hero, hero);
        }
        if let Some(services) = patch.services {
            self.services = services;
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
        for (index, service) in self.services.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(SERVICE_IMGS, index)) {
                service.image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }
        Ok(())
    }

    fn image_paths(&self) -> Vec<String> {
        let mut paths = vec![self.hero.bg_image.clone()];
        paths.extend(self.services.iter().map(|service| service.image.clone()));
        paths.retain(|path| !path.is_empty());
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_items_sanitize_to_declared_fields() {
        let patch: ServicesPatch = serde_json::from_value(serde_json::json!({
            "services": [{
                "title": "Conference planning",
                "points": ["Venue", "Catering"],
                "legacyField": "dropped"
            }]
        }))
        .expect("patch");

        let mut page = ServicesPage::default();
        page.apply_patch(patch);
        assert_eq!(page.services[0].title, "Conference planning");
        assert_eq!(page.services[0].description, "");
        assert_eq!(page.services[0].points, vec!["Venue", "Catering"]);

        let value = serde_json::to_value(&page.services[0]).expect("serialize");
        assert!(value.get("legacyField").is_none());
    }

    #[test]
    fn absent_services_array_is_retained() {
        let mut page = ServicesPage::default();
        page.services = vec![ServiceItem {
            title: "Existing".to_string(),
            ..ServiceItem::default()
        }];

        let patch: ServicesPatch =
            serde_json::from_value(serde_json::json!({ "hero": { "subtitle": "tagline" } }))
                .expect("patch");
        page.apply_patch(patch);

        assert_eq!(page.services.len(), 1);
        assert_eq!(page.services[0].title, "Existing");
        assert_eq!(page.hero.subtitle, "tagline");
    }
}
