// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

use crate::files::{FileStore, StorageError};
use crate::storage::DocumentFields;

use super::controller::ContentPage;
use super::lenient_i64;
use super::payload::{Slot, SlotSpec, UploadSet};

const HERO_IMAGES: &str = "heroImages";
const WELCOME_CARD_IMGS: &str = "welcomeCardImgs";
const ABOUT_IMGS: &str = "aboutImgs";
const CONFERENCE_IMGS: &str = "conferenceImgs";
const SUSTAIN_IMAGE: &str = "sustainImage";
const TESTIMONIAL_PHOTOS: &str = "testimonialPhotos";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeHero {
    pub images: Vec<HeroImage>,
    pub heading: String,
    pub subheading: String,
    pub button_text: String,
}

impl Default for HomeHero {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            heading: "THE PROXIMA".to_string(),
            subheading: String::new(),
            button_text: "Explore Conferences".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomeCard {
    pub image: String,
    pub title: String,
    pub desc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Welcome {
    pub heading: String,
    pub content: String,
    pub cards: Vec<WelcomeCard>,
}

impl Default for Welcome {
    fn default() -> Self {
        Self {
            heading: "Welcome to Proxima".to_string(),
            content: String::new(),
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stat {
    pub label: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub value: i64,
    pub suffix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutBlock {
    pub image: String,
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceCard {
    pub title: String,
    pub img: String,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sustainable {
    pub content: String,
    pub image: String,
    pub image_alt: String,
}

impl Default for Sustainable {
    fn default() -> Self {
        Self {
            content: String::new(),
            image: String::new(),
            image_alt: "Sustainable Conferences".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub name: String,
    pub affiliation: String,
    pub comment: String,
    pub photo: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePage {
    pub hero: HomeHero,
    pub welcome: Welcome,
    pub stats: Vec<Stat>,
    pub about: Vec<AboutBlock>,
    pub conferences: Vec<ConferenceCard>,
    pub sustainable_conferences: Sustainable,
    pub testimonials: Vec<Testimonial>,
}

impl DocumentFields for HomePage {
    const COLLECTION: &'static str = "home";
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeHeroPatch {
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub button_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomePatch {
    pub heading: Option<String>,
    pub content: Option<String>,
    pub cards: Option<Vec<WelcomeCard>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SustainablePatch {
    pub content: Option<String>,
    pub image_alt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePatch {
    pub hero: Option<HomeHeroPatch>,
    pub welcome: Option<WelcomePatch>,
    pub stats: Option<Vec<Stat>>,
    pub about: Option<Vec<AboutBlock>>,
    pub conferences: Option<Vec<ConferenceCard>>,
    pub sustainable_conferences: Option<SustainablePatch>,
    pub testimonials: Option<Vec<Testimonial>>,
}

impl ContentPage for HomePage {
    const LABEL: &'static str = "Home";
    const NAMESPACE: &'static str = "home";
    const SLOTS: &'static [SlotSpec] = &[
        SlotSpec::fixed(HERO_IMAGES),
        SlotSpec::indexed(WELCOME_CARD_IMGS),
        SlotSpec::indexed(ABOUT_IMGS),
        SlotSpec::indexed(CONFERENCE_IMGS),
        SlotSpec::fixed(SUSTAIN_IMAGE),
        SlotSpec::indexed(TESTIMONIAL_PHOTOS),
    ];

    type Patch = HomePatch;

    fn apply_patch(&mut self, patch: HomePatch) {
        if let Some(hero) = patch.hero {
            if let Some(heading) = hero.heading {
                self.hero.heading = heading;
            }
            if let Some(subheading) = hero.subheading {
                self.hero.subheading = subheading;
            }
            if let Some(button_text) = hero.button_text {
                self.hero.button_text = button_text;
            }
        }
        if let Some(welcome) = patch.welcome {
            if let Some(heading) = welcome.heading {
                self.welcome.heading = heading;
            }
            if let Some(content) = welcome.content {
                self.welcome.content = content;
            }
            if let Some(cards) = welcome.cards {
                self.welcome.cards = cards;
            }
        }
        if let Some(stats) = patch.stats {
            self.stats = stats;
        }
        if let Some(about) = patch.about {
            self.about = about;
        }
        if let Some(conferences) = patch.conferences {
            self.conferences = conferences;
        }
        if let Some(sustainable) = patch.sustainable_conferences {
            if let Some(content) = sustainable.content {
                self.sustainable_conferences.content = content;
            }
            if let Some(image_alt) = sustainable.image_alt {
                self.sustainable_conferences.image_alt = image_alt;
            }
        }
        if let Some(testimonials) = patch.testimonials {
            self.testimonials = testimonials;
        }
    }

    fn apply_uploads(
        &mut self,
        uploads: &mut UploadSet,
        store: &FileStore,
    ) -> Result<(), StorageError> {
        // The hero image list is replaced wholesale by its slot; the
        // previous entries fall out of the document and get swept by the
        // caller's owned-path diff.
        let hero_files = uploads.take(&Slot::Fixed(HERO_IMAGES));
        if !hero_files.is_empty() {
            let mut images = Vec::with_capacity(hero_files.len());
            for file in &hero_files {
                let alt = if file.original_name.is_empty() {
                    "Hero image".to_string()
                } else {
                    file.original_name.clone()
                };
                images.push(HeroImage {
                    src: store.store(&file.original_name, &file.data, Self::NAMESPACE)?,
                    alt,
                });
            }
            self.hero.images = images;
        }

        for (index, card) in self.welcome.cards.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(WELCOME_CARD_IMGS, index)) {
                card.image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }

        for (index, block) in self.about.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(ABOUT_IMGS, index)) {
                block.image = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }

        for (index, conference) in self.conferences.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(CONFERENCE_IMGS, index)) {
                conference.img = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }

        if let Some(file) = uploads.take_last(&Slot::Fixed(SUSTAIN_IMAGE)) {
            self.sustainable_conferences.image =
                store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
        }

        for (index, testimonial) in self.testimonials.iter_mut().enumerate() {
            if let Some(file) = uploads.take_last(&Slot::Indexed(TESTIMONIAL_PHOTOS, index)) {
                testimonial.photo = store.store(&file.original_name, &file.data, Self::NAMESPACE)?;
            }
        }

        Ok(())
    }

    fn image_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        paths.extend(self.hero.images.iter().map(|image| image.src.clone()));
        paths.extend(self.welcome.cards.iter().map(|card| card.image.clone()));
        paths.extend(self.about.iter().map(|block| block.image.clone()));
        paths.extend(self.conferences.iter().map(|conference| conference.img.clone()));
        paths.push(self.sustainable_conferences.image.clone());
        paths.extend(self.testimonials.iter().map(|t| t.photo.clone()));
        paths.retain(|path| !path.is_empty());
        paths
    }
}
