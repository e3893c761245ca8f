// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use uuid::Uuid;

use super::json_store::{read_json_file, write_json_file};

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Duplicate,
    Io(String),
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "document not found"),
            StoreError::Duplicate => write!(f, "unique key already present"),
            StoreError::Io(msg) => write!(f, "document store I/O failed: {}", msg),
            StoreError::Parse(msg) => write!(f, "document store parse failed: {}", msg),
        }
    }
}

impl Error for StoreError {}

/// The payload of one document type. `COLLECTION` names the JSON file the
/// type's documents live in under the data directory.
pub trait DocumentFields: Serialize + DeserializeOwned + Default + Clone {
    const COLLECTION: &'static str;
}

/// Envelope persisted around every document: immutable id plus
/// creation/update timestamps, with the type's fields flattened beside
/// them in the stored JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: T,
}

impl<T: DocumentFields> Document<T> {
    pub fn new(fields: T) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            fields,
        }
    }
}

/// Hands out typed repositories over one data directory.
#[derive(Debug, Clone)]
pub struct Database {
    data_dir: PathBuf,
}

impl Database {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn collection<T: DocumentFields>(&self) -> Repository<T> {
        Repository {
            path: self.data_dir.join(format!("{}.json", T::COLLECTION)),
            label: T::COLLECTION,
            _fields: PhantomData,
        }
    }
}

pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: usize,
}

pub struct Repository<T> {
    path: PathBuf,
    label: &'static str,
    _fields: PhantomData<T>,
}

impl<T: DocumentFields> Repository<T> {
    fn load_all(&self) -> Result<Vec<Document<T>>, StoreError> {
        read_json_file(&self.path, self.label)
            .map(Option::unwrap_or_default)
            .map_err(|err| StoreError::Parse(err.to_string()))
    }

    fn store_all(&self, docs: &[Document<T>]) -> Result<(), StoreError> {
        write_json_file(&self.path, self.label, &docs)
            .map_err(|err| StoreError::Io(err.to_string()))
    }

    /// Returns the collection's first document, creating one with default
    /// fields if the collection is empty. Never reports absence.
    pub fn find_singleton(&self) -> Result<Document<T>, StoreError> {
        let mut docs = self.load_all()?;
        if let Some(first) = docs.first() {
            return Ok(first.clone());
        }
        let doc = Document::new(T::default());
        docs.push(doc.clone());
        self.store_all(&docs)?;
        Ok(doc)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Document<T>, StoreError> {
        self.load_all()?
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or(StoreError::NotFound)
    }

    pub fn find_first<F>(&self, pred: F) -> Result<Option<Document<T>>, StoreError>
    where
        F: Fn(&Document<T>) -> bool,
    {
        Ok(self.load_all()?.into_iter().find(|doc| pred(doc)))
    }

    /// Persists the full document state, bumping `updatedAt`. Inserts the
    /// document if its id is not present yet.
    pub fn save(&self, doc: &mut Document<T>) -> Result<(), StoreError> {
        doc.updated_at = Utc::now();
        let mut docs = self.load_all()?;
        match docs.iter_mut().find(|existing| existing.id == doc.id) {
            Some(slot) => *slot = doc.clone(),
            None => docs.push(doc.clone()),
        }
        self.store_all(&docs)
    }

    /// Inserts a new document unless `collides` matches an existing one.
    /// The check runs against freshly loaded state so a lost race between
    /// lookup and insert still surfaces as `Duplicate`.
    pub fn insert_unique<F>(&self, doc: Document<T>, collides: F) -> Result<Document<T>, StoreError>
    where
        F: Fn(&Document<T>) -> bool,
    {
        let mut docs = self.load_all()?;
        if docs.iter().any(collides) {
            return Err(StoreError::Duplicate);
        }
        docs.push(doc.clone());
        self.store_all(&docs)?;
        Ok(doc)
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut docs = self.load_all()?;
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound);
        }
        self.store_all(&docs)
    }

    /// Filtered page of the collection, newest first.
    pub fn list<F>(
        &self,
        filter: F,
        page: usize,
        limit: usize,
    ) -> Result<ListPage<Document<T>>, StoreError>
    where
        F: Fn(&Document<T>) -> bool,
    {
        let mut docs: Vec<Document<T>> =
            self.load_all()?.into_iter().filter(|doc| filter(doc)).collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = docs.len();
        let start = page.saturating_sub(1).saturating_mul(limit);
        let items = docs.into_iter().skip(start).take(limit).collect();
        Ok(ListPage { items, total })
    }
}
