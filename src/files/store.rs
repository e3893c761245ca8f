// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Prefix of every path this system owns. Anything else stored in a
/// file-reference field (external URLs, empty strings) is never touched.
pub const UPLOADS_PREFIX: &str = "/uploads/";

const MAX_EXTENSION_CHARS: usize = 10;

#[derive(Debug)]
pub enum StorageError {
    Write(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Write(msg) => write!(f, "upload write failed: {}", msg),
        }
    }
}

impl Error for StorageError {}

/// Persists uploaded blobs under a namespace-scoped directory and hands
/// back the root-relative path recorded in document fields. Consumers
/// prepend the serving origin; the server never rewrites stored paths.
#[derive(Debug, Clone)]
pub struct FileStore {
    uploads_dir: PathBuf,
}

impl FileStore {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn store(
        &self,
        original_name: &str,
        data: &[u8],
        namespace: &str,
    ) -> Result<String, StorageError> {
        let file_name = match sanitize_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let dir = self.uploads_dir.join(namespace);
        fs::create_dir_all(&dir).map_err(|err| {
            StorageError::Write(format!(
                "Failed to create upload directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let disk_path = dir.join(&file_name);
        fs::write(&disk_path, data).map_err(|err| {
            StorageError::Write(format!(
                "Failed to write upload '{}': {}",
                disk_path.display(),
                err
            ))
        })?;
        Ok(format!("{}{}/{}", UPLOADS_PREFIX, namespace, file_name))
    }

    pub fn is_owned(path: &str) -> bool {
        path.starts_with(UPLOADS_PREFIX)
    }

    /// Best-effort cleanup: only owned paths are considered, failures are
    /// logged and swallowed so a missed delete never aborts the
    /// surrounding save.
    pub fn best_effort_delete(&self, public_path: &str) {
        if !Self::is_owned(public_path) {
            return;
        }
        let Some(disk_path) = self.disk_path(public_path) else {
            warn!("Refusing to delete suspicious upload path: {}", public_path);
            return;
        };
        if let Err(err) = fs::remove_file(&disk_path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to delete upload {}: {}", public_path, err);
            }
        }
    }

    pub fn exists(&self, public_path: &str) -> bool {
        self.disk_path(public_path)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn disk_path(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path.strip_prefix(UPLOADS_PREFIX)?;
        let mut out = self.uploads_dir.clone();
        for part in relative.split('/') {
            if part.is_empty() || part == "." || part == ".." || part.contains('\\') {
                return None;
            }
            out.push(part);
        }
        Some(out)
    }
}

fn sanitize_extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_CHARS
        || !ext.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    fn store(fixture: &TestFixtureRoot) -> FileStore {
        FileStore::new(fixture.uploads_dir())
    }

    #[test]
    fn store_writes_namespaced_file_and_returns_public_path() {
        let fixture = TestFixtureRoot::new_unique("file-store-write").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");
        let store = store(&fixture);

        let path = store
            .store("banner.PNG", b"fake image bytes", "home")
            .expect("store file");
        assert!(path.starts_with("/uploads/home/"));
        assert!(path.ends_with(".png"));
        assert!(store.exists(&path));
    }

    #[test]
    fn store_without_usable_extension_still_works() {
        let fixture = TestFixtureRoot::new_unique("file-store-noext").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");
        let store = store(&fixture);

        let path = store.store("noextension", b"data", "about").expect("store");
        assert!(!path.contains('.'));
        assert!(store.exists(&path));

        let weird = store.store("x.tar.gz!!", b"data", "about").expect("store");
        assert!(store.exists(&weird));
    }

    #[test]
    fn best_effort_delete_removes_owned_files() {
        let fixture = TestFixtureRoot::new_unique("file-store-delete").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");
        let store = store(&fixture);

        let path = store.store("a.png", b"bytes", "gallery").expect("store");
        store.best_effort_delete(&path);
        assert!(!store.exists(&path));
    }

    #[test]
    fn best_effort_delete_ignores_external_and_missing_paths() {
        let fixture = TestFixtureRoot::new_unique("file-store-skip").expect("fixture root");
        fixture.init_runtime_layout().expect("fixture layout");
        let store = store(&fixture);

        // Must not panic or error in any of these cases.
        store.best_effort_delete("https://cdn.example.com/logo.png");
        store.best_effort_delete("");
        store.best_effort_delete("/uploads/home/never-existed.png");
        store.best_effort_delete("/uploads/../../etc/passwd");
    }

    #[test]
    fn ownership_is_decided_by_prefix() {
        assert!(FileStore::is_owned("/uploads/home/a.png"));
        assert!(!FileStore::is_owned("https://cdn.example.com/a.png"));
        assert!(!FileStore::is_owned(""));
        assert!(!FileStore::is_owned("uploads/home/a.png"));
    }
}
