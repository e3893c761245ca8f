// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ValidatedConfig;
use crate::files::FileStore;
use crate::runtime_paths::RuntimePaths;
use crate::storage::Database;

pub struct AppState {
    pub db: Database,
    pub files: FileStore,
    pub upload_limit_bytes: usize,
}

impl AppState {
    pub fn new(config: &ValidatedConfig, runtime_paths: &RuntimePaths) -> Self {
        Self {
            db: Database::new(runtime_paths.data_dir.clone()),
            files: FileStore::new(runtime_paths.uploads_dir.clone()),
            upload_limit_bytes: config.upload_limit_bytes(),
        }
    }
}
