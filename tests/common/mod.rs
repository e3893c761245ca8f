// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use proxima::app_state::AppState;
use proxima::config::Config;
use proxima::util::test_fixtures::TestFixtureRoot;

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub state: web::Data<AppState>,
}

impl TestHarness {
    pub fn new(prefix: &str) -> Self {
        let fixture = TestFixtureRoot::new_unique(prefix).expect("fixture root");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");
        let config = Config::default().validate().expect("default config");
        let state = web::Data::new(AppState::new(&config, &runtime_paths));
        Self { fixture, state }
    }
}

pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(proxima::content::configure)
        .configure(proxima::crud::configure)
}

pub const BOUNDARY: &str = "----proxima-test-boundary";

pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
}

/// Assembles a multipart/form-data body the way the admin UI sends it:
/// JSON-stringified field parts plus slot-named file parts.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}
