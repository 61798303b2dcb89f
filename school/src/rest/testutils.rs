// Campus
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Test utilities for the REST API.

use crate::db;
use crate::driver;
use crate::rest::app;
use axum::Router;
use campus_core::driver::testutils::RecorderAuditSink;

/// State of a REST test backed by an in-memory SQLite database.
pub(crate) struct TestContext {
    /// The driver context, which gives access to the database and to the recorders.
    driver: driver::testutils::TestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Sets up a new app.
    pub(crate) async fn setup() -> Self {
        let driver = driver::testutils::TestContext::setup().await;
        let app = app(driver.driver());
        Self { driver, app }
    }

    /// Returns a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Returns the database context to inspect or alter the stored data.
    pub(crate) fn db(&self) -> &db::testutils::TestContext {
        self.driver.db()
    }

    /// Returns the recorder of the failures reported by the driver.
    pub(crate) fn audit(&self) -> &RecorderAuditSink {
        self.driver.audit()
    }
}
