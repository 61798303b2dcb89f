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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::SchoolDriver;
use campus_core::clocks::testutils::SettableClock;
use campus_core::driver::DriverOptions;
use campus_core::driver::testutils::RecorderAuditSink;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

/// Current time as seen by the driver under test, later than `db::testutils::CREATED`.
pub(crate) const NOW: OffsetDateTime = datetime!(2023-10-01 12:00:00 UTC);

/// State of a driver test backed by an in-memory SQLite database.
pub(crate) struct TestContext {
    /// Access to the database underneath the driver.
    db: db::testutils::TestContext,

    /// The clock read by the driver.
    clock: Arc<SettableClock>,

    /// Recorder of the failures reported by the driver.
    audit: RecorderAuditSink,

    /// The driver under test.
    driver: SchoolDriver,
}

impl TestContext {
    /// Sets up a new driver with the given `opts`.
    pub(crate) async fn setup_with_opts(opts: DriverOptions) -> Self {
        let db = db::testutils::TestContext::setup().await;
        let clock = Arc::new(SettableClock::new(NOW));
        let audit = RecorderAuditSink::default();
        let driver = SchoolDriver::new(db.db(), clock.clone(), Arc::new(audit.clone()), opts);
        Self { db, clock, audit, driver }
    }

    /// Sets up a new driver with the default options.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_opts(DriverOptions::default()).await
    }

    /// Returns the database context to inspect or alter the stored data.
    pub(crate) fn db(&self) -> &db::testutils::TestContext {
        &self.db
    }

    /// Returns the clock read by the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Returns the recorder of the failures reported by the driver.
    pub(crate) fn audit(&self) -> &RecorderAuditSink {
        &self.audit
    }

    /// Returns a copy of the driver under test.
    pub(crate) fn driver(&self) -> SchoolDriver {
        self.driver.clone()
    }
}
