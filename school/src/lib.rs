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

//! REST service to manage the students, teachers, classrooms and courses of a school.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use campus_core::clocks::SystemClock;
use campus_core::db::Db;
use campus_core::driver::DriverOptions;
use campus_core::driver::audit::{AuditSink, LogAuditSink};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod db;
pub mod driver;
use driver::SchoolDriver;
pub mod model;
mod rest;
use rest::app;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    opts: DriverOptions,
) -> Result<(), Box<dyn Error>> {
    let audit = Arc::new(LogAuditSink::default());
    let driver = SchoolDriver::new(db, Arc::new(SystemClock::default()), audit.clone(), opts);
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    audit.log_information(&format!("Listening on {}", listener.local_addr()?)).await;
    axum::serve(listener, app).await?;
    Ok(())
}
