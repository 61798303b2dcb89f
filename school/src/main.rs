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

//! Entry point to the school management service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use campus_core::db::{Db, sqlite};
use campus_core::driver::DriverOptions;
use campus_core::env::get_optional_var;
use campus_school::db::init_schema;
use campus_school::serve;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Default port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Default SQLite connection string when `SCHOOL_DATABASE` is not set.
const DEFAULT_DATABASE: &str = ":memory:";

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = match std::env::var("PORT") {
        Ok(val) => val.parse().expect("PORT has to be a number"),
        Err(_) => DEFAULT_PORT,
    };
    let addr = (Ipv4Addr::LOCALHOST, port);

    let conn_str = get_optional_var::<String>("SCHOOL", "DATABASE")
        .unwrap()
        .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
    let opts = DriverOptions::from_env("SCHOOL").unwrap();

    let db = Arc::new(sqlite::connect(&conn_str).await.unwrap());
    init_schema(&mut db.ex().await.unwrap()).await.unwrap();

    serve(addr, db.clone(), opts).await.unwrap();
    db.close().await;
}
