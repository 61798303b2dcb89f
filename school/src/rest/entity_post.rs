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

//! API to create an entity.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use campus_core::driver::entity::{Entity, EntityDriver};
use campus_core::rest::RestError;
use serde::Serialize;

/// API handler.
pub(crate) async fn handler<E>(
    State(driver): State<EntityDriver<E>>,
    Json(entity): Json<Option<E>>,
) -> Result<impl IntoResponse, RestError>
where
    E: Entity + Serialize,
{
    let entity = driver.create(entity).await?;
    Ok(Json(entity))
}
