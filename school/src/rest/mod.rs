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

//! Entry point to the REST server.
//!
//! All entities share the same four handlers, instantiated once per entity type.  Each handler
//! obtains the driver for its entity from the `SchoolDriver` state via `FromRef`.

use crate::driver::SchoolDriver;
use crate::model::*;
use axum::Router;
use axum::extract::FromRef;
use campus_core::driver::entity::{Entity, EntityDriver};
use serde::Serialize;
use serde::de::DeserializeOwned;

mod entity_delete;
mod entity_get;
mod entity_post;
mod entity_put;
#[cfg(test)]
mod testutils;

impl FromRef<SchoolDriver> for EntityDriver<Student> {
    fn from_ref(driver: &SchoolDriver) -> Self {
        driver.students()
    }
}

impl FromRef<SchoolDriver> for EntityDriver<Teacher> {
    fn from_ref(driver: &SchoolDriver) -> Self {
        driver.teachers()
    }
}

impl FromRef<SchoolDriver> for EntityDriver<Classroom> {
    fn from_ref(driver: &SchoolDriver) -> Self {
        driver.classrooms()
    }
}

impl FromRef<SchoolDriver> for EntityDriver<SemesterCourse> {
    fn from_ref(driver: &SchoolDriver) -> Self {
        driver.semester_courses()
    }
}

impl FromRef<SchoolDriver> for EntityDriver<StudentSemesterCourse> {
    fn from_ref(driver: &SchoolDriver) -> Self {
        driver.student_semester_courses()
    }
}

/// Creates the routes for the entity `E`, which is created and modified via `collection` and
/// retrieved and deleted via `item`.
fn entity_routes<E>(collection: &str, item: &str) -> Router<SchoolDriver>
where
    E: Entity + DeserializeOwned + Serialize,
    E::Id: DeserializeOwned,
    EntityDriver<E>: FromRef<SchoolDriver>,
{
    use axum::routing::{get, post};
    Router::new()
        .route(collection, post(entity_post::handler::<E>).put(entity_put::handler::<E>))
        .route(item, get(entity_get::handler::<E>).delete(entity_delete::handler::<E>))
}

/// Creates the router for the application.
pub(crate) fn app(driver: SchoolDriver) -> Router {
    Router::new()
        .merge(entity_routes::<Student>("/api/students", "/api/students/:id"))
        .merge(entity_routes::<Teacher>("/api/teachers", "/api/teachers/:id"))
        .merge(entity_routes::<Classroom>("/api/classrooms", "/api/classrooms/:id"))
        .merge(entity_routes::<SemesterCourse>(
            "/api/semestercourses",
            "/api/semestercourses/:id",
        ))
        .merge(entity_routes::<StudentSemesterCourse>(
            "/api/studentsemestercourses",
            "/api/studentsemestercourses/:semester_course_id/:student_id",
        ))
        .with_state(driver)
}
