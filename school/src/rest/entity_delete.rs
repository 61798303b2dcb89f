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

//! API to delete an entity by its key.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use campus_core::driver::entity::{Entity, EntityDriver};
use campus_core::rest::{EmptyBody, RestError};
use serde::Serialize;

/// API handler.
///
/// Responds with the last stored copy of the deleted entity.
pub(crate) async fn handler<E>(
    State(driver): State<EntityDriver<E>>,
    Path(id): Path<E::Id>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError>
where
    E: Entity + Serialize,
{
    let entity = driver.delete_by_id(id).await?;
    Ok(Json(entity))
}

#[cfg(test)]
mod tests {
    use crate::db::testutils::{test_semester_course, test_student, test_student_semester_course};
    use crate::db::{
        create_student, create_student_semester_course, get_student_semester_course,
    };
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use campus_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/semestercourses/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let course = context.db().put_semester_course(1).await;

        let response = OneShotBuilder::new(context.app(), route(&course.id.to_string()))
            .send_empty()
            .await
            .expect_json::<SemesterCourse>()
            .await;
        assert_eq!(course, response);

        OneShotBuilder::new(context.app(), (http::Method::GET, route(&course.id.to_string()).1))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(&test_semester_course(1).id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("SemesterCourse validation error.*not found")
            .await;
    }

    #[tokio::test]
    async fn test_still_referenced() {
        let context = TestContext::setup().await;
        let course = context.db().put_semester_course(1).await;
        let mut ex = context.db().ex().await;
        create_student(&mut ex, &test_student(1)).await.unwrap();
        create_student_semester_course(&mut ex, &test_student_semester_course(1, 1))
            .await
            .unwrap();

        OneShotBuilder::new(context.app(), route(&course.id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("still referenced")
            .await;
    }

    #[tokio::test]
    async fn test_composite_key() {
        let context = TestContext::setup().await;
        context.db().put_semester_course(1).await;
        let mut ex = context.db().ex().await;
        create_student(&mut ex, &test_student(1)).await.unwrap();
        let enrollment = test_student_semester_course(1, 1);
        create_student_semester_course(&mut ex, &enrollment).await.unwrap();

        let uri = format!("/api/studentsemestercourses/{}", enrollment.key());
        let response = OneShotBuilder::new(context.app(), (http::Method::DELETE, uri))
            .send_empty()
            .await
            .expect_json::<StudentSemesterCourse>()
            .await;
        assert_eq!(enrollment, response);
        assert_eq!(None, get_student_semester_course(&mut ex, &enrollment.key()).await.unwrap());
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(&test_semester_course(1).id.to_string())
    );
}
