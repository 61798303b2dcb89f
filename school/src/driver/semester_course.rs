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

//! Business rules for semester courses.

use crate::model::{Classroom, SemesterCourse, Teacher};
use campus_core::driver::entity::{Entity, Reference};
use campus_core::driver::validation::{ValidationResult, invalid_field, require_id};
use campus_core::model::Audit;
use uuid::Uuid;

impl Entity for SemesterCourse {
    type Id = Uuid;
    const NAME: &'static str = "SemesterCourse";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn validate_id(id: &Uuid) -> ValidationResult {
        require_id("id", id)
    }

    fn validate_fields(&self) -> ValidationResult {
        if self.end_date <= self.start_date {
            return Err(invalid_field("endDate", "Date is not after startDate"));
        }
        require_id("classroomId", &self.classroom_id)?;
        require_id("teacherId", &self.teacher_id)
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new(Classroom::NAME, self.classroom_id),
            Reference::new(Teacher::NAME, self.teacher_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutils::{test_classroom, test_semester_course, test_teacher, test_user};
    use crate::db::{create_classroom, create_teacher, get_semester_course};
    use crate::driver::testutils::*;
    use campus_core::driver::{DriverError, ValidationError};

    /// Returns a semester course as a client would send it for creation.
    fn new_semester_course(n: u128) -> SemesterCourse {
        let mut course = test_semester_course(n);
        course.audit = Audit::created_by(test_user());
        course
    }

    #[tokio::test]
    async fn test_create_ok() {
        let context = TestContext::setup().await;
        let mut ex = context.db().ex().await;
        create_classroom(&mut ex, &test_classroom(1)).await.unwrap();
        create_teacher(&mut ex, &test_teacher(1)).await.unwrap();

        let course =
            context.driver().semester_courses().create(Some(new_semester_course(1))).await.unwrap();
        let stored = get_semester_course(&mut ex, &test_semester_course(1).id).await.unwrap();
        assert_eq!(Some(course), stored);
        context.audit().expect_none().await;
    }

    #[tokio::test]
    async fn test_create_missing_references_in_order() {
        let context = TestContext::setup().await;

        let exp_err = |entity, id| DriverError::Validation {
            entity: "SemesterCourse",
            cause: ValidationError::NotFoundReference { entity, id },
        };

        let driver = context.driver();
        let err = driver.semester_courses().create(Some(new_semester_course(1))).await.unwrap_err();
        assert_eq!(exp_err("Classroom", test_classroom(1).id), err);

        create_classroom(&mut context.db().ex().await, &test_classroom(1)).await.unwrap();
        let err = driver.semester_courses().create(Some(new_semester_course(1))).await.unwrap_err();
        assert_eq!(exp_err("Teacher", test_teacher(1).id), err);

        assert_eq!(2, context.audit().records.lock().await.len());
    }

    #[tokio::test]
    async fn test_create_inverted_dates() {
        let context = TestContext::setup().await;

        let mut course = new_semester_course(1);
        course.end_date = course.start_date;
        match context.driver().semester_courses().create(Some(course)).await {
            Err(DriverError::Validation {
                cause: ValidationError::InvalidField { field: "endDate", .. },
                ..
            }) => (),
            e => panic!("Unexpected result: {:?}", e),
        }
        assert_eq!(0, context.clock().reads());
    }

    #[tokio::test]
    async fn test_modify_to_missing_teacher() {
        let context = TestContext::setup().await;
        let stored = context.db().put_semester_course(1).await;

        let mut course = stored.clone();
        course.teacher_id = test_teacher(2).id;
        course.audit = Audit::created_by(test_user()).with_updated_by(test_user());
        let err = context.driver().semester_courses().modify(Some(course)).await.unwrap_err();
        let exp_err = DriverError::Validation {
            entity: "SemesterCourse",
            cause: ValidationError::NotFoundReference {
                entity: "Teacher",
                id: test_teacher(2).id,
            },
        };
        assert_eq!(exp_err, err);
        context.audit().expect_one_error(&exp_err).await;
        assert_eq!(
            Some(stored),
            get_semester_course(&mut context.db().ex().await, &test_semester_course(1).id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let context = TestContext::setup().await;
        let stored = context.db().put_semester_course(1).await;

        let deleted = context.driver().semester_courses().delete_by_id(stored.id).await.unwrap();
        assert_eq!(stored, deleted);

        let err = context.driver().semester_courses().retrieve_by_id(stored.id).await.unwrap_err();
        assert_eq!(
            DriverError::Validation {
                entity: "SemesterCourse",
                cause: ValidationError::NotFound(stored.id.to_string()),
            },
            err
        );
    }
}
