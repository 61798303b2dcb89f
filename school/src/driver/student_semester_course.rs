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

//! Business rules for the enrollments of students in semester courses.

use crate::model::{SemesterCourse, Student, StudentSemesterCourse, StudentSemesterCourseId};
use campus_core::driver::entity::{Entity, Reference};
use campus_core::driver::validation::{ValidationResult, require_id};
use campus_core::model::Audit;

impl Entity for StudentSemesterCourse {
    type Id = StudentSemesterCourseId;
    const NAME: &'static str = "StudentSemesterCourse";

    fn id(&self) -> StudentSemesterCourseId {
        self.key()
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn validate_id(id: &StudentSemesterCourseId) -> ValidationResult {
        require_id("semesterCourseId", &id.semester_course_id)?;
        require_id("studentId", &id.student_id)
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new(SemesterCourse::NAME, self.semester_course_id),
            Reference::new(Student::NAME, self.student_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutils::{
        CREATED, test_semester_course, test_student, test_student_semester_course, test_user,
    };
    use crate::db::{create_student, create_student_semester_course};
    use crate::driver::testutils::*;
    use crate::model::StudentSemesterCourseStatus;
    use campus_core::clocks::testutils::SettableClock;
    use campus_core::db::DbError;
    use campus_core::driver::entity::EntityDriver;
    use campus_core::driver::testutils::*;
    use campus_core::driver::{DriverError, DriverOptions, ValidationError};
    use std::sync::Arc;
    use time::macros::datetime;
    use uuid::Uuid;

    /// State of a test that runs the driver against recorders instead of a database.
    struct RecorderContext {
        driver: EntityDriver<StudentSemesterCourse>,
        gateway: RecorderGateway<StudentSemesterCourse>,
        clock: Arc<SettableClock>,
        audit: RecorderAuditSink,
    }

    impl RecorderContext {
        fn setup() -> Self {
            let _can_fail = env_logger::builder().is_test(true).try_init();

            let gateway = RecorderGateway::default();
            let clock = Arc::new(SettableClock::new(NOW));
            let audit = RecorderAuditSink::default();
            let driver = EntityDriver::new(
                Arc::new(gateway.clone()),
                clock.clone(),
                Arc::new(audit.clone()),
                DriverOptions::default(),
            );
            Self { driver, gateway, clock, audit }
        }
    }

    /// Returns an enrollment as a client would send it for creation.
    fn new_enrollment(course: u128, student: u128) -> StudentSemesterCourse {
        let mut enrollment = test_student_semester_course(course, student);
        enrollment.audit = Audit::created_by(test_user());
        enrollment
    }

    #[tokio::test]
    async fn test_create_with_creation_fields_only() {
        let context = RecorderContext::setup();
        let course_ref = Reference::new("SemesterCourse", test_semester_course(1).id);
        let student_ref = Reference::new("Student", test_student(1).id);
        context.gateway.add_reference(course_ref).await;
        context.gateway.add_reference(student_ref).await;

        let user_a = Uuid::from_u128(0xaaaa);
        let time_t = datetime!(2023-09-20 09:30:00 UTC);
        let mut enrollment = new_enrollment(1, 1);
        enrollment.audit = Audit::new(user_a, time_t);
        let created = context.driver.clone().create(Some(enrollment.clone())).await.unwrap();

        let mut exp_enrollment = enrollment;
        exp_enrollment.audit = Audit::new(user_a, time_t).with_update(user_a, time_t);
        assert_eq!(exp_enrollment, created);
        assert_eq!(
            vec![
                GatewayCall::ReferenceExists(course_ref),
                GatewayCall::ReferenceExists(student_ref),
                GatewayCall::Insert(exp_enrollment),
            ],
            context.gateway.calls().await
        );
        assert_eq!(1, context.clock.reads());
        context.audit.expect_none().await;
    }

    #[tokio::test]
    async fn test_delete_lookup_storage_engine_fault() {
        let context = RecorderContext::setup();
        let fault = DbError::BackendError("disk I/O error".to_owned());
        context.gateway.inject_error(GatewayOp::SelectById, fault.clone()).await;

        let key = StudentSemesterCourseId::new(test_semester_course(1).id, test_student(1).id);
        let err = context.driver.clone().delete_by_id(key).await.unwrap_err();

        let exp_err = DriverError::Dependency { entity: "StudentSemesterCourse", cause: fault };
        assert_eq!(exp_err, err);
        assert_eq!(vec![GatewayCall::SelectById(key)], context.gateway.calls().await);
        assert_eq!(0, context.clock.reads());
        context.audit.expect_one_critical(&exp_err).await;
    }

    #[tokio::test]
    async fn test_delete_lookup_generic_persistence_fault() {
        let context = RecorderContext::setup();
        let fault = DbError::DataIntegrityError("malformed row".to_owned());
        context.gateway.inject_error(GatewayOp::SelectById, fault.clone()).await;

        let key = StudentSemesterCourseId::new(test_semester_course(1).id, test_student(1).id);
        let err = context.driver.clone().delete_by_id(key).await.unwrap_err();

        let exp_err = DriverError::Dependency { entity: "StudentSemesterCourse", cause: fault };
        assert_eq!(exp_err, err);
        assert_eq!(vec![GatewayCall::SelectById(key)], context.gateway.calls().await);
        assert_eq!(0, context.clock.reads());
        context.audit.expect_one_error(&exp_err).await;
    }

    #[tokio::test]
    async fn test_storage_engine_fault_on_every_operation() {
        let context = RecorderContext::setup();
        context.gateway.put(test_student_semester_course(1, 1)).await;
        context.gateway.inject_error(GatewayOp::ReferenceExists, DbError::Unavailable).await;
        context.gateway.inject_error(GatewayOp::SelectById, DbError::Unavailable).await;

        let exp_err = DriverError::Dependency {
            entity: "StudentSemesterCourse",
            cause: DbError::Unavailable,
        };
        let key = test_student_semester_course(1, 1).key();
        let mut modified = test_student_semester_course(1, 1);
        modified.audit = Audit::created_by(test_user()).with_updated_by(test_user());

        let driver = &context.driver;
        assert_eq!(exp_err, driver.clone().create(Some(new_enrollment(1, 2))).await.unwrap_err());
        assert_eq!(exp_err, driver.clone().retrieve_by_id(key).await.unwrap_err());
        assert_eq!(exp_err, driver.clone().modify(Some(modified)).await.unwrap_err());
        assert_eq!(exp_err, driver.clone().delete_by_id(key).await.unwrap_err());

        let records = context.audit.records.lock().await;
        assert_eq!(vec![AuditRecord::Critical(exp_err); 4], *records);
    }

    #[tokio::test]
    async fn test_create_ok_against_database() {
        let context = TestContext::setup().await;
        context.db().put_semester_course(1).await;
        create_student(&mut context.db().ex().await, &test_student(1)).await.unwrap();

        let enrollment =
            context.driver().student_semester_courses().create(Some(new_enrollment(1, 1))).await;
        let enrollment = enrollment.unwrap();
        assert_eq!(Audit::new(test_user(), NOW).with_update(test_user(), NOW), enrollment.audit);

        let retrieved = context
            .driver()
            .student_semester_courses()
            .retrieve_by_id(enrollment.key())
            .await
            .unwrap();
        assert_eq!(enrollment, retrieved);
    }

    #[tokio::test]
    async fn test_create_missing_student() {
        let context = TestContext::setup().await;
        context.db().put_semester_course(1).await;

        let err = context
            .driver()
            .student_semester_courses()
            .create(Some(new_enrollment(1, 1)))
            .await
            .unwrap_err();
        let exp_err = DriverError::Validation {
            entity: "StudentSemesterCourse",
            cause: ValidationError::NotFoundReference { entity: "Student", id: test_student(1).id },
        };
        assert_eq!(exp_err, err);
        context.audit().expect_one_error(&exp_err).await;
    }

    #[tokio::test]
    async fn test_create_already_exists() {
        let context = TestContext::setup().await;
        context.db().put_semester_course(1).await;
        let mut ex = context.db().ex().await;
        create_student(&mut ex, &test_student(1)).await.unwrap();
        create_student_semester_course(&mut ex, &test_student_semester_course(1, 1)).await.unwrap();

        let err = context
            .driver()
            .student_semester_courses()
            .create(Some(new_enrollment(1, 1)))
            .await
            .unwrap_err();
        let exp_err = DriverError::Validation {
            entity: "StudentSemesterCourse",
            cause: ValidationError::AlreadyExists(
                test_student_semester_course(1, 1).key().to_string(),
            ),
        };
        assert_eq!(exp_err, err);
        context.audit().expect_one_error(&exp_err).await;
    }

    #[tokio::test]
    async fn test_modify_grade() {
        let context = TestContext::setup().await;
        context.db().put_semester_course(1).await;
        let mut ex = context.db().ex().await;
        create_student(&mut ex, &test_student(1)).await.unwrap();
        create_student_semester_course(&mut ex, &test_student_semester_course(1, 1)).await.unwrap();

        let mut enrollment = test_student_semester_course(1, 1);
        enrollment.grade = Some(8);
        enrollment.status = StudentSemesterCourseStatus::Completed;
        enrollment.audit = Audit::new(test_user(), CREATED).with_updated_by(test_user());
        let enrollment =
            context.driver().student_semester_courses().modify(Some(enrollment)).await.unwrap();

        assert_eq!(Some(8), enrollment.grade);
        let exp_audit = Audit::new(test_user(), CREATED).with_update(test_user(), NOW);
        assert_eq!(exp_audit, enrollment.audit);
    }

    #[tokio::test]
    async fn test_retrieve_nil_student_id() {
        let context = TestContext::setup().await;

        let key = StudentSemesterCourseId::new(test_semester_course(1).id, Uuid::nil());
        match context.driver().student_semester_courses().retrieve_by_id(key).await {
            Err(DriverError::Validation {
                cause: ValidationError::InvalidField { field: "studentId", .. },
                ..
            }) => (),
            e => panic!("Unexpected result: {:?}", e),
        }
    }
}
