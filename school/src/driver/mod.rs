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

//! Business logic for the service.
//!
//! The generic `EntityDriver` from the core crate runs the create, read, update and delete
//! pipelines.  This module only teaches it about the entities of this service: which fields are
//! required and which other entities must exist for a record to be valid.

use crate::db::DbGateway;
use crate::model::*;
use campus_core::clocks::Clock;
use campus_core::db::Db;
use campus_core::driver::DriverOptions;
use campus_core::driver::audit::AuditSink;
use campus_core::driver::entity::EntityDriver;
use std::sync::Arc;

mod classroom;
mod semester_course;
mod student;
mod student_semester_course;
mod teacher;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic for all the entities of the service.
///
/// All drivers share the same gateway, clock and audit sink.  Each accessor returns a fresh
/// clone of the driver for one entity type, ready to run a single operation.
#[derive(Clone)]
pub struct SchoolDriver {
    /// Driver for students.
    students: EntityDriver<Student>,

    /// Driver for teachers.
    teachers: EntityDriver<Teacher>,

    /// Driver for classrooms.
    classrooms: EntityDriver<Classroom>,

    /// Driver for semester courses.
    semester_courses: EntityDriver<SemesterCourse>,

    /// Driver for the enrollments of students in semester courses.
    student_semester_courses: EntityDriver<StudentSemesterCourse>,
}

impl SchoolDriver {
    /// Creates a new driver backed by the given injected components.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        audit: Arc<dyn AuditSink + Send + Sync>,
        opts: DriverOptions,
    ) -> Self {
        let gateway = Arc::new(DbGateway::new(db));
        Self {
            students: EntityDriver::new(
                gateway.clone(),
                clock.clone(),
                audit.clone(),
                opts.clone(),
            ),
            teachers: EntityDriver::new(
                gateway.clone(),
                clock.clone(),
                audit.clone(),
                opts.clone(),
            ),
            classrooms: EntityDriver::new(
                gateway.clone(),
                clock.clone(),
                audit.clone(),
                opts.clone(),
            ),
            semester_courses: EntityDriver::new(
                gateway.clone(),
                clock.clone(),
                audit.clone(),
                opts.clone(),
            ),
            student_semester_courses: EntityDriver::new(gateway, clock, audit, opts),
        }
    }

    /// Returns the driver for students.
    pub fn students(&self) -> EntityDriver<Student> {
        self.students.clone()
    }

    /// Returns the driver for teachers.
    pub fn teachers(&self) -> EntityDriver<Teacher> {
        self.teachers.clone()
    }

    /// Returns the driver for classrooms.
    pub fn classrooms(&self) -> EntityDriver<Classroom> {
        self.classrooms.clone()
    }

    /// Returns the driver for semester courses.
    pub fn semester_courses(&self) -> EntityDriver<SemesterCourse> {
        self.semester_courses.clone()
    }

    /// Returns the driver for the enrollments of students in semester courses.
    pub fn student_semester_courses(&self) -> EntityDriver<StudentSemesterCourse> {
        self.student_semester_courses.clone()
    }
}
