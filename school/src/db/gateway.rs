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

//! Persistence gateway that exposes the functions of this module to the entity drivers.

use crate::db::*;
use crate::model::*;
use async_trait::async_trait;
use campus_core::db::{Db, DbError, DbResult};
use campus_core::driver::entity::{Entity, EntityGateway, Reference};
use std::sync::Arc;
use uuid::Uuid;

/// Persistence gateway backed by a `Db`.
///
/// Every call obtains its own executor from the database, so the gateway can be shared by all
/// the entity drivers of the service.
#[derive(Clone)]
pub struct DbGateway {
    /// The database that the gateway uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl DbGateway {
    /// Creates a new gateway backed by `db`.
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }

    /// Checks whether the entity pointed to by `reference` exists, dispatching on the name of its
    /// type.
    async fn exists(&self, reference: &Reference) -> DbResult<bool> {
        let mut ex = self.db.ex().await?;
        let id: &Uuid = &reference.id;
        match reference.entity {
            n if n == Classroom::NAME => classroom_exists(&mut ex, id).await,
            n if n == SemesterCourse::NAME => semester_course_exists(&mut ex, id).await,
            n if n == Student::NAME => student_exists(&mut ex, id).await,
            n if n == Teacher::NAME => teacher_exists(&mut ex, id).await,
            n => Err(DbError::Unexpected(format!("Cannot look up references to {}", n))),
        }
    }
}

#[async_trait]
impl EntityGateway<Student> for DbGateway {
    async fn insert(&self, entity: Student) -> DbResult<Student> {
        create_student(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn select_by_id(&self, id: &Uuid) -> DbResult<Option<Student>> {
        get_student(&mut self.db.ex().await?, id).await
    }

    async fn update(&self, entity: Student) -> DbResult<Student> {
        update_student(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: Student) -> DbResult<Student> {
        delete_student(&mut self.db.ex().await?, &entity.id).await?;
        Ok(entity)
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.exists(reference).await
    }
}

#[async_trait]
impl EntityGateway<Teacher> for DbGateway {
    async fn insert(&self, entity: Teacher) -> DbResult<Teacher> {
        create_teacher(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn select_by_id(&self, id: &Uuid) -> DbResult<Option<Teacher>> {
        get_teacher(&mut self.db.ex().await?, id).await
    }

    async fn update(&self, entity: Teacher) -> DbResult<Teacher> {
        update_teacher(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: Teacher) -> DbResult<Teacher> {
        delete_teacher(&mut self.db.ex().await?, &entity.id).await?;
        Ok(entity)
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.exists(reference).await
    }
}

#[async_trait]
impl EntityGateway<Classroom> for DbGateway {
    async fn insert(&self, entity: Classroom) -> DbResult<Classroom> {
        create_classroom(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn select_by_id(&self, id: &Uuid) -> DbResult<Option<Classroom>> {
        get_classroom(&mut self.db.ex().await?, id).await
    }

    async fn update(&self, entity: Classroom) -> DbResult<Classroom> {
        update_classroom(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: Classroom) -> DbResult<Classroom> {
        delete_classroom(&mut self.db.ex().await?, &entity.id).await?;
        Ok(entity)
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.exists(reference).await
    }
}

#[async_trait]
impl EntityGateway<SemesterCourse> for DbGateway {
    async fn insert(&self, entity: SemesterCourse) -> DbResult<SemesterCourse> {
        create_semester_course(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn select_by_id(&self, id: &Uuid) -> DbResult<Option<SemesterCourse>> {
        get_semester_course(&mut self.db.ex().await?, id).await
    }

    async fn update(&self, entity: SemesterCourse) -> DbResult<SemesterCourse> {
        update_semester_course(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: SemesterCourse) -> DbResult<SemesterCourse> {
        delete_semester_course(&mut self.db.ex().await?, &entity.id).await?;
        Ok(entity)
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.exists(reference).await
    }
}

#[async_trait]
impl EntityGateway<StudentSemesterCourse> for DbGateway {
    async fn insert(&self, entity: StudentSemesterCourse) -> DbResult<StudentSemesterCourse> {
        create_student_semester_course(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn select_by_id(
        &self,
        id: &StudentSemesterCourseId,
    ) -> DbResult<Option<StudentSemesterCourse>> {
        get_student_semester_course(&mut self.db.ex().await?, id).await
    }

    async fn update(&self, entity: StudentSemesterCourse) -> DbResult<StudentSemesterCourse> {
        update_student_semester_course(&mut self.db.ex().await?, &entity).await?;
        Ok(entity)
    }

    async fn delete(&self, entity: StudentSemesterCourse) -> DbResult<StudentSemesterCourse> {
        delete_student_semester_course(&mut self.db.ex().await?, &entity.key()).await?;
        Ok(entity)
    }

    async fn reference_exists(&self, reference: &Reference) -> DbResult<bool> {
        self.exists(reference).await
    }
}
