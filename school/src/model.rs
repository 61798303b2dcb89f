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

//! High-level data types that represent the school domain.

/// Defines a closed enumeration that is exchanged as a string, both in JSON and in the database.
macro_rules! string_enum {
    ( $(#[$meta:meta])* $name:ident { $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)? } ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Returns the textual representation of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = campus_core::model::ModelError;

            fn from_str(s: &str) -> campus_core::model::ModelResult<Self> {
                match s {
                    $( stringify!($variant) => Ok($name::$variant), )+
                    _ => Err(campus_core::model::ModelError(format!(
                        "Invalid {} value '{}'",
                        stringify!($name),
                        s
                    ))),
                }
            }
        }
    };
}
pub(crate) use string_enum;

mod classroom;
pub use classroom::{Classroom, ClassroomStatus};
mod semester_course;
pub use semester_course::{SemesterCourse, SemesterCourseStatus};
mod student;
pub use student::Student;
mod student_semester_course;
pub use student_semester_course::{
    StudentSemesterCourse, StudentSemesterCourseId, StudentSemesterCourseStatus,
};
mod teacher;
pub use teacher::{Teacher, TeacherStatus};

string_enum! {
    /// Gender of a person.
    Gender {
        /// Male.
        Male,

        /// Female.
        Female,

        /// Any other gender.
        Other,
    }
}
