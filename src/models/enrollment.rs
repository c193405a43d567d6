//! Enrollment input record.
//!
//! Enrollments arrive from the import layer as a course name plus the
//! external ids of the students taking it. The roster consumes them once
//! when building the membership graph; the engine does not retain them.

use serde::{Deserialize, Serialize};

/// One imported enrollment row: a course and its students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Name of the enrolled course.
    pub course_name: String,
    /// External student ids enrolled in the course.
    pub student_ids: Vec<u32>,
}

impl Enrollment {
    /// Creates an enrollment record.
    pub fn new(course_name: impl Into<String>, student_ids: Vec<u32>) -> Self {
        Self {
            course_name: course_name.into(),
            student_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_new() {
        let e = Enrollment::new("PHYS101", vec![3, 1, 4]);
        assert_eq!(e.course_name, "PHYS101");
        assert_eq!(e.student_ids, vec![3, 1, 4]);
    }
}
