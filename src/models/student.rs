//! Student model.
//!
//! Students are stored in the roster arena and addressed by index.
//! Enrollment is a set of course indices; the matching back-reference
//! lives on [`Course`](super::Course). Both sides are maintained by the
//! roster when enrollments are applied.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A student who sits exams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// External identifier from the imported records.
    pub id: u32,
    /// Display name (typically the student number).
    pub name: String,
    /// Indices of enrolled courses in the roster arena.
    pub enrolled: BTreeSet<usize>,
}

impl Student {
    /// Creates a student with no enrollments.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enrolled: BTreeSet::new(),
        }
    }

    /// Number of courses this student is enrolled in.
    #[inline]
    pub fn course_count(&self) -> usize {
        self.enrolled.len()
    }

    /// Whether this student is enrolled in the course at `course_idx`.
    #[inline]
    pub fn is_enrolled_in(&self, course_idx: usize) -> bool {
        self.enrolled.contains(&course_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_new() {
        let s = Student::new(7, "2021-0007");
        assert_eq!(s.id, 7);
        assert_eq!(s.name, "2021-0007");
        assert_eq!(s.course_count(), 0);
        assert!(!s.is_enrolled_in(0));
    }

    #[test]
    fn test_enrollment_set_is_deduplicated() {
        let mut s = Student::new(1, "S1");
        s.enrolled.insert(3);
        s.enrolled.insert(3);
        s.enrolled.insert(1);
        assert_eq!(s.course_count(), 2);
        assert!(s.is_enrolled_in(3));
    }
}
