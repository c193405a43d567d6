//! Course model.
//!
//! A course owns its exam duration and the set of enrolled students
//! (as roster indices). The duration starts at the crate default and
//! may be overridden per course name via
//! [`ExamConfig::course_durations`](super::ExamConfig).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Exam duration applied when no per-course override exists (minutes).
pub const DEFAULT_DURATION_MINUTES: i64 = 120;

/// A course whose exam needs a time slot and classrooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// External identifier from the imported records.
    pub id: u32,
    /// Course name; enrollments and duration overrides resolve by name.
    pub name: String,
    /// Exam duration in minutes.
    pub duration_minutes: i64,
    /// Indices of enrolled students in the roster arena.
    pub students: BTreeSet<usize>,
}

impl Course {
    /// Creates a course with the default exam duration and no students.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            students: BTreeSet::new(),
        }
    }

    /// Sets the exam duration.
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Number of enrolled students.
    #[inline]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Whether any student is enrolled in both this course and `other`.
    pub fn shares_students_with(&self, other: &Course) -> bool {
        self.students.intersection(&other.students).next().is_some()
    }
}
