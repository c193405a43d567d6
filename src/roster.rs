//! Student/course membership arena.
//!
//! The roster owns all students and courses for one scheduling run and
//! maintains the bidirectional membership between them as index sets,
//! so the graph carries no object cycles. It is built once per run:
//! enrollments are applied first, then per-course duration overrides.
//! No other component mutates students or courses afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::models::{Course, Enrollment, ExamConfig, Student};

/// Arena of students and courses with bidirectional membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// All students, addressed by index.
    pub students: Vec<Student>,
    /// All courses, addressed by index.
    pub courses: Vec<Course>,
}

impl Roster {
    /// Creates a roster over the given students and courses.
    ///
    /// Any membership already present on the inputs is kept; enrollments
    /// are applied on top via [`apply_enrollments`](Self::apply_enrollments).
    pub fn new(students: Vec<Student>, courses: Vec<Course>) -> Self {
        Self { students, courses }
    }

    /// Number of students.
    #[inline]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Number of courses.
    #[inline]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Resolves enrollment records into the membership graph.
    ///
    /// Each record's course is resolved by name and its students by
    /// external id; every match links both sides. References to unknown
    /// courses or students are skipped: a data-quality issue in the
    /// import, not a scheduling failure.
    pub fn apply_enrollments(&mut self, enrollments: &[Enrollment]) {
        let course_by_name: HashMap<&str, usize> = self
            .courses
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.as_str(), idx))
            .collect();
        let student_by_id: HashMap<u32, usize> = self
            .students
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id, idx))
            .collect();

        let mut links = Vec::new();
        for enrollment in enrollments {
            let Some(&course_idx) = course_by_name.get(enrollment.course_name.as_str()) else {
                warn!(course = %enrollment.course_name, "enrollment references unknown course, skipped");
                continue;
            };

            for &student_id in &enrollment.student_ids {
                let Some(&student_idx) = student_by_id.get(&student_id) else {
                    warn!(
                        course = %enrollment.course_name,
                        student = student_id,
                        "enrollment references unknown student, skipped"
                    );
                    continue;
                };
                links.push((student_idx, course_idx));
            }
        }

        for (student_idx, course_idx) in links {
            self.link(student_idx, course_idx);
        }
    }

    /// Applies per-course duration overrides from the configuration.
    ///
    /// Courses without an override keep their current duration.
    pub fn apply_durations(&mut self, config: &ExamConfig) {
        for course in &mut self.courses {
            if let Some(&minutes) = config.course_durations.get(&course.name) {
                course.duration_minutes = minutes;
            }
        }
    }

    /// Links a student and a course in both directions.
    fn link(&mut self, student_idx: usize, course_idx: usize) {
        self.students[student_idx].enrolled.insert(course_idx);
        self.courses[course_idx].students.insert(student_idx);
    }

    /// Number of other courses sharing at least one student with
    /// `course_idx`.
    pub fn conflict_degree(&self, course_idx: usize) -> usize {
        let course = &self.courses[course_idx];
        self.courses
            .iter()
            .enumerate()
            .filter(|(other_idx, other)| {
                *other_idx != course_idx && course.shares_students_with(other)
            })
            .count()
    }
}
