//! Scheduling configuration.
//!
//! One immutable-per-run bundle of constraint knobs. Durations are
//! minutes; the exam day is bounded by whole start/end hours.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Constraint configuration for one scheduling run.
///
/// `course_durations` maps course names to duration overrides; courses
/// without an entry keep their current duration. The map is only ever
/// used for keyed lookup, never iterated, so scheduling stays
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Maximum exams any student may sit on one calendar day.
    pub max_exams_per_day: u32,
    /// Buffer required between two occupancies of the same room (minutes).
    pub room_turnover_minutes: i64,
    /// Minimum gap between two exams of the same student (minutes).
    pub student_gap_minutes: i64,
    /// Hour of day at which exams may start (0..=23).
    pub exam_start_hour: u32,
    /// Hour of day by which exams must end (1..=24).
    pub exam_end_hour: u32,
    /// Per-course-name duration overrides (minutes).
    pub course_durations: HashMap<String, i64>,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            max_exams_per_day: 2,
            room_turnover_minutes: 15,
            student_gap_minutes: 90,
            exam_start_hour: 9,
            exam_end_hour: 21,
            course_durations: HashMap::new(),
        }
    }
}

impl ExamConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the daily exam cap per student.
    pub fn with_max_exams_per_day(mut self, max: u32) -> Self {
        self.max_exams_per_day = max;
        self
    }

    /// Sets the room turnover buffer (minutes).
    pub fn with_room_turnover(mut self, minutes: i64) -> Self {
        self.room_turnover_minutes = minutes;
        self
    }

    /// Sets the minimum gap between a student's exams (minutes).
    pub fn with_student_gap(mut self, minutes: i64) -> Self {
        self.student_gap_minutes = minutes;
        self
    }

    /// Sets the exam day hour bounds.
    pub fn with_day_hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.exam_start_hour = start_hour;
        self.exam_end_hour = end_hour;
        self
    }

    /// Adds a duration override for a course name (minutes).
    pub fn with_course_duration(mut self, course: impl Into<String>, minutes: i64) -> Self {
        self.course_durations.insert(course.into(), minutes);
        self
    }

    /// Earliest exam start on `date`.
    pub fn day_start(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.exam_start_hour))
    }

    /// Latest exam end on `date`.
    pub fn day_end(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.exam_end_hour))
    }
}
