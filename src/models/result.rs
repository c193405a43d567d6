//! Scheduling outcome.
//!
//! [`ScheduleResult`] is the single value handed back to callers: the
//! finished date→session schedule, the courses that could not be placed,
//! and a machine-readable [`SchedulingFailureReason`] per unplaced
//! course. It owns the roster and classroom arenas so presentation code
//! can resolve indices back to names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::roster::Roster;

use super::{Classroom, ExamSession};

/// Why a course could not be scheduled.
///
/// Expected, recoverable outcomes rather than errors. Each kind
/// carries a user-facing message and a remediation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingFailureReason {
    /// Students in the course conflict with already-placed exams.
    StudentConflict,
    /// Placing the exam would push a student past the daily cap.
    MaxExamsPerDayExceeded,
    /// Available classroom capacity never covered the enrollment.
    ClassroomCapacityInsufficient,
    /// No candidate slot was ever tried.
    NoAvailableSlots,
}

impl SchedulingFailureReason {
    /// Short user-facing description.
    pub fn display_message(&self) -> &'static str {
        match self {
            Self::StudentConflict => "Student scheduling conflicts",
            Self::MaxExamsPerDayExceeded => "Daily exam limit reached",
            Self::ClassroomCapacityInsufficient => "Not enough classroom capacity",
            Self::NoAvailableSlots => "No available time slots",
        }
    }

    /// Actionable remediation hint.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::StudentConflict => {
                "Students in this course have too many overlapping exams. Try extending the date range"
            }
            Self::MaxExamsPerDayExceeded => {
                "Increase the maximum exams per student per day or extend the date range"
            }
            Self::ClassroomCapacityInsufficient => {
                "Add more classrooms or extend the date range to spread exams across more days"
            }
            Self::NoAvailableSlots => "Extend the date range to provide more scheduling options",
        }
    }
}

/// The finished schedule plus everything that did not fit.
///
/// Sessions are grouped by calendar day and ordered by start time within
/// each day. Course, student, and classroom indices resolve against the
/// owned [`Roster`] and classroom list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Student/course arena the indices below point into.
    pub roster: Roster,
    /// Classroom arena.
    pub classrooms: Vec<Classroom>,
    /// Scheduled sessions per day, ordered by start time.
    pub schedule: BTreeMap<NaiveDate, Vec<ExamSession>>,
    /// Courses that could not be placed, ascending by index.
    pub unscheduled_courses: Vec<usize>,
    /// Failure reason per unscheduled course.
    pub failure_reasons: BTreeMap<usize, SchedulingFailureReason>,
}

impl ScheduleResult {
    /// Total number of scheduled sessions.
    pub fn session_count(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }

    /// Whether every course received a session.
    pub fn is_fully_scheduled(&self) -> bool {
        self.unscheduled_courses.is_empty()
    }

    /// Iterates all sessions across all days in date order.
    pub fn sessions(&self) -> impl Iterator<Item = &ExamSession> {
        self.schedule.values().flat_map(|day| day.iter())
    }

    /// All sessions of the course at `course_idx`.
    pub fn sessions_for_course(&self, course_idx: usize) -> Vec<&ExamSession> {
        self.sessions().filter(|s| s.course == course_idx).collect()
    }

    /// All sessions seating the student at `student_idx`.
    pub fn sessions_for_student(&self, student_idx: usize) -> Vec<&ExamSession> {
        self.sessions()
            .filter(|s| s.seats_student(student_idx))
            .collect()
    }

    /// All sessions using the classroom at `classroom_idx`.
    pub fn sessions_for_classroom(&self, classroom_idx: usize) -> Vec<&ExamSession> {
        self.sessions()
            .filter(|s| s.uses_classroom(classroom_idx))
            .collect()
    }

    /// Failure reason for a course, if it went unscheduled.
    pub fn failure_reason(&self, course_idx: usize) -> Option<SchedulingFailureReason> {
        self.failure_reasons.get(&course_idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, ExamPartition, Student, StudentAssignment};
    use chrono::NaiveDateTime;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_result() -> ScheduleResult {
        let roster = Roster::new(
            vec![Student::new(1, "S1"), Student::new(2, "S2")],
            vec![Course::new(1, "A"), Course::new(2, "B"), Course::new(3, "C")],
        );
        let classrooms = vec![Classroom::new(1, "R1", 50), Classroom::new(2, "R2", 30)];

        let mut s1 = ExamSession::new(1, 0, at(2, 9), 120);
        let mut p = ExamPartition::new(1, 1, 0);
        p.add_assignment(StudentAssignment::new(1, 1, 0));
        s1.add_partition(p);

        let mut s2 = ExamSession::new(2, 1, at(3, 9), 120);
        let mut p2 = ExamPartition::new(2, 1, 1);
        p2.add_assignment(StudentAssignment::new(2, 1, 1));
        s2.add_partition(p2);

        let mut schedule = BTreeMap::new();
        schedule.insert(at(2, 9).date(), vec![s1]);
        schedule.insert(at(3, 9).date(), vec![s2]);

        let mut failure_reasons = BTreeMap::new();
        failure_reasons.insert(2, SchedulingFailureReason::ClassroomCapacityInsufficient);

        ScheduleResult {
            roster,
            classrooms,
            schedule,
            unscheduled_courses: vec![2],
            failure_reasons,
        }
    }

    #[test]
    fn test_session_count_and_completeness() {
        let r = sample_result();
        assert_eq!(r.session_count(), 2);
        assert!(!r.is_fully_scheduled());
    }

    #[test]
    fn test_filter_accessors() {
        let r = sample_result();
        assert_eq!(r.sessions_for_course(0).len(), 1);
        assert_eq!(r.sessions_for_course(2).len(), 0);
        assert_eq!(r.sessions_for_student(1).len(), 1);
        assert_eq!(r.sessions_for_classroom(0).len(), 1);
        assert_eq!(r.sessions_for_classroom(1).len(), 1);
    }

    #[test]
    fn test_failure_reason_lookup() {
        let r = sample_result();
        assert_eq!(
            r.failure_reason(2),
            Some(SchedulingFailureReason::ClassroomCapacityInsufficient)
        );
        assert_eq!(r.failure_reason(0), None);
    }

    #[test]
    fn test_reason_texts_are_actionable() {
        for reason in [
            SchedulingFailureReason::StudentConflict,
            SchedulingFailureReason::MaxExamsPerDayExceeded,
            SchedulingFailureReason::ClassroomCapacityInsufficient,
            SchedulingFailureReason::NoAvailableSlots,
        ] {
            assert!(!reason.display_message().is_empty());
            assert!(!reason.suggestion().is_empty());
        }
    }
}
