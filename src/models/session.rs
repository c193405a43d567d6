//! Scheduled-exam value types.
//!
//! [`TimeSlottedExam`] is the Phase-1 intermediate: a course pinned to a
//! start time, before any classroom is chosen. Phase 2 turns each one
//! into an [`ExamSession`] holding one [`ExamPartition`] per classroom,
//! which in turn seats students via [`StudentAssignment`].
//!
//! # Overlap semantics
//!
//! Padded windows touch inclusively: a window ending exactly `pad`
//! minutes before another's start still counts as overlapping. Both the
//! student-gap and room-turnover checks rely on this.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whether two time windows overlap once each is padded by `pad` minutes.
///
/// Touching counts: `a` ending exactly `pad` minutes before `b` starts
/// is still a conflict.
pub fn padded_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
    pad_minutes: i64,
) -> bool {
    let pad = Duration::minutes(pad_minutes);
    a_end + pad >= b_start && b_end + pad >= a_start
}

/// An exam pinned to a time slot, before classroom assignment.
///
/// Value type produced by Phase 1 and consumed by Phase 2; never mutated
/// after creation. `student_count` is a snapshot of the course enrollment
/// at scheduling time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlottedExam {
    /// Course index in the roster arena.
    pub course: usize,
    /// Exam start.
    pub start: NaiveDateTime,
    /// Exam end (`start + duration`).
    pub end: NaiveDateTime,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Enrolled student count when the slot was assigned.
    pub student_count: usize,
}

impl TimeSlottedExam {
    /// Creates a time-slotted exam; the end time is derived.
    pub fn new(
        course: usize,
        start: NaiveDateTime,
        duration_minutes: i64,
        student_count: usize,
    ) -> Self {
        Self {
            course,
            start,
            end: start + Duration::minutes(duration_minutes),
            duration_minutes,
            student_count,
        }
    }

    /// Calendar day of the exam.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Whether this exam's padded window overlaps the given window.
    pub fn overlaps_window(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        pad_minutes: i64,
    ) -> bool {
        padded_overlap(self.start, self.end, start, end, pad_minutes)
    }
}

/// A student's seat within one partition.
///
/// The seat number is informational only; it carries no constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAssignment {
    /// Assignment identifier, unique within one run.
    pub id: u32,
    /// Seat number within the partition, starting at 1.
    pub seat_number: u32,
    /// Student index in the roster arena.
    pub student: usize,
}

impl StudentAssignment {
    /// Creates a seat assignment.
    pub fn new(id: u32, seat_number: u32, student: usize) -> Self {
        Self {
            id,
            seat_number,
            student,
        }
    }
}

/// One classroom's share of an exam session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPartition {
    /// Partition identifier, unique within one run.
    pub id: u32,
    /// Seats of this partition claimed by the session.
    pub capacity_assigned: usize,
    /// Classroom index.
    pub classroom: usize,
    /// Students seated in this partition.
    pub assignments: Vec<StudentAssignment>,
}

impl ExamPartition {
    /// Creates a partition with no seated students yet.
    pub fn new(id: u32, capacity_assigned: usize, classroom: usize) -> Self {
        Self {
            id,
            capacity_assigned,
            classroom,
            assignments: Vec::new(),
        }
    }

    /// Seats a student in this partition.
    pub fn add_assignment(&mut self, assignment: StudentAssignment) {
        self.assignments.push(assignment);
    }
}

/// One scheduled occurrence of a course exam.
///
/// A session splits into one partition per classroom when enrollment
/// exceeds any single room's capacity. Partition capacities always sum
/// to the course's enrolled student count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    /// Session identifier, unique within one run.
    pub id: u32,
    /// Exam start.
    pub start: NaiveDateTime,
    /// Exam end.
    pub end: NaiveDateTime,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Course index in the roster arena.
    pub course: usize,
    /// Classroom partitions, in allocation order.
    pub partitions: Vec<ExamPartition>,
}

impl ExamSession {
    /// Creates a session with no partitions yet.
    pub fn new(id: u32, course: usize, start: NaiveDateTime, duration_minutes: i64) -> Self {
        Self {
            id,
            start,
            end: start + Duration::minutes(duration_minutes),
            duration_minutes,
            course,
            partitions: Vec::new(),
        }
    }

    /// Adds a classroom partition.
    pub fn add_partition(&mut self, partition: ExamPartition) {
        self.partitions.push(partition);
    }

    /// Calendar day of the session.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// `HH:MM-HH:MM` label for display.
    pub fn time_slot(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }

    /// Whether this session's padded window overlaps another's.
    pub fn overlaps(&self, other: &ExamSession, pad_minutes: i64) -> bool {
        padded_overlap(self.start, self.end, other.start, other.end, pad_minutes)
    }

    /// Sum of partition capacities.
    pub fn assigned_capacity(&self) -> usize {
        self.partitions.iter().map(|p| p.capacity_assigned).sum()
    }

    /// Whether any partition sits in the classroom at `classroom_idx`.
    pub fn uses_classroom(&self, classroom_idx: usize) -> bool {
        self.partitions.iter().any(|p| p.classroom == classroom_idx)
    }

    /// Whether the student at `student_idx` is seated in this session.
    pub fn seats_student(&self, student_idx: usize) -> bool {
        self.partitions
            .iter()
            .flat_map(|p| p.assignments.iter())
            .any(|a| a.student == student_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_padded_overlap_plain() {
        // 09:00-11:00 vs 10:00-12:00, no padding
        assert!(padded_overlap(at(9, 0), at(11, 0), at(10, 0), at(12, 0), 0));
        // Disjoint with a wide margin
        assert!(!padded_overlap(at(9, 0), at(10, 0), at(15, 0), at(16, 0), 0));
    }

    #[test]
    fn test_padded_overlap_touch_is_conflict() {
        // First ends 11:00, pad 30 → padded to 11:30; second starts 11:30.
        assert!(padded_overlap(at(9, 0), at(11, 0), at(11, 30), at(13, 30), 30));
        // One minute later clears the pad.
        assert!(!padded_overlap(at(9, 0), at(11, 0), at(11, 31), at(13, 31), 30));
    }

    #[test]
    fn test_padded_overlap_symmetric() {
        assert!(padded_overlap(at(11, 30), at(13, 30), at(9, 0), at(11, 0), 30));
        assert!(!padded_overlap(at(11, 31), at(13, 31), at(9, 0), at(11, 0), 30));
    }

    #[test]
    fn test_time_slotted_exam_end_derived() {
        let e = TimeSlottedExam::new(0, at(9, 0), 90, 25);
        assert_eq!(e.end, at(10, 30));
        assert_eq!(e.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(e.student_count, 25);
    }

    #[test]
    fn test_session_time_slot_label() {
        let s = ExamSession::new(1, 0, at(9, 0), 120);
        assert_eq!(s.time_slot(), "09:00-11:00");
    }

    #[test]
    fn test_session_overlap_with_turnover() {
        let a = ExamSession::new(1, 0, at(9, 0), 120);
        let b = ExamSession::new(2, 1, at(11, 15), 60);
        // 11:00 end + 15 min turnover reaches 11:15 → still a conflict.
        assert!(a.overlaps(&b, 15));
        let c = ExamSession::new(3, 2, at(11, 30), 60);
        assert!(!a.overlaps(&c, 15));
    }

    #[test]
    fn test_session_capacity_and_membership() {
        let mut s = ExamSession::new(1, 0, at(9, 0), 120);
        let mut p1 = ExamPartition::new(1, 2, 5);
        p1.add_assignment(StudentAssignment::new(1, 1, 10));
        p1.add_assignment(StudentAssignment::new(2, 2, 11));
        let p2 = ExamPartition::new(2, 1, 6);
        s.add_partition(p1);
        s.add_partition(p2);

        assert_eq!(s.assigned_capacity(), 3);
        assert!(s.uses_classroom(5));
        assert!(s.uses_classroom(6));
        assert!(!s.uses_classroom(7));
        assert!(s.seats_student(10));
        assert!(!s.seats_student(99));
    }

    #[test]
    fn test_session_serde_round_trip() {
        let s = ExamSession::new(1, 0, at(9, 0), 120);
        let json = serde_json::to_string(&s).unwrap();
        let back: ExamSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 1);
        assert_eq!(back.start, s.start);
        assert_eq!(back.time_slot(), "09:00-11:00");
    }
}
