//! Built-in ordering strategies.
//!
//! All three rank descending: the hardest-to-place courses go first so
//! they get first access to slots, in the spirit of
//! most-constrained-variable-first search.
//!
//! The scheduler trials them in the order conflict degree, enrollment
//! size, exam duration, and keeps whichever places the most courses.

use super::{OrderingContext, OrderingStrategy, StrategyScore};
use crate::roster::Roster;

/// Most-conflicted courses first.
///
/// A course's conflict degree is the number of other courses sharing at
/// least one enrolled student. High-degree courses have the fewest
/// compatible slots, so they are placed while the timetable is empty.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDegree;

impl OrderingStrategy for ConflictDegree {
    fn name(&self) -> &'static str {
        "CONFLICT"
    }

    fn evaluate(
        &self,
        course_idx: usize,
        _roster: &Roster,
        ctx: &OrderingContext,
    ) -> StrategyScore {
        -(ctx.conflict_degree[course_idx] as f64)
    }

    fn description(&self) -> &'static str {
        "Most conflicting courses first"
    }
}

/// Largest classes first.
///
/// Big courses consume the most classroom capacity and are the hardest
/// to fit once rooms fill up.
#[derive(Debug, Clone, Copy)]
pub struct EnrollmentSize;

impl OrderingStrategy for EnrollmentSize {
    fn name(&self) -> &'static str {
        "ENROLLMENT"
    }

    fn evaluate(
        &self,
        course_idx: usize,
        roster: &Roster,
        _ctx: &OrderingContext,
    ) -> StrategyScore {
        -(roster.courses[course_idx].student_count() as f64)
    }

    fn description(&self) -> &'static str {
        "Largest enrollment first"
    }
}

/// Longest exams first.
///
/// A long exam has fewer valid start offsets inside the day window, so
/// it should claim its slot early.
#[derive(Debug, Clone, Copy)]
pub struct ExamDuration;

impl OrderingStrategy for ExamDuration {
    fn name(&self) -> &'static str {
        "DURATION"
    }

    fn evaluate(
        &self,
        course_idx: usize,
        roster: &Roster,
        _ctx: &OrderingContext,
    ) -> StrategyScore {
        -(roster.courses[course_idx].duration_minutes as f64)
    }

    fn description(&self) -> &'static str {
        "Longest exam duration first"
    }
}
