//! Course-ordering strategies for greedy scheduling.
//!
//! Before Phase 1 runs, the course list is ranked by a heuristic; the
//! scheduler trial-runs every strategy and keeps the one that places the
//! most courses. Strategies are pure: they rank without mutating input.
//!
//! # Score Convention
//! Lower scores = scheduled first. Descending heuristics (most
//! conflicts, largest enrollment, longest duration) negate their
//! measure.
//!
//! # Usage
//!
//! ```
//! use examplan::ordering::{sort_indices, strategies, OrderingContext};
//! use examplan::roster::Roster;
//!
//! let roster = Roster::default();
//! let ctx = OrderingContext::from_roster(&roster);
//! let order = sort_indices(&roster, &ctx, &strategies::ConflictDegree);
//! assert!(order.is_empty());
//! ```

mod context;
pub mod strategies;

pub use context::OrderingContext;

use crate::roster::Roster;
use std::fmt::Debug;

/// Score returned by an ordering strategy.
///
/// Lower scores = higher priority (scheduled first).
pub type StrategyScore = f64;

/// A heuristic that ranks courses for scheduling.
///
/// # Score Convention
/// **Lower score = scheduled first.** Strategies ordering by a
/// descending measure should return its negation.
pub trait OrderingStrategy: Send + Sync + Debug {
    /// Strategy name (e.g. "CONFLICT").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of the course at `course_idx`.
    ///
    /// Returns a score where lower = scheduled first.
    fn evaluate(&self, course_idx: usize, roster: &Roster, ctx: &OrderingContext)
        -> StrategyScore;

    /// Strategy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Returns course indices sorted by the strategy's scores.
///
/// The sort is stable: courses with equal scores keep their input order.
pub fn sort_indices(
    roster: &Roster,
    ctx: &OrderingContext,
    strategy: &dyn OrderingStrategy,
) -> Vec<usize> {
    let scores: Vec<StrategyScore> = (0..roster.course_count())
        .map(|idx| strategy.evaluate(idx, roster, ctx))
        .collect();

    let mut indices: Vec<usize> = (0..roster.course_count()).collect();
    indices.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Enrollment, Student};

    #[test]
    fn test_sort_indices_is_stable_on_ties() {
        // Three courses with identical enrollments → all scores tie.
        let mut roster = Roster::new(
            vec![Student::new(1, "S1")],
            vec![
                Course::new(1, "A"),
                Course::new(2, "B"),
                Course::new(3, "C"),
            ],
        );
        roster.apply_enrollments(&[
            Enrollment::new("A", vec![1]),
            Enrollment::new("B", vec![1]),
            Enrollment::new("C", vec![1]),
        ]);
        let ctx = OrderingContext::from_roster(&roster);

        let order = sort_indices(&roster, &ctx, &strategies::EnrollmentSize);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_indices_empty_roster() {
        let roster = Roster::default();
        let ctx = OrderingContext::from_roster(&roster);
        assert!(sort_indices(&roster, &ctx, &strategies::ExamDuration).is_empty());
    }
}
