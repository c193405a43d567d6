//! Two-phase greedy exam scheduler.
//!
//! One call to [`ExamScheduler::schedule`] runs the whole pipeline:
//!
//! 1. Build the roster: apply enrollments, then duration overrides.
//! 2. Trial-run every ordering strategy through Phase 1 alone and score
//!    it by how many courses received a time slot.
//! 3. Re-run Phase 1 with the best strategy (ties go to the earlier
//!    strategy in trial order), then materialize classrooms and seats
//!    in Phase 2.
//! 4. Package the date→session schedule, the unscheduled courses, and
//!    their failure reasons into a [`ScheduleResult`].
//!
//! The engine is synchronous and deterministic: identical inputs and
//! configuration always produce an identical schedule, which is what
//! makes the trial scoring sound.

mod phase1;
mod phase2;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{
    Classroom, Course, Enrollment, ExamConfig, ExamSession, ScheduleResult,
    SchedulingFailureReason, Student,
};
use crate::ordering::{sort_indices, strategies, OrderingContext, OrderingStrategy};
use crate::roster::Roster;

/// Greedy two-phase exam scheduler.
///
/// Holds the ordering strategies to trial, in trial order. The default
/// set is conflict degree, then enrollment size, then exam duration.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use examplan::models::{Classroom, Course, Enrollment, ExamConfig, Student};
/// use examplan::scheduler::ExamScheduler;
///
/// let students = vec![Student::new(1, "S1"), Student::new(2, "S2")];
/// let courses = vec![Course::new(1, "MATH101")];
/// let classrooms = vec![Classroom::new(1, "A101", 40)];
/// let enrollments = vec![Enrollment::new("MATH101", vec![1, 2])];
///
/// let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let result = ExamScheduler::new().schedule(
///     students, courses, classrooms, &enrollments,
///     &ExamConfig::new(), day, day,
/// );
/// assert!(result.is_fully_scheduled());
/// assert_eq!(result.session_count(), 1);
/// ```
#[derive(Debug)]
pub struct ExamScheduler {
    strategies: Vec<Box<dyn OrderingStrategy>>,
}

impl ExamScheduler {
    /// Creates a scheduler with the default strategy set.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(strategies::ConflictDegree),
                Box::new(strategies::EnrollmentSize),
                Box::new(strategies::ExamDuration),
            ],
        }
    }

    /// Creates a scheduler trialing the given strategies, in order.
    ///
    /// With an empty list, courses are scheduled in input order.
    pub fn with_strategies(strategies: Vec<Box<dyn OrderingStrategy>>) -> Self {
        Self { strategies }
    }

    /// Runs one full scheduling pass over the inclusive date range.
    ///
    /// An end date before the start date yields an immediate result with
    /// every course unscheduled as `NoAvailableSlots`; Phase 1 is never
    /// entered.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule(
        &self,
        students: Vec<Student>,
        courses: Vec<Course>,
        classrooms: Vec<Classroom>,
        enrollments: &[Enrollment],
        config: &ExamConfig,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ScheduleResult {
        let mut roster = Roster::new(students, courses);
        roster.apply_enrollments(enrollments);
        roster.apply_durations(config);

        let days = day_range(start_date, end_date);
        if days.is_empty() {
            let unscheduled: Vec<usize> = (0..roster.course_count()).collect();
            let failure_reasons = unscheduled
                .iter()
                .map(|&course| (course, SchedulingFailureReason::NoAvailableSlots))
                .collect();
            return ScheduleResult {
                roster,
                classrooms,
                schedule: BTreeMap::new(),
                unscheduled_courses: unscheduled,
                failure_reasons,
            };
        }

        let ctx = OrderingContext::from_roster(&roster);

        // Trial-run each strategy through Phase 1 alone; the strict
        // comparison keeps the earliest strategy on ties.
        let mut best: Option<(usize, usize)> = None;
        for (idx, strategy) in self.strategies.iter().enumerate() {
            let order = sort_indices(&roster, &ctx, strategy.as_ref());
            let outcome = phase1::assign_time_slots(&roster, &classrooms, config, &order, &days);
            let placed = outcome.slotted.len();
            debug!(strategy = strategy.name(), placed, "trial run scored");
            if best.map_or(true, |(_, best_placed)| placed > best_placed) {
                best = Some((idx, placed));
            }
        }

        // Re-run the winner through Phase 1, then materialize.
        let order = match best {
            Some((idx, _)) => {
                let winner = &self.strategies[idx];
                debug!(strategy = winner.name(), "ordering strategy selected");
                sort_indices(&roster, &ctx, winner.as_ref())
            }
            None => (0..roster.course_count()).collect(),
        };
        let outcome = phase1::assign_time_slots(&roster, &classrooms, config, &order, &days);

        let mut ids = phase2::IdGen::new();
        let placed = phase2::assign_classrooms(
            &roster,
            &classrooms,
            config,
            &outcome.slotted,
            &days,
            &mut ids,
        );

        let mut schedule: BTreeMap<NaiveDate, Vec<ExamSession>> = BTreeMap::new();
        for session in placed.sessions {
            schedule.entry(session.date()).or_default().push(session);
        }
        for day in schedule.values_mut() {
            day.sort_by_key(|session| (session.start, session.id));
        }

        let mut failure_reasons = outcome.failures;
        failure_reasons.extend(placed.failures);
        let unscheduled_courses: Vec<usize> = failure_reasons.keys().copied().collect();

        ScheduleResult {
            roster,
            classrooms,
            schedule,
            unscheduled_courses,
            failure_reasons,
        }
    }
}

impl Default for ExamScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive list of days from `start` to `end`.
fn day_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn students(count: u32) -> Vec<Student> {
        (1..=count).map(|i| Student::new(i, format!("S{i}"))).collect()
    }

    /// Checks every output invariant over a whole result.
    fn assert_invariants(result: &ScheduleResult, config: &ExamConfig) {
        let sessions: Vec<&ExamSession> = result.sessions().collect();

        // Partition capacities sum exactly to the enrollment.
        for session in &sessions {
            assert_eq!(
                session.assigned_capacity(),
                result.roster.courses[session.course].student_count(),
                "capacity not conserved for {}",
                result.roster.courses[session.course].name
            );
        }

        // No two sessions sharing a student overlap once gap-padded.
        for (i, a) in sessions.iter().enumerate() {
            for b in &sessions[i + 1..] {
                let share = result.roster.courses[a.course]
                    .shares_students_with(&result.roster.courses[b.course]);
                if share {
                    assert!(
                        !a.overlaps(b, config.student_gap_minutes),
                        "student conflict between {} and {}",
                        result.roster.courses[a.course].name,
                        result.roster.courses[b.course].name
                    );
                }
            }
        }

        // Daily cap respected for every student.
        for student_idx in 0..result.roster.student_count() {
            let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
            for session in &sessions {
                if result.roster.courses[session.course]
                    .students
                    .contains(&student_idx)
                {
                    *per_day.entry(session.date()).or_default() += 1;
                }
            }
            for (day, count) in per_day {
                assert!(
                    count <= config.max_exams_per_day as usize,
                    "student {student_idx} has {count} exams on {day}"
                );
            }
        }

        // No classroom double-booked once turnover-padded.
        for room_idx in 0..result.classrooms.len() {
            let occupied: Vec<&&ExamSession> = sessions
                .iter()
                .filter(|s| s.uses_classroom(room_idx))
                .collect();
            for (i, a) in occupied.iter().enumerate() {
                for b in &occupied[i + 1..] {
                    assert!(
                        !a.overlaps(b, config.room_turnover_minutes),
                        "room {} double-booked",
                        result.classrooms[room_idx].name
                    );
                }
            }
        }

        // Sessions stay inside the configured day hours.
        for session in &sessions {
            assert!(session.start >= config.day_start(session.date()));
            assert!(session.end <= config.day_end(session.date()));
        }
    }

    #[test]
    fn test_scenario_a_shared_students_two_slots() {
        let enrollments = vec![
            Enrollment::new("A", (1..=10).collect()),
            Enrollment::new("B", (1..=10).collect()),
        ];
        let config = ExamConfig::new();
        let result = ExamScheduler::new().schedule(
            students(10),
            vec![Course::new(1, "A"), Course::new(2, "B")],
            vec![Classroom::new(1, "R1", 50)],
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        assert!(result.is_fully_scheduled());
        assert_eq!(result.session_count(), 2);
        let sessions: Vec<_> = result.sessions().collect();
        assert_ne!(sessions[0].start, sessions[1].start);
        assert_invariants(&result, &config);
    }

    #[test]
    fn test_scenario_b_split_across_partitions() {
        let enrollments = vec![Enrollment::new("BIG", (1..=100).collect())];
        let classrooms: Vec<Classroom> = (1..=5)
            .map(|i| Classroom::new(i, format!("R{i}"), 30))
            .collect();
        let config = ExamConfig::new();
        let result = ExamScheduler::new().schedule(
            students(100),
            vec![Course::new(1, "BIG")],
            classrooms,
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        assert!(result.is_fully_scheduled());
        let sessions: Vec<_> = result.sessions().collect();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].partitions.len() >= 4);
        assert_eq!(sessions[0].assigned_capacity(), 100);
        assert_invariants(&result, &config);
    }

    #[test]
    fn test_scenario_c_insufficient_capacity() {
        let enrollments = vec![Enrollment::new("BIG", (1..=50).collect())];
        let config = ExamConfig::new();
        let result = ExamScheduler::new().schedule(
            students(50),
            vec![Course::new(1, "BIG")],
            vec![Classroom::new(1, "TINY", 20)],
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        assert_eq!(result.session_count(), 0);
        assert_eq!(result.unscheduled_courses, vec![0]);
        let reason = result.failure_reason(0).unwrap();
        assert!(matches!(
            reason,
            SchedulingFailureReason::ClassroomCapacityInsufficient
                | SchedulingFailureReason::NoAvailableSlots
        ));
    }

    #[test]
    fn test_scenario_d_room_reused_across_three_slots() {
        let enrollments = vec![
            Enrollment::new("A", (1..=10).collect()),
            Enrollment::new("B", (11..=20).collect()),
            Enrollment::new("C", (21..=30).collect()),
        ];
        let config = ExamConfig::new().with_max_exams_per_day(3);
        let result = ExamScheduler::new().schedule(
            students(30),
            vec![
                Course::new(1, "A"),
                Course::new(2, "B"),
                Course::new(3, "C"),
            ],
            vec![Classroom::new(1, "ONLY", 50)],
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        assert!(result.is_fully_scheduled());
        let sessions: Vec<_> = result.sessions().collect();
        assert_eq!(sessions.len(), 3);
        let mut starts: Vec<NaiveDateTime> = sessions.iter().map(|s| s.start).collect();
        starts.sort();
        starts.dedup();
        assert_eq!(starts.len(), 3, "single room must mean distinct slots");
        assert!(sessions.iter().all(|s| s.uses_classroom(0)));
        assert_invariants(&result, &config);
    }

    #[test]
    fn test_empty_date_range_is_immediate() {
        let enrollments = vec![Enrollment::new("A", vec![1])];
        let result = ExamScheduler::new().schedule(
            students(1),
            vec![Course::new(1, "A")],
            vec![Classroom::new(1, "R1", 50)],
            &enrollments,
            &ExamConfig::new(),
            date(5),
            date(2),
        );

        assert_eq!(result.session_count(), 0);
        assert_eq!(result.unscheduled_courses, vec![0]);
        assert_eq!(
            result.failure_reason(0),
            Some(SchedulingFailureReason::NoAvailableSlots)
        );
    }

    #[test]
    fn test_no_courses_yields_empty_schedule() {
        let result = ExamScheduler::new().schedule(
            students(3),
            Vec::new(),
            vec![Classroom::new(1, "R1", 50)],
            &[],
            &ExamConfig::new(),
            date(2),
            date(4),
        );

        assert!(result.is_fully_scheduled());
        assert_eq!(result.session_count(), 0);
    }

    #[test]
    fn test_duration_override_reaches_sessions() {
        let enrollments = vec![Enrollment::new("A", vec![1])];
        let config = ExamConfig::new().with_course_duration("A", 60);
        let result = ExamScheduler::new().schedule(
            students(1),
            vec![Course::new(1, "A")],
            vec![Classroom::new(1, "R1", 50)],
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        let sessions: Vec<_> = result.sessions().collect();
        assert_eq!(sessions[0].duration_minutes, 60);
        assert_eq!(sessions[0].time_slot(), "09:00-10:00");
    }

    #[test]
    fn test_deterministic_across_runs() {
        let enrollments = vec![
            Enrollment::new("A", (1..=15).collect()),
            Enrollment::new("B", (10..=25).collect()),
            Enrollment::new("C", (20..=30).collect()),
            Enrollment::new("D", (1..=5).collect()),
        ];
        let courses = || {
            vec![
                Course::new(1, "A"),
                Course::new(2, "B").with_duration(90),
                Course::new(3, "C").with_duration(180),
                Course::new(4, "D"),
            ]
        };
        let rooms = || vec![Classroom::new(1, "R1", 20), Classroom::new(2, "R2", 15)];
        let config = ExamConfig::new();

        let first = ExamScheduler::new().schedule(
            students(30), courses(), rooms(), &enrollments, &config, date(2), date(4),
        );
        let second = ExamScheduler::new().schedule(
            students(30), courses(), rooms(), &enrollments, &config, date(2), date(4),
        );

        assert_eq!(first.session_count(), second.session_count());
        assert_eq!(first.unscheduled_courses, second.unscheduled_courses);
        let starts_a: Vec<_> = first.sessions().map(|s| (s.course, s.start)).collect();
        let starts_b: Vec<_> = second.sessions().map(|s| (s.course, s.start)).collect();
        assert_eq!(starts_a, starts_b);
        assert_invariants(&first, &config);
    }

    #[test]
    fn test_input_order_when_no_strategies() {
        let enrollments = vec![
            Enrollment::new("A", (1..=5).collect()),
            Enrollment::new("B", (1..=20).collect()),
        ];
        let config = ExamConfig::new();
        let result = ExamScheduler::with_strategies(Vec::new()).schedule(
            students(20),
            vec![Course::new(1, "A"), Course::new(2, "B")],
            vec![Classroom::new(1, "R1", 30)],
            &enrollments,
            &config,
            date(2),
            date(2),
        );

        assert!(result.is_fully_scheduled());
        assert_invariants(&result, &config);
    }

    #[test]
    fn test_generated_medium_scale_invariants() {
        use crate::generator::ScenarioBuilder;

        let data = ScenarioBuilder::new()
            .with_students(300)
            .with_courses(20)
            .with_classrooms(8)
            .with_students_per_course(30, 10)
            .with_courses_per_student(4, 1)
            .with_capacities(&[20, 30, 40, 60])
            .with_seed(42)
            .generate();

        let config = ExamConfig::new();
        let result = ExamScheduler::new().schedule(
            data.students,
            data.courses,
            data.classrooms,
            &data.enrollments,
            &config,
            date(2),
            date(13),
        );

        assert!(
            result.session_count() > 0,
            "generated scenario should place at least some courses"
        );
        assert_invariants(&result, &config);
    }

    #[test]
    fn test_generated_dense_conflicts_invariants() {
        use crate::generator::ScenarioBuilder;

        // Most students share most courses: heavy conflict pressure.
        let data = ScenarioBuilder::new()
            .with_students(60)
            .with_courses(12)
            .with_classrooms(6)
            .with_students_per_course(40, 10)
            .with_courses_per_student(8, 2)
            .with_capacities(&[50, 80])
            .with_seed(999)
            .generate();

        let config = ExamConfig::new();
        let result = ExamScheduler::new().schedule(
            data.students,
            data.courses,
            data.classrooms,
            &data.enrollments,
            &config,
            date(2),
            date(15),
        );

        assert_invariants(&result, &config);
        // Every course is either scheduled or carries a reason.
        for course_idx in 0..result.roster.course_count() {
            let placed = !result.sessions_for_course(course_idx).is_empty();
            let reasoned = result.failure_reason(course_idx).is_some();
            assert!(placed ^ reasoned);
        }
    }
}
