//! Phase 1: time-slot assignment.
//!
//! Walks the course list in the chosen order and pins each course to a
//! start time, without picking classrooms yet. Each course goes through
//! a two-step search:
//!
//! 1. **Bin-packing**: try every start time already used by a placed
//!    exam, in first-used order. Reusing slots keeps the timetable
//!    compact and lets Phase 2 pack rooms.
//! 2. **Fresh slot**: scan each day of the window at half-hour offsets
//!    inside the configured day hours.
//!
//! A candidate start must pass four checks: the exam fits the day
//! window, no enrolled student has a gap-padded overlap, no enrolled
//! student hits the daily cap, and the remaining room capacity covers
//! the enrollment. The capacity check replays Phase 2's greedy
//! allocation over every already-placed start group whose turnover-
//! padded window overlaps the candidate, consuming whole rooms: two
//! exams at one timestamp can never share a classroom, so capacity is
//! room-aware, not a plain sum.
//!
//! When no candidate fits, the last violated constraint becomes the
//! course's failure reason (`NoAvailableSlots` when nothing was tried).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Classroom, ExamConfig, SchedulingFailureReason, TimeSlottedExam};
use crate::roster::Roster;

/// Offset between candidate start times within a day.
pub(crate) const SLOT_STEP_MINUTES: i64 = 30;

/// Result of one Phase-1 pass.
#[derive(Debug, Clone)]
pub(crate) struct Phase1Outcome {
    /// Exams that received a start time, in placement order.
    pub slotted: Vec<TimeSlottedExam>,
    /// Failure reason per course that found no slot.
    pub failures: BTreeMap<usize, SchedulingFailureReason>,
}

/// Outcome of probing one candidate start time.
enum Candidate {
    Fits,
    OutsideDay,
    Violates(SchedulingFailureReason),
}

/// Mutable placement state for one pass.
struct SlotBoard {
    slotted: Vec<TimeSlottedExam>,
    /// Distinct start times in first-used order.
    start_order: Vec<NaiveDateTime>,
    /// Start time → indices into `slotted`.
    groups: BTreeMap<NaiveDateTime, Vec<usize>>,
    /// Student index → indices into `slotted`.
    student_exams: Vec<Vec<usize>>,
}

impl SlotBoard {
    fn new(student_count: usize) -> Self {
        Self {
            slotted: Vec::new(),
            start_order: Vec::new(),
            groups: BTreeMap::new(),
            student_exams: vec![Vec::new(); student_count],
        }
    }

    fn commit(&mut self, roster: &Roster, course_idx: usize, start: NaiveDateTime) {
        let course = &roster.courses[course_idx];
        let exam = TimeSlottedExam::new(
            course_idx,
            start,
            course.duration_minutes,
            course.student_count(),
        );
        let slot_idx = self.slotted.len();
        if !self.groups.contains_key(&start) {
            self.start_order.push(start);
        }
        self.groups.entry(start).or_default().push(slot_idx);
        for &student in &course.students {
            self.student_exams[student].push(slot_idx);
        }
        self.slotted.push(exam);
    }

    /// Whether any enrolled student already sits a gap-padded
    /// overlapping exam.
    fn student_conflict(
        &self,
        roster: &Roster,
        course_idx: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        gap_minutes: i64,
    ) -> bool {
        roster.courses[course_idx].students.iter().any(|&student| {
            self.student_exams[student]
                .iter()
                .any(|&e| self.slotted[e].overlaps_window(start, end, gap_minutes))
        })
    }

    /// Whether any enrolled student already sits `max` exams on `date`.
    fn daily_cap_reached(
        &self,
        roster: &Roster,
        course_idx: usize,
        date: NaiveDate,
        max: u32,
    ) -> bool {
        roster.courses[course_idx].students.iter().any(|&student| {
            let on_day = self.student_exams[student]
                .iter()
                .filter(|&&e| self.slotted[e].date() == date)
                .count();
            on_day >= max as usize
        })
    }

    /// Replays the Phase-2 greedy allocation to find the room capacity
    /// left for a candidate window.
    ///
    /// Every placed exam whose turnover-padded window overlaps the
    /// candidate consumes whole rooms largest-first from a shared pool,
    /// group by group in first-used order; whatever capacity remains is
    /// what the candidate could still claim.
    fn capacity_covers(
        &self,
        rooms_desc: &[usize],
        capacities: &[usize],
        start: NaiveDateTime,
        end: NaiveDateTime,
        turnover_minutes: i64,
        needed: usize,
    ) -> bool {
        let mut cursor = 0usize;
        for group_start in &self.start_order {
            for &slot_idx in &self.groups[group_start] {
                let exam = &self.slotted[slot_idx];
                if !exam.overlaps_window(start, end, turnover_minutes) {
                    continue;
                }
                let mut covered = 0usize;
                while covered < exam.student_count && cursor < rooms_desc.len() {
                    covered += capacities[rooms_desc[cursor]];
                    cursor += 1;
                }
            }
        }
        let free: usize = rooms_desc[cursor..]
            .iter()
            .map(|&room| capacities[room])
            .sum();
        free >= needed
    }

    fn check(
        &self,
        roster: &Roster,
        config: &ExamConfig,
        rooms_desc: &[usize],
        capacities: &[usize],
        course_idx: usize,
        start: NaiveDateTime,
    ) -> Candidate {
        let date = start.date();
        let end = start + Duration::minutes(roster.courses[course_idx].duration_minutes);
        if start < config.day_start(date) || end > config.day_end(date) {
            return Candidate::OutsideDay;
        }
        if self.student_conflict(roster, course_idx, start, end, config.student_gap_minutes) {
            return Candidate::Violates(SchedulingFailureReason::StudentConflict);
        }
        if self.daily_cap_reached(roster, course_idx, date, config.max_exams_per_day) {
            return Candidate::Violates(SchedulingFailureReason::MaxExamsPerDayExceeded);
        }
        let needed = roster.courses[course_idx].student_count();
        if !self.capacity_covers(
            rooms_desc,
            capacities,
            start,
            end,
            config.room_turnover_minutes,
            needed,
        ) {
            return Candidate::Violates(SchedulingFailureReason::ClassroomCapacityInsufficient);
        }
        Candidate::Fits
    }
}

/// Assigns a start time to every course it can, in the given order.
pub(crate) fn assign_time_slots(
    roster: &Roster,
    classrooms: &[Classroom],
    config: &ExamConfig,
    order: &[usize],
    days: &[NaiveDate],
) -> Phase1Outcome {
    let capacities: Vec<usize> = classrooms.iter().map(|c| c.capacity as usize).collect();
    let mut rooms_desc: Vec<usize> = (0..classrooms.len()).collect();
    rooms_desc.sort_by_key(|&room| std::cmp::Reverse(capacities[room]));

    let mut board = SlotBoard::new(roster.student_count());
    let mut failures = BTreeMap::new();

    for &course_idx in order {
        let mut last_violation: Option<SchedulingFailureReason> = None;
        let mut placed = false;

        // Step 1: bin-pack into an already-used start time.
        let existing = board.start_order.clone();
        for start in existing {
            match board.check(roster, config, &rooms_desc, &capacities, course_idx, start) {
                Candidate::Fits => {
                    board.commit(roster, course_idx, start);
                    placed = true;
                    break;
                }
                Candidate::OutsideDay => {}
                Candidate::Violates(reason) => last_violation = Some(reason),
            }
        }

        // Step 2: open a fresh slot.
        if !placed {
            'days: for &date in days {
                let day_end = config.day_end(date);
                let mut start = config.day_start(date);
                while start < day_end {
                    match board.check(roster, config, &rooms_desc, &capacities, course_idx, start)
                    {
                        Candidate::Fits => {
                            board.commit(roster, course_idx, start);
                            placed = true;
                            break 'days;
                        }
                        Candidate::OutsideDay => {}
                        Candidate::Violates(reason) => last_violation = Some(reason),
                    }
                    start += Duration::minutes(SLOT_STEP_MINUTES);
                }
            }
        }

        if !placed {
            let reason = last_violation.unwrap_or(SchedulingFailureReason::NoAvailableSlots);
            debug!(
                course = %roster.courses[course_idx].name,
                reason = ?reason,
                "course not time-slotted"
            );
            failures.insert(course_idx, reason);
        }
    }

    Phase1Outcome {
        slotted: board.slotted,
        failures,
    }
}
