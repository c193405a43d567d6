//! Phase 2: classroom and seat assignment.
//!
//! Consumes the time-slotted exams of the winning Phase-1 run and
//! materializes sessions. Exams are grouped by identical start time;
//! within a group, each exam takes classrooms largest-first from the
//! rooms free of turnover-padded overlap with already-materialized
//! sessions, and consumed rooms leave the pool for the rest of the
//! group. One partition per room; the last partition takes only the
//! remainder, so partition capacities always sum to the enrollment.
//! Students are seated by walking the course roster once, filling
//! partitions in order.
//!
//! Running out of rooms here means Phase 1's capacity accounting
//! under-counted contention (turnover chains can do this). The exam is
//! not silently dropped: the defect is logged and a single constrained
//! retry scans the window for another start where the student checks
//! and free-room capacity both hold against everything materialized so
//! far. Only if the retry also fails is the course recorded as
//! unscheduled.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, error};

use crate::models::{
    Classroom, ExamConfig, ExamPartition, ExamSession, SchedulingFailureReason,
    StudentAssignment, TimeSlottedExam,
};
use crate::roster::Roster;

use super::phase1::SLOT_STEP_MINUTES;

/// Monotonic id source threaded through one Phase-2 pass.
///
/// Sessions, partitions, and assignments draw from independent
/// counters, all starting at 1.
#[derive(Debug)]
pub(crate) struct IdGen {
    next_session: u32,
    next_partition: u32,
    next_assignment: u32,
}

impl IdGen {
    pub(crate) fn new() -> Self {
        Self {
            next_session: 1,
            next_partition: 1,
            next_assignment: 1,
        }
    }

    fn session(&mut self) -> u32 {
        let id = self.next_session;
        self.next_session += 1;
        id
    }

    fn partition(&mut self) -> u32 {
        let id = self.next_partition;
        self.next_partition += 1;
        id
    }

    fn assignment(&mut self) -> u32 {
        let id = self.next_assignment;
        self.next_assignment += 1;
        id
    }
}

/// Result of one Phase-2 pass.
#[derive(Debug)]
pub(crate) struct Phase2Outcome {
    /// Materialized sessions, in placement order.
    pub sessions: Vec<ExamSession>,
    /// Courses dropped by a failed retry, with their reason.
    pub failures: BTreeMap<usize, SchedulingFailureReason>,
}

/// Assigns classrooms and seats to every time-slotted exam.
pub(crate) fn assign_classrooms(
    roster: &Roster,
    classrooms: &[Classroom],
    config: &ExamConfig,
    slotted: &[TimeSlottedExam],
    days: &[NaiveDate],
    ids: &mut IdGen,
) -> Phase2Outcome {
    let capacities: Vec<usize> = classrooms.iter().map(|c| c.capacity as usize).collect();
    let mut rooms_desc: Vec<usize> = (0..classrooms.len()).collect();
    rooms_desc.sort_by_key(|&room| std::cmp::Reverse(capacities[room]));

    // Group by identical start, groups in first-used order.
    let mut group_order: Vec<NaiveDateTime> = Vec::new();
    let mut groups: BTreeMap<NaiveDateTime, Vec<usize>> = BTreeMap::new();
    for (idx, exam) in slotted.iter().enumerate() {
        if !groups.contains_key(&exam.start) {
            group_order.push(exam.start);
        }
        groups.entry(exam.start).or_default().push(idx);
    }
    let flat_order: Vec<usize> = group_order
        .iter()
        .flat_map(|start| groups[start].iter().copied())
        .collect();

    let mut room_busy: Vec<Vec<(NaiveDateTime, NaiveDateTime)>> =
        vec![Vec::new(); classrooms.len()];
    let mut sessions: Vec<ExamSession> = Vec::new();
    let mut failures = BTreeMap::new();
    let mut position = 0usize;

    for group_start in &group_order {
        let members = &groups[group_start];
        let group_end = members
            .iter()
            .map(|&idx| slotted[idx].end)
            .max()
            .unwrap_or(*group_start);

        // Rooms free of turnover-padded overlap with materialized sessions.
        let mut available: Vec<usize> = rooms_desc
            .iter()
            .copied()
            .filter(|&room| {
                room_is_free(
                    &room_busy[room],
                    *group_start,
                    group_end,
                    config.room_turnover_minutes,
                )
            })
            .collect();

        for &idx in members {
            let exam = &slotted[idx];
            position += 1;

            match greedy_prefix(&available, &capacities, exam.student_count) {
                Some(take) => {
                    let taken: Vec<usize> = available.drain(0..take).collect();
                    let session = materialize(roster, ids, exam, exam.start, &taken, &capacities);
                    for &room in &taken {
                        room_busy[room].push((exam.start, exam.end));
                    }
                    sessions.push(session);
                }
                None => {
                    error!(
                        course = %roster.courses[exam.course].name,
                        start = %exam.start,
                        students = exam.student_count,
                        "room capacity certified in time-slotting is unavailable; retrying"
                    );
                    let pending = &flat_order[position..];
                    match retry_place(
                        roster, config, &rooms_desc, &capacities, &room_busy, &sessions,
                        slotted, pending, exam, days,
                    ) {
                        Some((start, taken)) => {
                            debug!(
                                course = %roster.courses[exam.course].name,
                                start = %start,
                                "retry placed exam at a new slot"
                            );
                            let session =
                                materialize(roster, ids, exam, start, &taken, &capacities);
                            let end = session.end;
                            for &room in &taken {
                                room_busy[room].push((start, end));
                            }
                            sessions.push(session);
                        }
                        None => {
                            failures.insert(
                                exam.course,
                                SchedulingFailureReason::ClassroomCapacityInsufficient,
                            );
                        }
                    }
                }
            }
        }
    }

    Phase2Outcome { sessions, failures }
}

/// Whether a room has no turnover-padded overlap with a window.
fn room_is_free(
    busy: &[(NaiveDateTime, NaiveDateTime)],
    start: NaiveDateTime,
    end: NaiveDateTime,
    turnover_minutes: i64,
) -> bool {
    busy.iter().all(|&(busy_start, busy_end)| {
        !crate::models::padded_overlap(busy_start, busy_end, start, end, turnover_minutes)
    })
}

/// How many rooms the greedy largest-first allocation takes from the
/// front of `available` to cover `needed`, or `None` if it cannot.
fn greedy_prefix(available: &[usize], capacities: &[usize], needed: usize) -> Option<usize> {
    let mut covered = 0usize;
    for (count, &room) in available.iter().enumerate() {
        if covered >= needed {
            return Some(count);
        }
        covered += capacities[room];
    }
    (covered >= needed).then_some(available.len())
}

/// Builds the session for an exam over the rooms it claimed.
fn materialize(
    roster: &Roster,
    ids: &mut IdGen,
    exam: &TimeSlottedExam,
    start: NaiveDateTime,
    taken: &[usize],
    capacities: &[usize],
) -> ExamSession {
    let mut session = ExamSession::new(ids.session(), exam.course, start, exam.duration_minutes);
    let mut students = roster.courses[exam.course].students.iter();
    let mut remaining = exam.student_count;

    for &room in taken {
        let assigned = remaining.min(capacities[room]);
        let mut partition = ExamPartition::new(ids.partition(), assigned, room);
        for seat in 1..=assigned {
            if let Some(&student) = students.next() {
                partition.add_assignment(StudentAssignment::new(
                    ids.assignment(),
                    seat as u32,
                    student,
                ));
            }
        }
        remaining -= assigned;
        session.add_partition(partition);
    }
    session
}

/// Scans the window for a start where the exam fits against everything
/// materialized and still pending.
///
/// Student checks run against materialized sessions and the exams not
/// yet processed in this pass, so a rescued exam can never introduce a
/// conflict; the room check runs against materialized occupancy only.
#[allow(clippy::too_many_arguments)]
fn retry_place(
    roster: &Roster,
    config: &ExamConfig,
    rooms_desc: &[usize],
    capacities: &[usize],
    room_busy: &[Vec<(NaiveDateTime, NaiveDateTime)>],
    sessions: &[ExamSession],
    slotted: &[TimeSlottedExam],
    pending: &[usize],
    exam: &TimeSlottedExam,
    days: &[NaiveDate],
) -> Option<(NaiveDateTime, Vec<usize>)> {
    for &date in days {
        let day_end = config.day_end(date);
        let mut start = config.day_start(date);
        while start < day_end {
            let end = start + Duration::minutes(exam.duration_minutes);
            if end <= day_end
                && !conflicts_elsewhere(
                    roster, config, sessions, slotted, pending, exam.course, start, end,
                )
                && !over_daily_cap(roster, config, sessions, slotted, pending, exam.course, date)
            {
                let free: Vec<usize> = rooms_desc
                    .iter()
                    .copied()
                    .filter(|&room| {
                        room_is_free(&room_busy[room], start, end, config.room_turnover_minutes)
                    })
                    .collect();
                if let Some(take) = greedy_prefix(&free, capacities, exam.student_count) {
                    return Some((start, free[..take].to_vec()));
                }
            }
            start += Duration::minutes(SLOT_STEP_MINUTES);
        }
    }
    None
}

/// Gap-padded student conflict against materialized sessions and
/// pending exams.
#[allow(clippy::too_many_arguments)]
fn conflicts_elsewhere(
    roster: &Roster,
    config: &ExamConfig,
    sessions: &[ExamSession],
    slotted: &[TimeSlottedExam],
    pending: &[usize],
    course_idx: usize,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    let course = &roster.courses[course_idx];
    let gap = config.student_gap_minutes;

    sessions.iter().any(|session| {
        course.shares_students_with(&roster.courses[session.course])
            && crate::models::padded_overlap(session.start, session.end, start, end, gap)
    }) || pending.iter().any(|&idx| {
        let other = &slotted[idx];
        course.shares_students_with(&roster.courses[other.course])
            && other.overlaps_window(start, end, gap)
    })
}

/// Whether placing the exam on `date` would push any enrolled student
/// past the daily cap, counting materialized and pending exams.
fn over_daily_cap(
    roster: &Roster,
    config: &ExamConfig,
    sessions: &[ExamSession],
    slotted: &[TimeSlottedExam],
    pending: &[usize],
    course_idx: usize,
    date: NaiveDate,
) -> bool {
    let course = &roster.courses[course_idx];
    course.students.iter().any(|&student| {
        let materialized = sessions
            .iter()
            .filter(|s| {
                s.date() == date && roster.courses[s.course].students.contains(&student)
            })
            .count();
        let upcoming = pending
            .iter()
            .filter(|&&idx| {
                let other = &slotted[idx];
                other.date() == date && roster.courses[other.course].students.contains(&student)
            })
            .count();
        materialized + upcoming >= config.max_exams_per_day as usize
    })
}
