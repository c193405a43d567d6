//! University exam timetabling engine.
//!
//! Assigns course exams to time slots and classrooms under hard
//! constraints (no student double-booked, per-student daily caps,
//! room capacity, room turnover buffers) while maximizing the
//! number of exams placed.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Student`, `Course`, `Classroom`,
//!   `Enrollment`, `ExamConfig`, `ExamSession`, `ScheduleResult`
//! - **`roster`**: Student↔course membership arena built from
//!   enrollment records
//! - **`ordering`**: Course-ranking heuristics trialed before scheduling
//! - **`scheduler`**: The two-phase greedy engine (`ExamScheduler`)
//! - **`validation`**: Input integrity checks (duplicate ids, bad
//!   capacities, dangling references)
//! - **`generator`**: Seeded scenario generation for stress tests
//!
//! # Architecture
//!
//! Scheduling runs in two phases. Phase 1 pins each course to a start
//! time, bin-packing into already-used slots before opening new ones
//! and keeping exact account of remaining room capacity. Phase 2 splits
//! each time-slotted exam across classrooms largest-first and seats
//! every student. Three ordering heuristics are trial-run through
//! Phase 1 and the best one drives the final schedule.

pub mod generator;
pub mod models;
pub mod ordering;
pub mod roster;
pub mod scheduler;
pub mod validation;
