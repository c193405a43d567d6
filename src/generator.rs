//! Seeded scenario generation for stress testing and benchmarking.
//!
//! Builds a consistent set of students, courses, classrooms, and
//! enrollments from a handful of knobs. The same seed always produces
//! the same scenario, so stress tests stay reproducible.
//!
//! # Usage
//!
//! ```
//! use examplan::generator::ScenarioBuilder;
//!
//! let data = ScenarioBuilder::new()
//!     .with_students(200)
//!     .with_courses(15)
//!     .with_classrooms(6)
//!     .with_seed(42)
//!     .generate();
//! assert_eq!(data.students.len(), 200);
//! assert_eq!(data.enrollments.len(), 15);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

use crate::models::{Classroom, Course, Enrollment, Student};

/// A generated scheduling scenario.
///
/// Enrollments are returned unapplied; feed them to the scheduler (or a
/// roster) the same way imported data would be.
#[derive(Debug, Clone)]
pub struct GeneratedData {
    /// Generated students, ids 1..=n.
    pub students: Vec<Student>,
    /// Generated courses with randomized durations (60–180 minutes).
    pub courses: Vec<Course>,
    /// Generated classrooms with capacities from the palette.
    pub classrooms: Vec<Classroom>,
    /// One enrollment record per course.
    pub enrollments: Vec<Enrollment>,
}

/// Builder for [`GeneratedData`].
///
/// Per-course and per-student targets take an average plus a uniform
/// jitter; actual sizes land in `avg ± jitter`, clamped to what the
/// scenario can hold.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    student_count: usize,
    course_count: usize,
    classroom_count: usize,
    students_per_course: (usize, usize),
    courses_per_student: (usize, usize),
    capacities: Vec<u32>,
    seed: u64,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self {
            student_count: 150,
            course_count: 12,
            classroom_count: 6,
            students_per_course: (40, 15),
            courses_per_student: (4, 1),
            capacities: vec![40, 50, 60, 80, 100, 150],
            seed: 0,
        }
    }
}

impl ScenarioBuilder {
    /// Creates a builder with a small default scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of students.
    pub fn with_students(mut self, count: usize) -> Self {
        self.student_count = count;
        self
    }

    /// Sets the number of courses.
    pub fn with_courses(mut self, count: usize) -> Self {
        self.course_count = count;
        self
    }

    /// Sets the number of classrooms.
    pub fn with_classrooms(mut self, count: usize) -> Self {
        self.classroom_count = count;
        self
    }

    /// Sets the average enrollment per course and its jitter.
    pub fn with_students_per_course(mut self, avg: usize, jitter: usize) -> Self {
        self.students_per_course = (avg, jitter);
        self
    }

    /// Sets the average course load per student and its jitter.
    pub fn with_courses_per_student(mut self, avg: usize, jitter: usize) -> Self {
        self.courses_per_student = (avg, jitter);
        self
    }

    /// Sets the classroom capacity palette to draw from.
    pub fn with_capacities(mut self, capacities: &[u32]) -> Self {
        self.capacities = capacities.to_vec();
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the scenario.
    pub fn generate(self) -> GeneratedData {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let students: Vec<Student> = (1..=self.student_count)
            .map(|i| Student::new(i as u32, format!("Student_{i:05}")))
            .collect();

        let courses: Vec<Course> = (1..=self.course_count)
            .map(|i| {
                Course::new(i as u32, format!("Course_{i:04}"))
                    .with_duration(rng.random_range(60..=180))
            })
            .collect();

        let classrooms: Vec<Classroom> = (1..=self.classroom_count)
            .map(|i| {
                let capacity = if self.capacities.is_empty() {
                    50
                } else {
                    self.capacities[rng.random_range(0..self.capacities.len())]
                };
                Classroom::new(i as u32, format!("Room_{i:03}"), capacity)
            })
            .collect();

        // Fill each course towards its enrollment target.
        let mut course_students: Vec<BTreeSet<usize>> =
            vec![BTreeSet::new(); self.course_count];
        let mut pool: Vec<usize> = (0..self.student_count).collect();

        for members in course_students.iter_mut() {
            let target = jittered(&mut rng, self.students_per_course, self.student_count);
            pool.shuffle(&mut rng);
            members.extend(pool.iter().take(target).copied());
        }

        // Top up students below their course-load target.
        for student_idx in 0..self.student_count {
            let target = jittered(&mut rng, self.courses_per_student, self.course_count);
            let current = course_students
                .iter()
                .filter(|members| members.contains(&student_idx))
                .count();
            if current >= target {
                continue;
            }
            let mut open: Vec<usize> = (0..self.course_count)
                .filter(|&course| !course_students[course].contains(&student_idx))
                .collect();
            open.shuffle(&mut rng);
            for course in open.into_iter().take(target - current) {
                course_students[course].insert(student_idx);
            }
        }

        let enrollments: Vec<Enrollment> = courses
            .iter()
            .enumerate()
            .map(|(course_idx, course)| {
                let ids: Vec<u32> = course_students[course_idx]
                    .iter()
                    .map(|&student_idx| students[student_idx].id)
                    .collect();
                Enrollment::new(course.name.clone(), ids)
            })
            .collect();

        GeneratedData {
            students,
            courses,
            classrooms,
            enrollments,
        }
    }
}

/// Draws `avg ± jitter`, clamped to `1..=max`.
fn jittered(rng: &mut StdRng, (avg, jitter): (usize, usize), max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let spread = jitter as i64;
    let value = avg as i64 + rng.random_range(-spread..=spread);
    value.clamp(1, max as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_respected() {
        let data = ScenarioBuilder::new()
            .with_students(80)
            .with_courses(10)
            .with_classrooms(4)
            .with_seed(7)
            .generate();

        assert_eq!(data.students.len(), 80);
        assert_eq!(data.courses.len(), 10);
        assert_eq!(data.classrooms.len(), 4);
        assert_eq!(data.enrollments.len(), 10);
    }

    #[test]
    fn test_same_seed_same_scenario() {
        let build = || {
            ScenarioBuilder::new()
                .with_students(50)
                .with_courses(8)
                .with_seed(1234)
                .generate()
        };
        let a = build();
        let b = build();

        for (ea, eb) in a.enrollments.iter().zip(&b.enrollments) {
            assert_eq!(ea.course_name, eb.course_name);
            assert_eq!(ea.student_ids, eb.student_ids);
        }
        for (ca, cb) in a.courses.iter().zip(&b.courses) {
            assert_eq!(ca.duration_minutes, cb.duration_minutes);
        }
        for (ra, rb) in a.classrooms.iter().zip(&b.classrooms) {
            assert_eq!(ra.capacity, rb.capacity);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ScenarioBuilder::new().with_seed(1).generate();
        let b = ScenarioBuilder::new().with_seed(2).generate();
        let same = a
            .enrollments
            .iter()
            .zip(&b.enrollments)
            .all(|(ea, eb)| ea.student_ids == eb.student_ids);
        assert!(!same, "different seeds should produce different scenarios");
    }

    #[test]
    fn test_durations_in_range() {
        let data = ScenarioBuilder::new().with_seed(3).generate();
        for course in &data.courses {
            assert!((60..=180).contains(&course.duration_minutes));
        }
    }

    #[test]
    fn test_enrollment_ids_are_valid_and_unique() {
        let data = ScenarioBuilder::new()
            .with_students(40)
            .with_courses(6)
            .with_seed(11)
            .generate();

        for enrollment in &data.enrollments {
            let mut seen = BTreeSet::new();
            for &id in &enrollment.student_ids {
                assert!((1..=40).contains(&id));
                assert!(seen.insert(id), "duplicate student in one enrollment");
            }
            assert!(!enrollment.student_ids.is_empty());
        }
    }

    #[test]
    fn test_course_load_top_up() {
        // Tiny per-course target but a demanding per-student target:
        // the balancing pass must raise student loads.
        let data = ScenarioBuilder::new()
            .with_students(20)
            .with_courses(10)
            .with_students_per_course(1, 0)
            .with_courses_per_student(5, 0)
            .with_seed(21)
            .generate();

        let mut load = vec![0usize; 20];
        for enrollment in &data.enrollments {
            for &id in &enrollment.student_ids {
                load[(id - 1) as usize] += 1;
            }
        }
        assert!(load.iter().all(|&count| count >= 5));
    }
}
