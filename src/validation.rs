//! Input validation for scheduling runs.
//!
//! Checks structural integrity of imported data and configuration
//! before scheduling. Detects:
//! - Duplicate identities (student/course/classroom ids, course names)
//! - Zero-capacity classrooms and non-positive exam durations
//! - Inconsistent day-hour and cap configuration
//! - Enrollments referencing unknown courses or students
//!
//! Validation is advisory: the engine itself tolerates bad references
//! by skipping them, but running these checks first turns silent data
//! loss into actionable findings.

use std::collections::HashSet;

use crate::models::{Classroom, Course, Enrollment, ExamConfig, Student};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identity.
    DuplicateId,
    /// Two courses share the same name (enrollments resolve by name).
    DuplicateName,
    /// A classroom has no usable capacity.
    InvalidCapacity,
    /// A course or override has a non-positive duration.
    InvalidDuration,
    /// Configuration values cannot produce any slot.
    InvalidConfig,
    /// An enrollment references a course or student that doesn't exist.
    UnknownReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates imported data and configuration for a scheduling run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    students: &[Student],
    courses: &[Course],
    classrooms: &[Classroom],
    enrollments: &[Enrollment],
    config: &ExamConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    // Collect student ids
    let mut student_ids = HashSet::new();
    for student in students {
        if !student_ids.insert(student.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student id: {}", student.id),
            ));
        }
    }

    // Collect course ids and names
    let mut course_ids = HashSet::new();
    let mut course_names = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course id: {}", course.id),
            ));
        }
        if !course_names.insert(course.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate course name: '{}'", course.name),
            ));
        }
        if course.duration_minutes <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Course '{}' has non-positive duration {}",
                    course.name, course.duration_minutes
                ),
            ));
        }
    }

    // Classrooms
    let mut classroom_ids = HashSet::new();
    for classroom in classrooms {
        if !classroom_ids.insert(classroom.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate classroom id: {}", classroom.id),
            ));
        }
        if classroom.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Classroom '{}' has zero capacity", classroom.name),
            ));
        }
    }

    // Duration overrides, sorted by name so findings are stable
    let mut overrides: Vec<(&String, &i64)> = config.course_durations.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    for (name, &minutes) in overrides {
        if minutes <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Duration override for '{name}' is non-positive ({minutes})"),
            ));
        }
    }

    // Configuration sanity
    if config.exam_end_hour <= config.exam_start_hour {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!(
                "Exam day ends at hour {} but starts at hour {}",
                config.exam_end_hour, config.exam_start_hour
            ),
        ));
    }
    if config.exam_start_hour > 23 || config.exam_end_hour > 24 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            "Exam day hours must lie within a calendar day".to_string(),
        ));
    }
    if config.max_exams_per_day == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            "Maximum exams per day must be at least 1".to_string(),
        ));
    }

    // Enrollment references
    for enrollment in enrollments {
        if !course_names.contains(enrollment.course_name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!(
                    "Enrollment references unknown course '{}'",
                    enrollment.course_name
                ),
            ));
        }
        for &student_id in &enrollment.student_ids {
            if !student_ids.contains(&student_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    format!(
                        "Enrollment for '{}' references unknown student {}",
                        enrollment.course_name, student_id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
