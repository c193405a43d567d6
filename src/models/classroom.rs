//! Classroom model.

use serde::{Deserialize, Serialize};

/// A classroom with a fixed seating capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// External identifier from the imported records.
    pub id: u32,
    /// Room name (e.g. "B201").
    pub name: String,
    /// Seating capacity. Must be positive for scheduling to use the room.
    pub capacity: u32,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: u32, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classroom_new() {
        let r = Classroom::new(4, "C301", 80);
        assert_eq!(r.id, 4);
        assert_eq!(r.name, "C301");
        assert_eq!(r.capacity, 80);
    }
}
