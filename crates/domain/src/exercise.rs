use std::{fmt, slice::Iter};

use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{Name, ReadError, WriteError};

pub trait ExerciseRepository {
    /// Returns `None` if no exercise bank has been stored yet.
    fn read_exercises(&self) -> Result<Option<Vec<Exercise>>, ReadError>;
    fn write_exercises(&self, exercises: &[Exercise]) -> Result<(), WriteError>;
}

pub trait ExerciseService {
    fn get_exercises(&self) -> Vec<Exercise>;
    fn get_exercise(&self, id: &ExerciseID) -> Option<Exercise>;
    fn search_exercises(&self, query: &str) -> Vec<Exercise>;
    fn create_exercise(
        &self,
        name: Name,
        equipment: Equipment,
        variation: &str,
        muscle_group: MuscleGroup,
    ) -> Exercise;
    fn upsert_exercise(&self, exercise: Exercise) -> Exercise;
    fn delete_exercise(&self, id: &ExerciseID);
    fn toggle_favorite(&self, id: &ExerciseID) -> Option<Exercise>;
}

/// Entry of the exercise bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub equipment: Equipment,
    pub variation: String,
    pub muscle_group: MuscleGroup,
    pub user_created: bool,
    pub favorite: bool,
}

impl Exercise {
    /// Name including the variation, e.g. "Biceps Curl (Standing)".
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.variation.trim().is_empty() {
            self.name.to_string()
        } else {
            format!("{} ({})", self.name, self.variation)
        }
    }

    /// Whether the name, equipment, variation or muscle group contains `query`,
    /// ignoring case. An empty query matches every exercise.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.equipment.name(),
            self.variation.as_str(),
            self.muscle_group.name(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Opaque identifier of a bank entry. Built-in exercises use readable slugs,
/// user-created exercises a random UUID.
#[derive(Deref, Display, Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl ExerciseID {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Equipment {
    Dumbbell,
    Barbell,
    Machine,
    Cable,
    Bodyweight,
    Kettlebell,
    #[default]
    Other,
}

impl Equipment {
    pub fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 7] = [
            Equipment::Dumbbell,
            Equipment::Barbell,
            Equipment::Machine,
            Equipment::Cable,
            Equipment::Bodyweight,
            Equipment::Kettlebell,
            Equipment::Other,
        ];
        EQUIPMENT.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Equipment::Dumbbell => "Dumbbell",
            Equipment::Barbell => "Barbell",
            Equipment::Machine => "Machine",
            Equipment::Cable => "Cable",
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Other => "Other",
        }
    }

    /// Suggested variations offered when creating an exercise with this equipment.
    #[must_use]
    pub fn variations(self) -> &'static [&'static str] {
        match self {
            Equipment::Dumbbell => &[
                "Standing", "Seated", "Incline", "Hammer", "Reverse", "Neutral",
            ],
            Equipment::Barbell => &["Standing", "Back", "Front", "Incline"],
            Equipment::Cable => &["Standard", "Single Arm", "Cross"],
            Equipment::Bodyweight => &["Standard", "Assisted"],
            Equipment::Machine | Equipment::Kettlebell | Equipment::Other => &["Standard"],
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Equipment {
    type Error = EquipmentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Equipment::iter()
            .find(|e| e.name().eq_ignore_ascii_case(value.trim()))
            .copied()
            .ok_or(EquipmentError::Invalid)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentError {
    #[error("Invalid equipment type")]
    Invalid,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Glutes,
    Core,
    FullBody,
    #[default]
    Other,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 10] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Legs,
            MuscleGroup::Glutes,
            MuscleGroup::Core,
            MuscleGroup::FullBody,
            MuscleGroup::Other,
        ];
        MUSCLE_GROUPS.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Core => "Core",
            MuscleGroup::FullBody => "Full Body",
            MuscleGroup::Other => "Other",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MuscleGroup::iter()
            .find(|m| m.name().eq_ignore_ascii_case(value.trim()))
            .copied()
            .ok_or(MuscleGroupError::Invalid)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Invalid muscle group")]
    Invalid,
}
