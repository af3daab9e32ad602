//! Built-in exercises seeded into an empty exercise bank.

use crate::{Equipment, Exercise, MuscleGroup, Name};

struct BuiltInExercise {
    id: &'static str,
    name: &'static str,
    equipment: Equipment,
    variation: &'static str,
    muscle_group: MuscleGroup,
}

const BUILT_IN_EXERCISES: &[BuiltInExercise] = &[
    // Biceps
    BuiltInExercise {
        id: "ex-dumbbell-biceps-curl-standing-hammer",
        name: "Biceps Curl",
        equipment: Equipment::Dumbbell,
        variation: "Standing",
        muscle_group: MuscleGroup::Biceps,
    },
    BuiltInExercise {
        id: "ex-barbell-biceps-curl-standing",
        name: "Biceps Curl",
        equipment: Equipment::Barbell,
        variation: "Standing",
        muscle_group: MuscleGroup::Biceps,
    },
    BuiltInExercise {
        id: "ex-dumbbell-biceps-curl-seated-hammer",
        name: "Biceps Curl",
        equipment: Equipment::Dumbbell,
        variation: "Seated - Hammer",
        muscle_group: MuscleGroup::Biceps,
    },
    // Chest
    BuiltInExercise {
        id: "ex-barbell-bench-press-flat",
        name: "Bench Press",
        equipment: Equipment::Barbell,
        variation: "Flat",
        muscle_group: MuscleGroup::Chest,
    },
    BuiltInExercise {
        id: "ex-dumbbell-bench-press-incline",
        name: "Bench Press",
        equipment: Equipment::Dumbbell,
        variation: "Incline",
        muscle_group: MuscleGroup::Chest,
    },
    // Back
    BuiltInExercise {
        id: "ex-barbell-deadlift-conventional",
        name: "Deadlift",
        equipment: Equipment::Barbell,
        variation: "Conventional",
        muscle_group: MuscleGroup::Back,
    },
    BuiltInExercise {
        id: "ex-barbell-row-bent-over",
        name: "Bent Over Row",
        equipment: Equipment::Barbell,
        variation: "Bent Over",
        muscle_group: MuscleGroup::Back,
    },
    // Legs
    BuiltInExercise {
        id: "ex-barbell-squat-back",
        name: "Back Squat",
        equipment: Equipment::Barbell,
        variation: "Back",
        muscle_group: MuscleGroup::Legs,
    },
    BuiltInExercise {
        id: "ex-leg-press-machine",
        name: "Leg Press",
        equipment: Equipment::Machine,
        variation: "Standard",
        muscle_group: MuscleGroup::Legs,
    },
    // Shoulders
    BuiltInExercise {
        id: "ex-dumbbell-shoulder-press-standing",
        name: "Shoulder Press",
        equipment: Equipment::Dumbbell,
        variation: "Standing",
        muscle_group: MuscleGroup::Shoulders,
    },
];

#[must_use]
pub fn default_exercises() -> Vec<Exercise> {
    BUILT_IN_EXERCISES
        .iter()
        .filter_map(|e| {
            Some(Exercise {
                id: e.id.into(),
                name: Name::new(e.name).ok()?,
                equipment: e.equipment,
                variation: e.variation.to_string(),
                muscle_group: e.muscle_group,
                user_created: false,
                favorite: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_exercises_complete() {
        assert_eq!(default_exercises().len(), BUILT_IN_EXERCISES.len());
    }

    #[test]
    fn test_default_exercises_unique_ids() {
        let ids = default_exercises()
            .into_iter()
            .map(|e| e.id)
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), BUILT_IN_EXERCISES.len());
    }

    #[test]
    fn test_default_exercises_muscle_groups() {
        let muscle_groups = default_exercises()
            .iter()
            .map(|e| e.muscle_group)
            .collect::<HashSet<_>>();
        for muscle_group in [
            MuscleGroup::Biceps,
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Legs,
            MuscleGroup::Shoulders,
        ] {
            assert!(muscle_groups.contains(&muscle_group));
        }
    }

    #[test]
    fn test_default_exercises_not_user_created() {
        assert!(
            default_exercises()
                .iter()
                .all(|e| !e.user_created && !e.favorite)
        );
    }

    #[test]
    fn test_default_exercises_contains_biceps_curl() {
        assert!(default_exercises().iter().any(|e| {
            e.name.as_str() == "Biceps Curl"
                && e.equipment == Equipment::Dumbbell
                && e.muscle_group == MuscleGroup::Biceps
        }));
    }
}
