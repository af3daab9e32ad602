use std::fmt;

use chrono::{DateTime, Duration, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    Exercise, ExerciseID, FormRating, Name, ReadError, Reps, Weight, WriteError, eq_ignore_case,
};

pub trait WorkoutSessionRepository {
    fn read_workout_sessions(&self) -> Result<Vec<WorkoutSession>, ReadError>;
    fn write_workout_sessions(&self, workout_sessions: &[WorkoutSession])
    -> Result<(), WriteError>;
}

pub trait WorkoutSessionService {
    /// All stored sessions, oldest first.
    fn get_workout_sessions(&self) -> Vec<WorkoutSession>;
    /// Stores a session at the end of the history. A nil or already used ID is replaced by a
    /// fresh one.
    fn append_workout_session(&self, workout_session: WorkoutSession) -> WorkoutSession;
    /// Replaces the session with the same ID, or appends it if there is none.
    fn replace_workout_session(&self, workout_session: WorkoutSession) -> WorkoutSession;
    fn delete_workout_session(&self, id: WorkoutSessionID);
    fn clear_workout_sessions(&self);
    fn get_latest_workout_session(&self) -> Option<WorkoutSession>;
    fn get_exercise_history(&self, key: &ExerciseKey) -> Vec<WeightRecord>;
    fn get_best_weight(&self, key: &ExerciseKey) -> f32;
    fn is_personal_record(&self, key: &ExerciseKey, weight: Weight) -> bool;
    fn get_suggested_sets(&self, key: &ExerciseKey) -> Vec<PerformedSet>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: WorkoutSessionID,
    pub name: Name,
    pub date: DateTime<Utc>,
    pub duration: Duration,
    pub exercises: Vec<PerformedExercise>,
}

impl WorkoutSession {
    /// Name used when the user did not name a session.
    #[must_use]
    pub fn default_name(date: DateTime<Utc>) -> Name {
        Name(format!("Workout {}", date.format("%Y-%m-%d")))
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.exercises.iter().map(PerformedExercise::volume).sum()
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn contains(&self, key: &ExerciseKey) -> bool {
        self.exercises.iter().any(|e| e.matches(key))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSessionID(Uuid);

impl WorkoutSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Time-ordered ID for a newly saved session.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl From<Uuid> for WorkoutSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Exercise as performed within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformedExercise {
    pub id: PerformedExerciseID,
    pub exercise_id: Option<ExerciseID>,
    pub name: String,
    pub sets: Vec<PerformedSet>,
    pub collapsed: bool,
}

impl PerformedExercise {
    #[must_use]
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            id: PerformedExerciseID::generate(),
            exercise_id: Some(exercise.id.clone()),
            name: exercise.name.to_string(),
            sets: vec![],
            collapsed: false,
        }
    }

    #[must_use]
    pub fn custom(name: &Name) -> Self {
        Self {
            id: PerformedExerciseID::generate(),
            exercise_id: None,
            name: name.to_string(),
            sets: vec![],
            collapsed: false,
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.sets.iter().map(PerformedSet::volume).sum()
    }

    #[must_use]
    pub fn max_weight(&self) -> f32 {
        self.sets
            .iter()
            .map(PerformedSet::weight_or_zero)
            .fold(0.0, f32::max)
    }

    #[must_use]
    pub fn matches(&self, key: &ExerciseKey) -> bool {
        match key {
            ExerciseKey::Bank { id, name } => match &self.exercise_id {
                Some(exercise_id) => exercise_id == id,
                None => eq_ignore_case(&self.name, name),
            },
            ExerciseKey::Name(name) => eq_ignore_case(&self.name, name),
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PerformedExerciseID(Uuid);

impl PerformedExerciseID {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for PerformedExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for PerformedExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A set as recorded. Reps and weight are absent while the set is still being edited and
/// count as zero in all computations.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PerformedSet {
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub form_rating: FormRating,
    pub notes: String,
}

impl PerformedSet {
    #[must_use]
    pub fn new(reps: Reps, weight: Weight) -> Self {
        Self {
            reps: Some(reps),
            weight: Some(weight),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.reps.unwrap_or_default() * self.weight.unwrap_or_default()
    }

    #[must_use]
    pub fn weight_or_zero(&self) -> f32 {
        self.weight.map_or(0.0, f32::from)
    }
}

/// Selects the performed exercises that belong to one exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseKey {
    /// Performed exercises linked to the bank entry. Performed exercises without a link to
    /// any bank entry are matched by name instead.
    Bank { id: ExerciseID, name: String },
    /// Performed exercises with the same name, ignoring case, regardless of any link.
    Name(String),
}

impl From<&Exercise> for ExerciseKey {
    fn from(value: &Exercise) -> Self {
        ExerciseKey::Bank {
            id: value.id.clone(),
            name: value.name.to_string(),
        }
    }
}

impl From<&PerformedExercise> for ExerciseKey {
    fn from(value: &PerformedExercise) -> Self {
        match &value.exercise_id {
            Some(id) => ExerciseKey::Bank {
                id: id.clone(),
                name: value.name.clone(),
            },
            None => ExerciseKey::Name(value.name.clone()),
        }
    }
}

impl From<&str> for ExerciseKey {
    fn from(value: &str) -> Self {
        ExerciseKey::Name(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRecord {
    pub weight: f32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise: String,
    pub weight: f32,
}

impl fmt::Display for PersonalRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.exercise, self.weight)
    }
}

/// One record per set of every matching performed exercise.
///
/// The records are in storage order (session, exercise, set) and are not sorted by date.
#[must_use]
pub fn exercise_history(
    workout_sessions: &[WorkoutSession],
    key: &ExerciseKey,
) -> Vec<WeightRecord> {
    workout_sessions
        .iter()
        .flat_map(|s| {
            s.exercises
                .iter()
                .filter(|e| e.matches(key))
                .flat_map(|e| e.sets.iter())
                .map(|set| WeightRecord {
                    weight: set.weight_or_zero(),
                    date: s.date,
                })
        })
        .collect()
}

/// Highest weight ever recorded for the exercise, or 0 if there is none.
#[must_use]
pub fn best_weight(workout_sessions: &[WorkoutSession], key: &ExerciseKey) -> f32 {
    exercise_history(workout_sessions, key)
        .iter()
        .map(|r| r.weight)
        .fold(0.0, f32::max)
}

/// Exercises of `workout_session` whose heaviest set exceeds every weight in `history`.
///
/// An exercise performed several times in the session yields a single record with the
/// heaviest weight.
#[must_use]
pub fn personal_records(
    history: &[WorkoutSession],
    workout_session: &WorkoutSession,
) -> Vec<PersonalRecord> {
    let mut records: Vec<(&PerformedExercise, PersonalRecord)> = vec![];
    for e in &workout_session.exercises {
        let key = ExerciseKey::from(e);
        let weight = e.max_weight();
        if weight <= 0.0 || weight <= best_weight(history, &key) {
            continue;
        }
        match records
            .iter_mut()
            .find(|(other, _)| other.matches(&key) && e.matches(&ExerciseKey::from(*other)))
        {
            Some((_, record)) => record.weight = record.weight.max(weight),
            None => records.push((e, PersonalRecord {
                exercise: e.name.clone(),
                weight,
            })),
        }
    }
    records.into_iter().map(|(_, record)| record).collect()
}

/// Sets of the most recent performance of the exercise, used to prefill new sets.
#[must_use]
pub fn suggested_sets(workout_sessions: &[WorkoutSession], key: &ExerciseKey) -> Vec<PerformedSet> {
    workout_sessions
        .iter()
        .rev()
        .find_map(|s| s.exercises.iter().find(|e| e.matches(key)))
        .map(|e| e.sets.clone())
        .unwrap_or_default()
}
