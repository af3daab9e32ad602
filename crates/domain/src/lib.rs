#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod progress;

mod active_workout;
mod cycle;
mod error;
mod exercise;
mod name;
mod service;
mod template;
mod training;
mod workout_session;

pub use active_workout::{ActiveWorkout, ActiveWorkoutError};
pub use cycle::{
    CYCLE_WEEKS, Cycle, CycleNote, CycleRepository, CycleService, CycleStats,
    DEFAULT_WORKOUTS_GOAL,
};
pub use error::{ReadError, StorageError, WriteError};
pub use exercise::{
    Equipment, EquipmentError, Exercise, ExerciseID, ExerciseRepository, ExerciseService,
    MuscleGroup, MuscleGroupError,
};
pub use name::{Name, NameError, eq_ignore_case};
pub use service::{FinishedWorkout, Service};
pub use template::{Template, TemplateExercise, TemplateID, TemplateRepository, TemplateService};
pub use training::{FormRating, FormRatingError, Reps, RepsError, Weight, WeightError};
pub use workout_session::{
    ExerciseKey, PerformedExercise, PerformedExerciseID, PerformedSet, PersonalRecord,
    WeightRecord, WorkoutSession, WorkoutSessionID, WorkoutSessionRepository,
    WorkoutSessionService, best_weight, exercise_history, personal_records, suggested_sets,
};
