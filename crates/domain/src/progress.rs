//! Progress series derived from a snapshot of the workout history.

use chrono::{DateTime, Utc};

use crate::{ExerciseKey, PerformedExercise, WorkoutSession};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    pub date: DateTime<Utc>,
    pub total_volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExercisePoint {
    pub date: DateTime<Utc>,
    pub max_weight: f32,
    pub total_volume: f32,
}

/// Sum of reps times weight over all sets. Blank values count as zero.
#[must_use]
pub fn session_volume(workout_session: &WorkoutSession) -> f32 {
    workout_session.volume()
}

/// One point per session in input order, including sessions without exercises.
#[must_use]
pub fn aggregate_series(workout_sessions: &[WorkoutSession]) -> Vec<VolumePoint> {
    workout_sessions
        .iter()
        .map(|s| VolumePoint {
            date: s.date,
            total_volume: session_volume(s),
        })
        .collect()
}

/// One point per session containing the exercise, sorted ascending by date.
///
/// Multiple matching performed exercises within a session are combined into a single point.
#[must_use]
pub fn exercise_series(workout_sessions: &[WorkoutSession], key: &ExerciseKey) -> Vec<ExercisePoint> {
    let mut series = workout_sessions
        .iter()
        .filter_map(|s| {
            let matching = s
                .exercises
                .iter()
                .filter(|e| e.matches(key))
                .collect::<Vec<_>>();
            if matching.is_empty() {
                return None;
            }
            Some(ExercisePoint {
                date: s.date,
                max_weight: matching
                    .iter()
                    .map(|e| e.max_weight())
                    .fold(0.0, f32::max),
                total_volume: matching.iter().copied().map(PerformedExercise::volume).sum(),
            })
        })
        .collect::<Vec<_>>();
    series.sort_by_key(|p| p.date);
    series
}
