use chrono::{DateTime, Duration, Utc};

use crate::{
    Exercise, Name, NameError, PerformedExercise, PerformedExerciseID, PerformedSet, Template,
    TemplateExercise, WorkoutSession, WorkoutSessionID,
};

/// Workout currently being recorded.
///
/// Lives only in memory and is owned by the recording view. Nothing is persisted until the
/// workout is finished and appended to the history, or converted into a template. Sessions and
/// templates used as a starting point are cloned, so editing never affects them.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWorkout {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub exercises: Vec<PerformedExercise>,
}

impl ActiveWorkout {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            started_at,
            exercises: vec![],
        }
    }

    #[must_use]
    pub fn from_template(template: &Template, started_at: DateTime<Utc>) -> Self {
        Self {
            name: template.name.to_string(),
            started_at,
            exercises: template
                .exercises
                .iter()
                .map(|e| PerformedExercise {
                    id: PerformedExerciseID::generate(),
                    exercise_id: e.exercise_id.clone(),
                    name: e.name.clone(),
                    sets: e.sets.clone(),
                    collapsed: false,
                })
                .collect(),
        }
    }

    /// Repeats a previous session.
    #[must_use]
    pub fn from_workout_session(
        workout_session: &WorkoutSession,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: workout_session.name.to_string(),
            started_at,
            exercises: workout_session
                .exercises
                .iter()
                .map(|e| PerformedExercise {
                    id: PerformedExerciseID::generate(),
                    collapsed: false,
                    ..e.clone()
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.exercises.iter().map(PerformedExercise::volume).sum()
    }

    pub fn add_exercise(&mut self, exercise: &Exercise) -> PerformedExerciseID {
        let performed_exercise = PerformedExercise::from_exercise(exercise);
        let id = performed_exercise.id;
        self.exercises.push(performed_exercise);
        id
    }

    pub fn add_custom_exercise(&mut self, name: &str) -> Result<PerformedExerciseID, ActiveWorkoutError> {
        let performed_exercise = PerformedExercise::custom(&Name::new(name)?);
        let id = performed_exercise.id;
        self.exercises.push(performed_exercise);
        Ok(id)
    }

    pub fn remove_exercise(
        &mut self,
        id: PerformedExerciseID,
    ) -> Result<PerformedExercise, ActiveWorkoutError> {
        let index = self
            .exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or(ActiveWorkoutError::ExerciseNotFound)?;
        Ok(self.exercises.remove(index))
    }

    /// Appends a set and returns its index.
    pub fn add_set(
        &mut self,
        id: PerformedExerciseID,
        set: PerformedSet,
    ) -> Result<usize, ActiveWorkoutError> {
        let exercise = self.exercise_mut(id)?;
        exercise.sets.push(set);
        Ok(exercise.sets.len() - 1)
    }

    pub fn update_set(
        &mut self,
        id: PerformedExerciseID,
        index: usize,
        set: PerformedSet,
    ) -> Result<(), ActiveWorkoutError> {
        let existing = self
            .exercise_mut(id)?
            .sets
            .get_mut(index)
            .ok_or(ActiveWorkoutError::SetNotFound)?;
        *existing = set;
        Ok(())
    }

    pub fn remove_set(
        &mut self,
        id: PerformedExerciseID,
        index: usize,
    ) -> Result<PerformedSet, ActiveWorkoutError> {
        let exercise = self.exercise_mut(id)?;
        if index >= exercise.sets.len() {
            return Err(ActiveWorkoutError::SetNotFound);
        }
        Ok(exercise.sets.remove(index))
    }

    /// Returns the new collapsed state.
    pub fn toggle_collapsed(&mut self, id: PerformedExerciseID) -> Result<bool, ActiveWorkoutError> {
        let exercise = self.exercise_mut(id)?;
        exercise.collapsed = !exercise.collapsed;
        Ok(exercise.collapsed)
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.exercises.clear();
    }

    pub fn to_template(&self, name: Name) -> Result<Template, ActiveWorkoutError> {
        if self.is_empty() {
            return Err(ActiveWorkoutError::Empty);
        }
        Ok(Template::new(
            name,
            self.exercises.iter().map(TemplateExercise::from).collect(),
        ))
    }

    /// Converts the workout into an unsaved session dated `finished_at`.
    ///
    /// A blank name is replaced by a name derived from the date.
    pub fn finish(self, finished_at: DateTime<Utc>) -> Result<WorkoutSession, ActiveWorkoutError> {
        if self.is_empty() {
            return Err(ActiveWorkoutError::Empty);
        }
        let name = match Name::new(&self.name) {
            Ok(name) => name,
            Err(NameError::Empty) => WorkoutSession::default_name(finished_at),
            Err(err) => return Err(err.into()),
        };
        Ok(WorkoutSession {
            id: WorkoutSessionID::nil(),
            name,
            date: finished_at,
            duration: (finished_at - self.started_at).max(Duration::zero()),
            exercises: self.exercises,
        })
    }

    fn exercise_mut(
        &mut self,
        id: PerformedExerciseID,
    ) -> Result<&mut PerformedExercise, ActiveWorkoutError> {
        self.exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ActiveWorkoutError::ExerciseNotFound)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ActiveWorkoutError {
    #[error("Exercise not found")]
    ExerciseNotFound,
    #[error("Set not found")]
    SetNotFound,
    #[error("Workout contains no exercises")]
    Empty,
    #[error(transparent)]
    InvalidName(#[from] NameError),
}
