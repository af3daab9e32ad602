use chrono::{DateTime, NaiveDate, Utc};
use log::{info, log};

use crate::{
    ActiveWorkout, ActiveWorkoutError, Cycle, CycleNote, CycleRepository, CycleService,
    Equipment, Exercise, ExerciseID, ExerciseKey, ExerciseRepository, ExerciseService,
    MuscleGroup, Name, PerformedSet, PersonalRecord, Template, TemplateID, TemplateRepository,
    TemplateService, Weight, WeightRecord, WorkoutSession, WorkoutSessionID,
    WorkoutSessionRepository, WorkoutSessionService, catalog, workout_session,
};

/// Implements all store operations on top of a repository.
///
/// Failed reads degrade to empty collections and failed writes are only logged, so callers
/// continue with the in-memory state they passed in.
pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: literal) => {{
        let result = $result;
        if let Err(ref err) = result {
            log!(err.level(), "failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    fn get_exercises(&self) -> Vec<Exercise> {
        match log_on_error!(self.repository.read_exercises(), "get", "exercises") {
            Ok(Some(exercises)) => exercises,
            Ok(None) => {
                info!("seeding exercise bank");
                let exercises = catalog::default_exercises();
                let _ = log_on_error!(
                    self.repository.write_exercises(&exercises),
                    "seed",
                    "exercises"
                );
                exercises
            }
            Err(_) => catalog::default_exercises(),
        }
    }

    fn get_exercise(&self, id: &ExerciseID) -> Option<Exercise> {
        self.get_exercises().into_iter().find(|e| &e.id == id)
    }

    fn search_exercises(&self, query: &str) -> Vec<Exercise> {
        self.get_exercises()
            .into_iter()
            .filter(|e| e.matches(query))
            .collect()
    }

    fn create_exercise(
        &self,
        name: Name,
        equipment: Equipment,
        variation: &str,
        muscle_group: MuscleGroup,
    ) -> Exercise {
        self.upsert_exercise(Exercise {
            id: ExerciseID::generate(),
            name,
            equipment,
            variation: variation.trim().to_string(),
            muscle_group,
            user_created: true,
            favorite: false,
        })
    }

    fn upsert_exercise(&self, mut exercise: Exercise) -> Exercise {
        if exercise.id.is_empty() {
            exercise.id = ExerciseID::generate();
        }
        let mut exercises = self.get_exercises();
        match exercises.iter_mut().find(|e| e.id == exercise.id) {
            Some(existing) => existing.clone_from(&exercise),
            None => exercises.push(exercise.clone()),
        }
        let _ = log_on_error!(
            self.repository.write_exercises(&exercises),
            "store",
            "exercise"
        );
        exercise
    }

    fn delete_exercise(&self, id: &ExerciseID) {
        let mut exercises = self.get_exercises();
        let len = exercises.len();
        exercises.retain(|e| &e.id != id);
        if exercises.len() != len {
            let _ = log_on_error!(
                self.repository.write_exercises(&exercises),
                "delete",
                "exercise"
            );
        }
    }

    fn toggle_favorite(&self, id: &ExerciseID) -> Option<Exercise> {
        let mut exercises = self.get_exercises();
        let exercise = exercises.iter_mut().find(|e| &e.id == id)?;
        exercise.favorite = !exercise.favorite;
        let exercise = exercise.clone();
        let _ = log_on_error!(
            self.repository.write_exercises(&exercises),
            "update",
            "exercise"
        );
        Some(exercise)
    }
}

impl<R: WorkoutSessionRepository> WorkoutSessionService for Service<R> {
    fn get_workout_sessions(&self) -> Vec<WorkoutSession> {
        log_on_error!(
            self.repository.read_workout_sessions(),
            "get",
            "workout sessions"
        )
        .unwrap_or_default()
    }

    fn append_workout_session(&self, mut workout_session: WorkoutSession) -> WorkoutSession {
        let mut workout_sessions = self.get_workout_sessions();
        if workout_session.id.is_nil() || workout_sessions.iter().any(|s| s.id == workout_session.id)
        {
            workout_session.id = WorkoutSessionID::generate();
        }
        workout_sessions.push(workout_session.clone());
        let _ = log_on_error!(
            self.repository.write_workout_sessions(&workout_sessions),
            "append",
            "workout session"
        );
        workout_session
    }

    fn replace_workout_session(&self, workout_session: WorkoutSession) -> WorkoutSession {
        let mut workout_sessions = self.get_workout_sessions();
        let Some(existing) = workout_sessions
            .iter_mut()
            .find(|s| !s.id.is_nil() && s.id == workout_session.id)
        else {
            return self.append_workout_session(workout_session);
        };
        existing.clone_from(&workout_session);
        let _ = log_on_error!(
            self.repository.write_workout_sessions(&workout_sessions),
            "replace",
            "workout session"
        );
        workout_session
    }

    fn delete_workout_session(&self, id: WorkoutSessionID) {
        let mut workout_sessions = self.get_workout_sessions();
        let len = workout_sessions.len();
        workout_sessions.retain(|s| s.id != id);
        if workout_sessions.len() != len {
            let _ = log_on_error!(
                self.repository.write_workout_sessions(&workout_sessions),
                "delete",
                "workout session"
            );
        }
    }

    fn clear_workout_sessions(&self) {
        let _ = log_on_error!(
            self.repository.write_workout_sessions(&[]),
            "clear",
            "workout sessions"
        );
    }

    fn get_latest_workout_session(&self) -> Option<WorkoutSession> {
        self.get_workout_sessions().pop()
    }

    fn get_exercise_history(&self, key: &ExerciseKey) -> Vec<WeightRecord> {
        workout_session::exercise_history(&self.get_workout_sessions(), key)
    }

    fn get_best_weight(&self, key: &ExerciseKey) -> f32 {
        workout_session::best_weight(&self.get_workout_sessions(), key)
    }

    fn is_personal_record(&self, key: &ExerciseKey, weight: Weight) -> bool {
        let weight = f32::from(weight);
        weight > 0.0 && weight > self.get_best_weight(key)
    }

    fn get_suggested_sets(&self, key: &ExerciseKey) -> Vec<PerformedSet> {
        workout_session::suggested_sets(&self.get_workout_sessions(), key)
    }
}

impl<R: TemplateRepository> TemplateService for Service<R> {
    fn get_templates(&self) -> Vec<Template> {
        log_on_error!(self.repository.read_templates(), "get", "templates").unwrap_or_default()
    }

    fn get_template(&self, id: TemplateID) -> Option<Template> {
        self.get_templates().into_iter().find(|t| t.id == id)
    }

    fn create_template(&self, mut template: Template) -> Template {
        let mut templates = self.get_templates();
        if template.id.is_nil() || templates.iter().any(|t| t.id == template.id) {
            template.id = TemplateID::generate();
        }
        let now = Utc::now();
        template.created_at = now;
        template.updated_at = now;
        templates.push(template.clone());
        let _ = log_on_error!(
            self.repository.write_templates(&templates),
            "create",
            "template"
        );
        template
    }

    fn update_template(&self, mut template: Template) -> Template {
        let mut templates = self.get_templates();
        let Some(existing) = templates
            .iter_mut()
            .find(|t| !t.id.is_nil() && t.id == template.id)
        else {
            return self.create_template(template);
        };
        template.created_at = existing.created_at;
        template.updated_at = Utc::now();
        existing.clone_from(&template);
        let _ = log_on_error!(
            self.repository.write_templates(&templates),
            "update",
            "template"
        );
        template
    }

    fn delete_template(&self, id: TemplateID) {
        let mut templates = self.get_templates();
        let len = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() != len {
            let _ = log_on_error!(
                self.repository.write_templates(&templates),
                "delete",
                "template"
            );
        }
    }
}

impl<R: CycleRepository> CycleService for Service<R> {
    fn get_cycle(&self) -> Option<Cycle> {
        log_on_error!(self.repository.read_cycle(), "get", "cycle").unwrap_or_default()
    }

    fn start_cycle(&self, cycle: Cycle) -> Cycle {
        let _ = log_on_error!(
            self.repository.write_cycle(Some(&cycle)),
            "start",
            "cycle"
        );
        cycle
    }

    fn record_workout(&self) -> Option<Cycle> {
        self.modify_cycle(|cycle| {
            cycle.workouts_completed = cycle.workouts_completed.saturating_add(1);
        })
    }

    fn update_body_weight(&self, weight: f32) -> Option<Cycle> {
        self.modify_cycle(|cycle| cycle.current_weight = weight)
    }

    fn add_cycle_note(&self, date: NaiveDate, text: &str) -> Option<Cycle> {
        let text = text.trim();
        if text.is_empty() {
            return self.get_cycle();
        }
        self.modify_cycle(|cycle| {
            cycle.notes.push(CycleNote {
                date,
                text: text.to_string(),
            });
        })
    }

    fn add_highlight(&self, highlight: &str) -> Option<Cycle> {
        self.modify_cycle(|cycle| cycle.stats.personal_records.push(highlight.to_string()))
    }

    fn end_cycle(&self) {
        let _ = log_on_error!(self.repository.write_cycle(None), "end", "cycle");
    }
}

impl<R: CycleRepository> Service<R> {
    fn modify_cycle(&self, modify: impl FnOnce(&mut Cycle)) -> Option<Cycle> {
        let mut cycle = self.get_cycle()?;
        modify(&mut cycle);
        let _ = log_on_error!(
            self.repository.write_cycle(Some(&cycle)),
            "update",
            "cycle"
        );
        Some(cycle)
    }
}

/// Result of saving an active workout.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedWorkout {
    pub workout_session: WorkoutSession,
    pub personal_records: Vec<PersonalRecord>,
}

impl<R: WorkoutSessionRepository + CycleRepository> Service<R> {
    /// Stores the active workout as a new session.
    ///
    /// Personal records are determined against the history before the session is added. If a
    /// cycle is running, the workout is counted and the records are added to its highlights.
    pub fn finish_workout(
        &self,
        active_workout: ActiveWorkout,
        finished_at: DateTime<Utc>,
    ) -> Result<FinishedWorkout, ActiveWorkoutError> {
        let workout_session = active_workout.finish(finished_at)?;
        let personal_records =
            workout_session::personal_records(&self.get_workout_sessions(), &workout_session);
        let workout_session = self.append_workout_session(workout_session);

        self.modify_cycle(|cycle| {
            cycle.workouts_completed = cycle.workouts_completed.saturating_add(1);
            cycle
                .stats
                .personal_records
                .extend(personal_records.iter().map(ToString::to_string));
        });

        Ok(FinishedWorkout {
            workout_session,
            personal_records,
        })
    }
}
