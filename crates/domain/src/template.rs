use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{ExerciseID, Name, PerformedExercise, PerformedSet, ReadError, WriteError};

pub trait TemplateRepository {
    fn read_templates(&self) -> Result<Vec<Template>, ReadError>;
    fn write_templates(&self, templates: &[Template]) -> Result<(), WriteError>;
}

pub trait TemplateService {
    fn get_templates(&self) -> Vec<Template>;
    fn get_template(&self, id: TemplateID) -> Option<Template>;
    /// Stores a new template. A nil or already used ID is replaced by a fresh one and both
    /// timestamps are set to the current time.
    fn create_template(&self, template: Template) -> Template;
    /// Replaces the template with the same ID and refreshes its update time. Unknown templates
    /// are created instead.
    fn update_template(&self, template: Template) -> Template;
    fn delete_template(&self, id: TemplateID);
}

/// Reusable skeleton of exercises and sets used to prefill a new workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: TemplateID,
    pub name: Name,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exercises: Vec<TemplateExercise>,
}

impl Template {
    /// Unsaved template with a nil ID.
    #[must_use]
    pub fn new(name: Name, exercises: Vec<TemplateExercise>) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateID::nil(),
            name,
            created_at: now,
            updated_at: now,
            exercises,
        }
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub exercise_id: Option<ExerciseID>,
    pub name: String,
    pub sets: Vec<PerformedSet>,
}

impl From<&PerformedExercise> for TemplateExercise {
    fn from(value: &PerformedExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.clone(),
            name: value.name.clone(),
            sets: value.sets.clone(),
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateID(Uuid);

impl TemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{PerformedExerciseID, Reps, Weight};

    use super::*;

    #[test]
    fn test_template_new() {
        let template = Template::new(Name::new("Push Day").unwrap(), vec![]);
        assert!(template.id.is_nil());
        assert_eq!(template.created_at, template.updated_at);
    }

    #[test]
    fn test_template_num_sets() {
        let set = PerformedSet::new(Reps::new(8).unwrap(), Weight::new(60.0).unwrap());
        let template = Template::new(Name::new("Pull Day").unwrap(), vec![
            TemplateExercise {
                exercise_id: Some("ex-barbell-row-bent-over".into()),
                name: "Bent Over Row".to_string(),
                sets: vec![set.clone(), set.clone(), set.clone()],
            },
            TemplateExercise {
                exercise_id: None,
                name: "Face Pull".to_string(),
                sets: vec![set],
            },
        ]);
        assert_eq!(template.num_sets(), 4);
    }

    #[test]
    fn test_template_exercise_from_performed_exercise() {
        let performed = PerformedExercise {
            id: PerformedExerciseID::generate(),
            exercise_id: Some("ex-barbell-squat-back".into()),
            name: "Back Squat".to_string(),
            sets: vec![PerformedSet::default()],
            collapsed: true,
        };
        assert_eq!(TemplateExercise::from(&performed), TemplateExercise {
            exercise_id: Some("ex-barbell-squat-back".into()),
            name: "Back Squat".to_string(),
            sets: vec![PerformedSet::default()],
        });
    }

    #[test]
    fn test_template_id_nil() {
        assert!(TemplateID::nil().is_nil());
        assert_eq!(TemplateID::nil(), TemplateID::default());
        assert!(!TemplateID::generate().is_nil());
    }
}
