//! Persisted record types.
//!
//! Records are decoded leniently: missing or null fields take defaults, numbers may be given as numbers
//! or numeric strings, and identifiers of earlier versions are mapped deterministically to
//! UUIDs. The conversion into domain types fills all remaining gaps, so that the domain never
//! sees incomplete data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use lift_domain as domain;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Exercise {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub equipment_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub variation: String,
    #[serde(deserialize_with = "string_or_number")]
    pub muscle_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_created: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite: bool,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.to_string(),
            equipment_type: value.equipment.to_string(),
            variation: value.variation.clone(),
            muscle_group: value.muscle_group.to_string(),
            user_created: value.user_created,
            favorite: value.favorite,
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ExerciseError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        let id = domain::ExerciseID::from(value.id.trim());
        if id.is_empty() {
            return Err(ExerciseError::MissingID);
        }
        Ok(Self {
            id,
            name: domain::Name::new(&value.name)?,
            equipment: domain::Equipment::try_from(value.equipment_type.as_str())
                .unwrap_or_default(),
            variation: value.variation.trim().to_string(),
            muscle_group: domain::MuscleGroup::try_from(value.muscle_group.as_str())
                .unwrap_or_default(),
            user_created: value.user_created,
            favorite: value.favorite,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseError {
    #[error("missing exercise id")]
    MissingID,
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkoutSession {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub saved_at: Option<String>,
    /// Seconds
    #[serde(deserialize_with = "lenient_u32")]
    pub duration: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub exercises: Vec<PerformedExercise>,
}

impl From<&domain::WorkoutSession> for WorkoutSession {
    fn from(value: &domain::WorkoutSession) -> Self {
        Self {
            id: (*value.id).to_string(),
            name: value.name.to_string(),
            date: value.date.to_rfc3339(),
            saved_at: None,
            duration: u32::try_from(value.duration.num_seconds()).ok(),
            exercises: value
                .exercises
                .iter()
                .map(PerformedExercise::from)
                .collect(),
        }
    }
}

impl From<WorkoutSession> for domain::WorkoutSession {
    fn from(value: WorkoutSession) -> Self {
        let date = parse_date_time(&value.date)
            .or_else(|| value.saved_at.as_deref().and_then(parse_date_time))
            .or_else(|| {
                value
                    .id
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis)
            })
            .unwrap_or_default();
        let id = if value.id.trim().is_empty() {
            legacy_uuid(&format!("{}|{}", value.date, value.name))
        } else {
            parse_uuid(&value.id)
        };
        Self {
            id: id.into(),
            name: domain::Name::new(&value.name)
                .unwrap_or_else(|_| domain::WorkoutSession::default_name(date)),
            date,
            duration: Duration::seconds(i64::from(value.duration.unwrap_or_default())),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::PerformedExercise::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformedExercise {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub exercise_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sets: Vec<PerformedSet>,
    #[serde(deserialize_with = "null_as_default")]
    pub collapsed: bool,
}

impl From<&domain::PerformedExercise> for PerformedExercise {
    fn from(value: &domain::PerformedExercise) -> Self {
        Self {
            id: (*value.id).to_string(),
            exercise_id: value.exercise_id.as_ref().map(ToString::to_string),
            name: value.name.clone(),
            sets: value.sets.iter().map(PerformedSet::from).collect(),
            collapsed: value.collapsed,
        }
    }
}

impl From<PerformedExercise> for domain::PerformedExercise {
    fn from(value: PerformedExercise) -> Self {
        Self {
            id: if value.id.trim().is_empty() {
                domain::PerformedExerciseID::generate()
            } else {
                parse_uuid(&value.id).into()
            },
            exercise_id: value
                .exercise_id
                .map(|id| domain::ExerciseID::from(id.trim()))
                .filter(|id| !id.is_empty()),
            name: value.name.trim().to_string(),
            sets: value
                .sets
                .into_iter()
                .map(domain::PerformedSet::from)
                .collect(),
            collapsed: value.collapsed,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformedSet {
    #[serde(deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(deserialize_with = "lenient_f32", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    #[serde(deserialize_with = "lenient_u8")]
    pub form_rating: Option<u8>,
    #[serde(alias = "formNotes", deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

impl From<&domain::PerformedSet> for PerformedSet {
    fn from(value: &domain::PerformedSet) -> Self {
        Self {
            reps: value.reps.map(u32::from),
            weight: value.weight.map(f32::from),
            form_rating: Some(u8::from(value.form_rating)),
            notes: Some(value.notes.clone()),
        }
    }
}

impl From<PerformedSet> for domain::PerformedSet {
    fn from(value: PerformedSet) -> Self {
        Self {
            reps: value.reps.and_then(|reps| domain::Reps::new(reps).ok()),
            weight: value
                .weight
                .and_then(|weight| domain::Weight::new(weight).ok()),
            form_rating: value
                .form_rating
                .and_then(|form_rating| domain::FormRating::new(form_rating).ok())
                .unwrap_or_default(),
            notes: value.notes.unwrap_or_default(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Template {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub created_at: String,
    #[serde(deserialize_with = "string_or_number")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub exercises: Vec<TemplateExercise>,
}

impl Template {
    /// Fills a missing ID or name from the key of a map-shaped template collection.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        if self.id.trim().is_empty() {
            self.id = key.to_string();
        }
        if self.name.trim().is_empty() {
            self.name = key.to_string();
        }
        self
    }
}

impl From<&domain::Template> for Template {
    fn from(value: &domain::Template) -> Self {
        Self {
            id: (*value.id).to_string(),
            name: value.name.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
            exercises: value
                .exercises
                .iter()
                .map(TemplateExercise::from)
                .collect(),
        }
    }
}

impl TryFrom<Template> for domain::Template {
    type Error = TemplateError;

    fn try_from(value: Template) -> Result<Self, Self::Error> {
        if value.id.trim().is_empty() {
            return Err(TemplateError::MissingID);
        }
        let created_at = parse_date_time(&value.created_at).unwrap_or_default();
        Ok(Self {
            id: parse_uuid(&value.id).into(),
            name: domain::Name::new(&value.name)?,
            created_at,
            updated_at: parse_date_time(&value.updated_at).unwrap_or(created_at),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::TemplateExercise::from)
                .collect(),
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("missing template id")]
    MissingID,
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateExercise {
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub exercise_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sets: Vec<PerformedSet>,
}

impl From<&domain::TemplateExercise> for TemplateExercise {
    fn from(value: &domain::TemplateExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.as_ref().map(ToString::to_string),
            name: value.name.clone(),
            sets: value.sets.iter().map(PerformedSet::from).collect(),
        }
    }
}

impl From<TemplateExercise> for domain::TemplateExercise {
    fn from(value: TemplateExercise) -> Self {
        Self {
            exercise_id: value
                .exercise_id
                .map(|id| domain::ExerciseID::from(id.trim()))
                .filter(|id| !id.is_empty()),
            name: value.name.trim().to_string(),
            sets: value
                .sets
                .into_iter()
                .map(domain::PerformedSet::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub name: String,
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub starting_weight: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub current_weight: Option<f32>,
    #[serde(
        default,
        deserialize_with = "lenient_f32",
        skip_serializing_if = "Option::is_none"
    )]
    pub goal_weight: Option<f32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub workouts_goal: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub workouts_completed: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<CycleNote>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stats: CycleStats,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CycleNote {
    #[serde(deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub text: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CycleStats {
    #[serde(deserialize_with = "null_as_default")]
    pub pr_list: Vec<String>,
}

impl From<&domain::Cycle> for Cycle {
    fn from(value: &domain::Cycle) -> Self {
        Self {
            name: value.name.to_string(),
            start_date: value.start_date.to_string(),
            starting_weight: Some(value.starting_weight),
            current_weight: Some(value.current_weight),
            goal_weight: value.goal_weight,
            workouts_goal: Some(value.workouts_goal),
            workouts_completed: Some(value.workouts_completed),
            notes: value
                .notes
                .iter()
                .map(|note| CycleNote {
                    date: note.date.to_string(),
                    text: note.text.clone(),
                })
                .collect(),
            stats: CycleStats {
                pr_list: value.stats.personal_records.clone(),
            },
        }
    }
}

impl TryFrom<Cycle> for domain::Cycle {
    type Error = CycleError;

    fn try_from(value: Cycle) -> Result<Self, Self::Error> {
        let start_date = parse_date(&value.start_date)
            .ok_or_else(|| CycleError::InvalidStartDate(value.start_date.clone()))?;
        let starting_weight = value.starting_weight.unwrap_or_default();
        Ok(Self {
            name: domain::Name::new(&value.name)?,
            start_date,
            starting_weight,
            current_weight: value.current_weight.unwrap_or(starting_weight),
            goal_weight: value.goal_weight,
            workouts_goal: value
                .workouts_goal
                .unwrap_or(domain::DEFAULT_WORKOUTS_GOAL),
            workouts_completed: value.workouts_completed.unwrap_or_default(),
            notes: value
                .notes
                .into_iter()
                .filter_map(|note| {
                    Some(domain::CycleNote {
                        date: parse_date(&note.date)?,
                        text: note.text,
                    })
                })
                .collect(),
            stats: domain::CycleStats {
                personal_records: value.stats.pr_list,
            },
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CycleError {
    #[error("invalid start date: {0:?}")]
    InvalidStartDate(String),
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
}

/// Deterministic UUID for identifiers of earlier versions that are no UUIDs.
#[must_use]
pub fn legacy_uuid(value: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, value.as_bytes())
}

fn parse_uuid(value: &str) -> Uuid {
    Uuid::parse_str(value.trim()).unwrap_or_else(|_| legacy_uuid(value.trim()))
}

fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|date_time| date_time.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            parse_date(value)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|date_time| date_time.and_utc())
        })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => value,
        Some(Value::Number(value)) => value.to_string(),
        _ => String::new(),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_u64().and_then(|value| u32::try_from(value).ok()),
        Some(Value::String(value)) => value.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?.and_then(|value| u8::try_from(value).ok()))
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_f64().map(|value| value as f32),
        Some(Value::String(value)) => value.trim().parse::<f32>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite()))
}
