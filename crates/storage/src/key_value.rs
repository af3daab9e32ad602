use std::fmt::Display;

use lift_domain::{self as domain, ReadError, WriteError};
use log::{info, log, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{Backend, Key, schema};

/// Version written into the envelope of every stored value.
pub const SCHEMA_VERSION: u64 = 1;

/// Persistence adapter storing each collection as a JSON document under a fixed key.
///
/// Every write replaces the whole document and wraps it in an envelope
/// `{"version": …, "data": …}`. Documents without envelope are treated as data of
/// earlier versions.
pub struct KeyValueStore<B> {
    backend: B,
}

impl<B: Backend> KeyValueStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the unwrapped document stored under `key`, or `None` if there is none.
    pub fn load(&self, key: Key) -> Result<Option<Value>, ReadError> {
        let Some(raw) = self.backend.get_item(key.as_ref())? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|err| ReadError::Malformed(err.to_string()))?;
        Ok(Some(unwrap_envelope(value)?))
    }

    pub fn store<T: Serialize + ?Sized>(&self, key: Key, value: &T) -> Result<(), WriteError> {
        let data =
            serde_json::to_value(value).map_err(|err| WriteError::Serialization(err.to_string()))?;
        let raw = json!({ "version": SCHEMA_VERSION, "data": data }).to_string();
        Ok(self.backend.set_item(key.as_ref(), &raw)?)
    }

    pub fn remove(&self, key: Key) -> Result<(), WriteError> {
        Ok(self.backend.remove_item(key.as_ref())?)
    }

    /// Returns the value stored under `key`, or `default` if it is absent or cannot be read.
    pub fn read<T: DeserializeOwned>(&self, key: Key, default: T) -> T {
        let result = self.load(key).and_then(|value| {
            value
                .map(|value| {
                    serde_json::from_value(value).map_err(|err| ReadError::Malformed(err.to_string()))
                })
                .transpose()
        });
        match result {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                log!(err.level(), "failed to read {}: {err}", key.as_ref());
                default
            }
        }
    }

    /// Stores `value` under `key`. Failures are logged and otherwise ignored.
    pub fn write<T: Serialize + ?Sized>(&self, key: Key, value: &T) {
        if let Err(err) = self.store(key, value) {
            log!(err.level(), "failed to write {}: {err}", key.as_ref());
        }
    }

    fn load_with_fallback(&self, key: Key, legacy_key: Key) -> Result<Option<Value>, ReadError> {
        if let Some(value) = self.load(key)? {
            return Ok(Some(value));
        }
        let value = self.load(legacy_key)?;
        if value.is_some() {
            info!("importing {} from {}", key.as_ref(), legacy_key.as_ref());
        }
        Ok(value)
    }
}

fn unwrap_envelope(value: Value) -> Result<Value, ReadError> {
    match value {
        Value::Object(mut map) if map.contains_key("version") && map.contains_key("data") => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| ReadError::Malformed("invalid schema version".to_string()))?;
            if version > SCHEMA_VERSION {
                return Err(ReadError::Malformed(format!(
                    "unsupported schema version {version}"
                )));
            }
            Ok(map.remove("data").unwrap_or_default())
        }
        value => Ok(value),
    }
}

fn decode<R, D>(value: Value, entity: &str) -> Option<D>
where
    R: DeserializeOwned + TryInto<D>,
    <R as TryInto<D>>::Error: Display,
{
    let result: Result<D, String> = serde_json::from_value::<R>(value)
        .map_err(|err| err.to_string())
        .and_then(|record| record.try_into().map_err(|err| err.to_string()));
    match result {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!("skipping invalid {entity}: {err}");
            None
        }
    }
}

fn decode_list<R, D>(value: Value, entity: &str) -> Result<Vec<D>, ReadError>
where
    R: DeserializeOwned + TryInto<D>,
    <R as TryInto<D>>::Error: Display,
{
    let Value::Array(items) = value else {
        return Err(ReadError::Malformed(format!("expected list of {entity}s")));
    };
    Ok(items
        .into_iter()
        .filter_map(|item| decode::<R, D>(item, entity))
        .collect())
}

fn decode_templates(value: Value) -> Result<Vec<domain::Template>, ReadError> {
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, item)| {
                let record = match serde_json::from_value::<schema::Template>(item) {
                    Ok(record) => record.with_key(&key),
                    Err(err) => {
                        warn!("skipping invalid template {key:?}: {err}");
                        return None;
                    }
                };
                match domain::Template::try_from(record) {
                    Ok(template) => Some(template),
                    Err(err) => {
                        warn!("skipping invalid template {key:?}: {err}");
                        None
                    }
                }
            })
            .collect()),
        value => decode_list::<schema::Template, _>(value, "template"),
    }
}

impl<B: Backend> domain::ExerciseRepository for KeyValueStore<B> {
    fn read_exercises(&self) -> Result<Option<Vec<domain::Exercise>>, ReadError> {
        self.load_with_fallback(Key::Exercises, Key::LegacyExercises)?
            .map(|value| decode_list::<schema::Exercise, _>(value, "exercise"))
            .transpose()
    }

    fn write_exercises(&self, exercises: &[domain::Exercise]) -> Result<(), WriteError> {
        self.store(
            Key::Exercises,
            &exercises
                .iter()
                .map(schema::Exercise::from)
                .collect::<Vec<_>>(),
        )
    }
}

impl<B: Backend> domain::WorkoutSessionRepository for KeyValueStore<B> {
    fn read_workout_sessions(&self) -> Result<Vec<domain::WorkoutSession>, ReadError> {
        match self.load(Key::WorkoutSessions)? {
            Some(value) => decode_list::<schema::WorkoutSession, _>(value, "workout session"),
            None => Ok(vec![]),
        }
    }

    fn write_workout_sessions(
        &self,
        workout_sessions: &[domain::WorkoutSession],
    ) -> Result<(), WriteError> {
        self.store(
            Key::WorkoutSessions,
            &workout_sessions
                .iter()
                .map(schema::WorkoutSession::from)
                .collect::<Vec<_>>(),
        )
    }
}

impl<B: Backend> domain::TemplateRepository for KeyValueStore<B> {
    fn read_templates(&self) -> Result<Vec<domain::Template>, ReadError> {
        match self.load_with_fallback(Key::Templates, Key::LegacyTemplates)? {
            Some(value) => decode_templates(value),
            None => Ok(vec![]),
        }
    }

    fn write_templates(&self, templates: &[domain::Template]) -> Result<(), WriteError> {
        self.store(
            Key::Templates,
            &templates
                .iter()
                .map(schema::Template::from)
                .collect::<Vec<_>>(),
        )
    }
}

impl<B: Backend> domain::CycleRepository for KeyValueStore<B> {
    fn read_cycle(&self) -> Result<Option<domain::Cycle>, ReadError> {
        let Some(value) = self.load(Key::Cycle)? else {
            return Ok(None);
        };
        if value.is_null() {
            return Ok(None);
        }
        let record: schema::Cycle =
            serde_json::from_value(value).map_err(|err| ReadError::Malformed(err.to_string()))?;
        Ok(Some(
            domain::Cycle::try_from(record).map_err(|err| ReadError::Malformed(err.to_string()))?,
        ))
    }

    fn write_cycle(&self, cycle: Option<&domain::Cycle>) -> Result<(), WriteError> {
        match cycle {
            Some(cycle) => self.store(Key::Cycle, &schema::Cycle::from(cycle)),
            None => self.remove(Key::Cycle),
        }
    }
}

#[cfg(test)]
mod tests {
    use lift_domain::{
        CycleRepository, ExerciseRepository, ExerciseService, StorageError, TemplateRepository,
        WorkoutSessionRepository, WorkoutSessionService,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{
        memory::MemoryStorage,
        tests::data::{CYCLE, EXERCISE, EXERCISES, TEMPLATES, WORKOUT_SESSION, WORKOUT_SESSIONS},
    };

    use super::*;

    fn store() -> KeyValueStore<MemoryStorage> {
        KeyValueStore::new(MemoryStorage::new())
    }

    fn store_with(key: Key, value: &Value) -> KeyValueStore<MemoryStorage> {
        KeyValueStore::new(MemoryStorage::new().with_item(key.as_ref(), &value.to_string()))
    }

    fn stored(store: &KeyValueStore<MemoryStorage>, key: Key) -> Option<Value> {
        store
            .backend()
            .item(key.as_ref())
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_store_writes_envelope() {
        let store = store();
        store.store(Key::Settings, &json!({"a": 1})).unwrap();

        assert_eq!(
            stored(&store, Key::Settings),
            Some(json!({"version": 1, "data": {"a": 1}}))
        );
        assert_eq!(store.load(Key::Settings).unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_load_absent() {
        assert_eq!(store().load(Key::Settings).unwrap(), None);
    }

    #[test]
    fn test_load_without_envelope() {
        let store = store_with(Key::WorkoutSessions, &json!([{"id": 1}]));
        assert_eq!(
            store.load(Key::WorkoutSessions).unwrap(),
            Some(json!([{"id": 1}]))
        );
    }

    #[rstest]
    #[case("{")]
    #[case(r#"{"version": 2, "data": []}"#)]
    #[case(r#"{"version": "1", "data": []}"#)]
    fn test_load_malformed(#[case] raw: &str) {
        let store = KeyValueStore::new(MemoryStorage::new().with_item("settings", raw));
        assert!(matches!(
            store.load(Key::Settings),
            Err(ReadError::Malformed(_))
        ));
    }

    #[test]
    fn test_read_default() {
        assert_eq!(store().read(Key::Settings, vec![1, 2]), vec![1, 2]);
        assert_eq!(
            store_with(Key::Settings, &json!("x")).read(Key::Settings, vec![1, 2]),
            vec![1, 2]
        );
        assert_eq!(
            store_with(Key::Settings, &json!({"version": 1, "data": [3]}))
                .read(Key::Settings, vec![1, 2]),
            vec![3]
        );
    }

    #[test]
    fn test_write_failure_is_ignored() {
        let store = store();
        store.backend().set_read_only(true);

        store.write(Key::Settings, &[1, 2, 3]);

        assert!(matches!(
            store.store(Key::Settings, &[1, 2, 3]),
            Err(WriteError::Storage(StorageError::QuotaExceeded))
        ));
        assert_eq!(store.load(Key::Settings).unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = store_with(Key::Cycle, &json!({}));
        store.remove(Key::Cycle).unwrap();
        assert_eq!(store.load(Key::Cycle).unwrap(), None);
    }

    #[test]
    fn test_exercises() {
        let store = store();

        assert_eq!(store.read_exercises().unwrap(), None);

        store.write_exercises(&EXERCISES).unwrap();

        assert_eq!(store.read_exercises().unwrap(), Some(EXERCISES.clone()));
    }

    #[test]
    fn test_exercises_skips_invalid_entries() {
        let store = store_with(
            Key::Exercises,
            &json!({"version": 1, "data": [
                {"id": "a", "name": ""},
                {"name": "No ID"},
                {"id": "ex-cable-triceps-pushdown-rope", "name": "Triceps Pushdown",
                 "equipmentType": "Cable", "variation": "Rope", "muscleGroup": "Triceps",
                 "userCreated": true, "favorite": true},
                42,
            ]}),
        );
        assert_eq!(store.read_exercises().unwrap(), Some(vec![EXERCISE.clone()]));
    }

    #[test]
    fn test_exercises_legacy_key() {
        let store = store_with(
            Key::LegacyExercises,
            &json!([{"id": "9b2c", "name": "Cable Fly", "equipmentType": "Cable",
                     "variation": "Cross", "muscleGroup": "Chest", "userCreated": true}]),
        );

        let exercises = store.read_exercises().unwrap().unwrap();

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].id, "9b2c".into());
        assert_eq!(exercises[0].display_name(), "Cable Fly (Cross)");
    }

    #[test]
    fn test_exercises_not_a_list() {
        let store = store_with(Key::Exercises, &json!({"version": 1, "data": {}}));
        assert!(matches!(
            store.read_exercises(),
            Err(ReadError::Malformed(_))
        ));
    }

    #[test]
    fn test_workout_sessions() {
        let store = store();

        assert_eq!(store.read_workout_sessions().unwrap(), vec![]);

        store.write_workout_sessions(&WORKOUT_SESSIONS).unwrap();

        assert_eq!(store.read_workout_sessions().unwrap(), WORKOUT_SESSIONS.clone());
    }

    #[test]
    fn test_workout_sessions_with_null_fields() {
        let store = store_with(
            Key::WorkoutSessions,
            &json!([
                {"id": 1, "name": "A", "date": "2024-03-01", "exercises": [
                    {"name": "Dip", "sets": [{"reps": 5, "weight": 100}]},
                ]},
                {"id": 2, "name": "B", "date": "2024-03-02", "exercises": null},
                {"id": 3, "name": "C", "date": "2024-03-03", "exercises": [
                    {"name": "Dip", "sets": null},
                ]},
                {"id": 4, "name": null, "date": "2024-03-04", "exercises": []},
            ]),
        );

        let workout_sessions = store.read_workout_sessions().unwrap();

        assert_eq!(workout_sessions.len(), 4);
        assert_eq!(
            domain::progress::aggregate_series(&workout_sessions)
                .iter()
                .map(|point| point.total_volume)
                .collect::<Vec<_>>(),
            vec![500.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_workout_sessions_serialization() {
        let store = store();
        store
            .write_workout_sessions(&[WORKOUT_SESSION.clone()])
            .unwrap();

        let data = &stored(&store, Key::WorkoutSessions).unwrap()["data"][0];

        assert_eq!(data["name"], json!("Leg Day"));
        assert_eq!(data["date"], json!("2024-03-04T18:00:00+00:00"));
        assert_eq!(data["duration"], json!(3300));
        assert_eq!(
            data["exercises"][0]["exerciseId"],
            json!("ex-barbell-squat-back")
        );
        assert_eq!(
            data["exercises"][0]["sets"][0],
            json!({"reps": 5, "weight": 100.0, "formRating": 7, "notes": ""})
        );
    }

    #[test]
    fn test_templates() {
        let store = store();

        assert_eq!(store.read_templates().unwrap(), vec![]);

        store.write_templates(&TEMPLATES).unwrap();

        assert_eq!(store.read_templates().unwrap(), TEMPLATES.clone());
        assert!(stored(&store, Key::Templates).unwrap()["data"].is_array());
    }

    #[test]
    fn test_templates_id_keyed_map() {
        let store = store_with(
            Key::Templates,
            &json!({
                "0d4e8f6a-96c2-4f6b-a1c1-0b7c3c9c3e51": {
                    "id": "0d4e8f6a-96c2-4f6b-a1c1-0b7c3c9c3e51",
                    "name": "Push",
                    "createdAt": "2024-05-01T10:00:00.000Z",
                    "updatedAt": "2024-05-02T10:00:00.000Z",
                    "exercises": [],
                },
                "broken": "not a template",
            }),
        );

        let templates = store.read_templates().unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(
            templates[0].id.to_string(),
            "0d4e8f6a-96c2-4f6b-a1c1-0b7c3c9c3e51"
        );
        assert_eq!(templates[0].name.as_str(), "Push");
        assert!(templates[0].updated_at > templates[0].created_at);
    }

    #[test]
    fn test_templates_legacy_name_keyed_map() {
        let store = store_with(
            Key::LegacyTemplates,
            &json!({
                "Arms": {"name": "", "exercises": [
                    {"id": 1, "name": "Biceps Curl", "sets": [{"weight": "25", "reps": "10", "formNotes": ""}]},
                ]},
                "Legs": {"exercises": []},
            }),
        );

        let templates = store.read_templates().unwrap();

        assert_eq!(
            templates
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Arms", "Legs"]
        );
        assert_eq!(templates[0].num_sets(), 1);
        assert_eq!(store.read_templates().unwrap(), templates);
    }

    #[test]
    fn test_templates_prefer_current_key() {
        let store = KeyValueStore::new(
            MemoryStorage::new()
                .with_item("templates", &json!({"Old": {"exercises": []}}).to_string())
                .with_item("workoutTemplates", &json!({"version": 1, "data": []}).to_string()),
        );
        assert_eq!(store.read_templates().unwrap(), vec![]);
    }

    #[test]
    fn test_cycle() {
        let store = store();

        assert_eq!(store.read_cycle().unwrap(), None);

        store.write_cycle(Some(&CYCLE)).unwrap();
        assert_eq!(store.read_cycle().unwrap(), Some(CYCLE.clone()));

        store.write_cycle(None).unwrap();
        assert_eq!(store.read_cycle().unwrap(), None);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn test_cycle_malformed() {
        let store = store_with(Key::Cycle, &json!({"name": "", "startDate": "2024-01-01"}));
        assert!(matches!(store.read_cycle(), Err(ReadError::Malformed(_))));
    }

    #[test]
    fn test_service_seeds_and_persists_exercises() {
        let service = domain::Service::new(store());

        let exercises = service.get_exercises();

        assert_eq!(exercises, domain::catalog::default_exercises());
        assert_eq!(service.get_exercises(), exercises);
    }

    #[test]
    fn test_service_recovers_from_malformed_history() {
        let service = domain::Service::new(KeyValueStore::new(
            MemoryStorage::new().with_item("workouts", "[{"),
        ));

        assert!(service.get_workout_sessions().is_empty());

        let appended = service.append_workout_session(WORKOUT_SESSION.clone());
        assert_eq!(service.get_workout_sessions(), vec![appended]);
    }
}
