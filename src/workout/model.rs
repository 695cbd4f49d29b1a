use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One set of an exercise. `id` is 1-based and only unique within its
/// exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: u32,
    pub weight: f64,
    pub reps: u32,
    pub completed: bool,
    pub previous_weight: Option<f64>,
    pub previous_reps: Option<u32>,
}

impl WorkoutSet {
    /// An incomplete set with no previous performance attached.
    pub fn new(id: u32, weight: f64, reps: u32) -> Self {
        Self {
            id,
            weight,
            reps,
            completed: false,
            previous_weight: None,
            previous_reps: None,
        }
    }

    /// Id for a set appended after `count` existing ones, saturating at
    /// `u32::MAX`.
    pub fn id_after(count: usize) -> u32 {
        u32::try_from(count).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    /// Weight moved by this set.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }

    /// Copy with `update` applied field by field.
    pub fn merged(&self, update: &SetUpdate) -> Self {
        Self {
            id: self.id,
            weight: update.weight.unwrap_or(self.weight),
            reps: update.reps.unwrap_or(self.reps),
            completed: update.completed.unwrap_or(self.completed),
            previous_weight: update.previous_weight.unwrap_or(self.previous_weight),
            previous_reps: update.previous_reps.unwrap_or(self.previous_reps),
        }
    }
}

/// Partial update for a [`WorkoutSet`]. `None` leaves a field as it is.
///
/// The outer `Option` on the `previous_*` fields selects whether to touch
/// them; the inner one is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    // Untouched fields must be omitted; a written `null` means "clear"
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub previous_weight: Option<Option<f64>>,
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub previous_reps: Option<Option<u32>>,
}

impl SetUpdate {
    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn reps(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Distinguishes an absent key (leave alone) from an explicit null (clear).
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: Vec<Arc<WorkoutSet>>,
}

impl Exercise {
    /// A new exercise always starts with one empty set.
    pub fn new(id: String, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sets: vec![Arc::new(WorkoutSet::new(1, 0.0, 0))],
        }
    }

    pub fn find_set(&self, set_id: u32) -> Option<&Arc<WorkoutSet>> {
        self.sets.iter().find(|set| set.id == set_id)
    }

    pub fn last_set(&self) -> Option<&Arc<WorkoutSet>> {
        self.sets.last()
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|set| set.completed).count()
    }

    /// Volume over completed sets only.
    pub fn volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|set| set.completed)
            .map(|set| set.volume())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Milliseconds since the Unix epoch.
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub notes: String,
    pub exercises: Vec<Arc<Exercise>>,
}

impl Workout {
    /// An empty, in-progress workout starting at `started`.
    pub fn new(id: String, started: DateTime<Utc>) -> Self {
        Self {
            id,
            date: started,
            start_time: started.timestamp_millis(),
            end_time: None,
            notes: String::new(),
            exercises: Vec::new(),
        }
    }

    pub fn find_exercise(&self, exercise_id: &str) -> Option<&Arc<Exercise>> {
        self.exercises.iter().find(|exercise| exercise.id == exercise_id)
    }

    /// Whole seconds between the start and `now`, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let elapsed_ms = now.timestamp_millis() - self.start_time;
        u64::try_from(elapsed_ms / 1000).unwrap_or(0)
    }

    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(|exercise| exercise.volume()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn started() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 17, 45, 0).unwrap()
    }

    #[test]
    fn new_exercise_has_one_empty_set() {
        let exercise = Exercise::new("exercise-1".to_string(), "Bench");
        assert_eq!(exercise.sets.len(), 1);
        assert_eq!(*exercise.sets[0], WorkoutSet::new(1, 0.0, 0));
    }

    #[test]
    fn merge_overwrites_only_given_fields() {
        let set = WorkoutSet {
            previous_weight: Some(95.0),
            ..WorkoutSet::new(2, 100.0, 5)
        };

        let merged = set.merged(&SetUpdate::reps(8).with_completed(true));
        assert_eq!(merged.weight, 100.0);
        assert_eq!(merged.reps, 8);
        assert!(merged.completed);
        assert_eq!(merged.previous_weight, Some(95.0));

        let cleared = set.merged(&SetUpdate {
            previous_weight: Some(None),
            ..SetUpdate::default()
        });
        assert_eq!(cleared.previous_weight, None);
        assert_eq!(cleared.id, 2);
    }

    #[test]
    fn set_update_json_distinguishes_null_from_missing() {
        let update: SetUpdate =
            serde_json::from_str(r#"{"weight": 62.5, "previousReps": null}"#).unwrap();
        assert_eq!(update.weight, Some(62.5));
        assert_eq!(update.previous_reps, Some(None));
        assert_eq!(update.previous_weight, None);
        assert!(!update.is_empty());
        assert!(SetUpdate::default().is_empty());
    }

    #[test]
    fn set_update_survives_json_round_trip() {
        let set = WorkoutSet {
            previous_weight: Some(75.0),
            previous_reps: Some(6),
            ..WorkoutSet::new(1, 70.0, 6)
        };
        let update = SetUpdate::weight(80.0);

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"weight":80.0}"#);

        let back: SetUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
        assert_eq!(set.merged(&back), set.merged(&update));
        assert_eq!(set.merged(&back).previous_weight, Some(75.0));

        let clearing = SetUpdate {
            previous_reps: Some(None),
            ..SetUpdate::default()
        };
        let json = serde_json::to_string(&clearing).unwrap();
        assert_eq!(json, r#"{"previousReps":null}"#);
        let back: SetUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clearing);
    }

    #[test]
    fn set_ids_saturate_instead_of_wrapping() {
        assert_eq!(WorkoutSet::id_after(0), 1);
        assert_eq!(WorkoutSet::id_after(2), 3);
        assert_eq!(WorkoutSet::id_after(u32::MAX as usize), u32::MAX);
        assert_eq!(WorkoutSet::id_after(usize::MAX), u32::MAX);
    }

    #[test]
    fn elapsed_is_whole_seconds_and_clamped() {
        let workout = Workout::new("workout-1".to_string(), started());
        assert_eq!(workout.elapsed_secs(started() + Duration::milliseconds(1999)), 1);
        assert_eq!(workout.elapsed_secs(started() + Duration::minutes(2)), 120);
        assert_eq!(workout.elapsed_secs(started() - Duration::seconds(5)), 0);
    }

    #[test]
    fn volume_counts_completed_sets() {
        let mut exercise = Exercise::new("exercise-1".to_string(), "Squat");
        exercise.sets = vec![
            Arc::new(WorkoutSet {
                completed: true,
                ..WorkoutSet::new(1, 100.0, 5)
            }),
            Arc::new(WorkoutSet::new(2, 100.0, 5)),
        ];
        assert_eq!(exercise.completed_sets(), 1);
        assert_eq!(exercise.volume(), 500.0);

        let mut workout = Workout::new("workout-1".to_string(), started());
        workout.exercises.push(Arc::new(exercise));
        assert_eq!(workout.total_volume(), 500.0);
    }

    #[test]
    fn workout_serializes_camel_case() {
        let workout = Workout::new("workout-1".to_string(), started());
        let json = serde_json::to_value(&workout).unwrap();
        assert_eq!(json["startTime"], started().timestamp_millis());
        assert!(json["endTime"].is_null());
        assert_eq!(json["exercises"], serde_json::json!([]));
    }
}
