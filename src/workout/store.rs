use std::sync::Arc;
use tracing::{debug, info, warn};

use super::model::{Exercise, SetUpdate, Workout, WorkoutSet};
use crate::runtime::{Clock, IdGenerator, SystemClock};
use crate::store::{Derived, Readable, Store};

/// The in-progress workout and the log of finished ones.
///
/// Every mutator replaces only the path from the workout down to the node it
/// touches; untouched exercises and sets keep their `Arc` identity. Calls that
/// reference a missing workout, exercise or set are ignored: the value is not
/// replaced and nobody is notified.
///
/// # Examples
///
/// ```
/// use ironlog::WorkoutStore;
///
/// let workouts = WorkoutStore::new();
/// workouts.start_workout();
/// let bench = workouts.add_exercise("Bench").unwrap();
/// workouts.add_set(&bench);
/// workouts.end_workout();
///
/// let history = workouts.completed_workouts();
/// assert_eq!(history.len(), 1);
/// assert_eq!(history[0].exercises[0].sets.len(), 2);
/// ```
pub struct WorkoutStore {
    current: Store<Option<Arc<Workout>>>,
    history: Store<Vec<Arc<Workout>>>,
    duration: Derived<u64>,
    is_active: Derived<bool>,
    clock: Arc<dyn Clock>,
    workout_ids: IdGenerator,
    exercise_ids: IdGenerator,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_runtime(clock, IdGenerator::new("workout"), IdGenerator::new("exercise"))
    }

    pub fn with_runtime(
        clock: Arc<dyn Clock>,
        workout_ids: IdGenerator,
        exercise_ids: IdGenerator,
    ) -> Self {
        let current = Store::new(None);
        let history = Store::new(Vec::new());

        let duration_clock = Arc::clone(&clock);
        let duration = Derived::new(&current, move |workout: &Option<Arc<Workout>>| {
            workout
                .as_ref()
                .map_or(0, |workout| workout.elapsed_secs(duration_clock.now()))
        });
        let is_active = Derived::new(&current, |workout: &Option<Arc<Workout>>| workout.is_some());

        Self {
            current,
            history,
            duration,
            is_active,
            clock,
            workout_ids,
            exercise_ids,
        }
    }

    /// Begin a new, empty workout and return its id.
    ///
    /// An unfinished workout is discarded, not saved to history.
    pub fn start_workout(&self) -> String {
        let workout = Workout::new(self.workout_ids.next_id(), self.clock.now());
        let id = workout.id.clone();

        if let Some(previous) = self.current.get() {
            warn!(discarded = %previous.id, "starting a workout discarded an unfinished one");
        }
        info!(workout_id = %id, "workout started");
        self.current.set(Some(Arc::new(workout)));
        id
    }

    /// Stamp the end time, prepend the workout to history and clear it.
    ///
    /// The workout is taken out of the current slot under its lock, so
    /// concurrent callers finish it at most once.
    pub fn end_workout(&self) -> bool {
        let mut taken = None;
        self.current.modify(|current| {
            taken = Some(Arc::clone(current.as_ref()?));
            Some(None)
        });
        let Some(workout) = taken else {
            debug!("end_workout ignored: no workout in progress");
            return false;
        };

        let completed = Arc::new(Workout {
            end_time: Some(self.clock.now().timestamp_millis()),
            ..(*workout).clone()
        });
        info!(
            workout_id = %completed.id,
            exercises = completed.exercises.len(),
            "workout finished"
        );

        self.history.update(|history| history.insert(0, completed));
        true
    }

    /// Append an exercise with one empty set; returns its id.
    pub fn add_exercise(&self, name: &str) -> Option<String> {
        let mut added = None;
        self.modify_workout("add_exercise", |workout| {
            let exercise = Exercise::new(self.exercise_ids.next_id(), name);
            added = Some(exercise.id.clone());

            let mut next = workout.clone();
            next.exercises.push(Arc::new(exercise));
            Some(next)
        });
        added
    }

    pub fn remove_exercise(&self, exercise_id: &str) -> bool {
        self.modify_workout("remove_exercise", |workout| {
            workout.find_exercise(exercise_id)?;

            let mut next = workout.clone();
            next.exercises.retain(|exercise| exercise.id != exercise_id);
            Some(next)
        })
    }

    /// Append a set that copies the last set's weight and reps; returns the
    /// new set's id.
    pub fn add_set(&self, exercise_id: &str) -> Option<u32> {
        let mut added = None;
        self.modify_exercise("add_set", exercise_id, |exercise| {
            let (weight, reps) = exercise
                .last_set()
                .map_or((0.0, 0), |last| (last.weight, last.reps));
            let id = WorkoutSet::id_after(exercise.sets.len());
            let set = WorkoutSet::new(id, weight, reps);
            added = Some(set.id);

            let mut next = exercise.clone();
            next.sets.push(Arc::new(set));
            Some(next)
        });
        added
    }

    pub fn update_set(&self, exercise_id: &str, set_id: u32, update: &SetUpdate) -> bool {
        self.modify_set("update_set", exercise_id, set_id, |set| set.merged(update))
    }

    pub fn toggle_set_complete(&self, exercise_id: &str, set_id: u32) -> bool {
        self.modify_set("toggle_set_complete", exercise_id, set_id, |set| WorkoutSet {
            completed: !set.completed,
            ..set.clone()
        })
    }

    /// Replace the notes wholesale.
    pub fn update_notes(&self, notes: &str) -> bool {
        self.modify_workout("update_notes", |workout| {
            let mut next = workout.clone();
            next.notes = notes.to_string();
            Some(next)
        })
    }

    /// Observable in-progress workout.
    pub fn current_workout(
        &self,
    ) -> impl Readable<Option<Arc<Workout>>> + Clone + Send + Sync + 'static {
        self.current.clone()
    }

    /// Observable history, most recent first.
    pub fn history(&self) -> impl Readable<Vec<Arc<Workout>>> + Clone + Send + Sync + 'static {
        self.history.clone()
    }

    /// Elapsed seconds as of the last change to the current workout.
    ///
    /// `get()` on this value can be stale: it is only recomputed when the
    /// current workout changes, so thirty idle seconds into a workout it
    /// still reads 0. Use [`WorkoutStore::elapsed_secs`] for a reading taken
    /// now.
    pub fn workout_duration(&self) -> Derived<u64> {
        self.duration.clone()
    }

    pub fn is_workout_active(&self) -> Derived<bool> {
        self.is_active.clone()
    }

    /// Elapsed seconds of the current workout measured at call time, 0 when
    /// idle.
    pub fn elapsed_secs(&self) -> u64 {
        self.current.read(|workout| {
            workout
                .as_ref()
                .map_or(0, |workout| workout.elapsed_secs(self.clock.now()))
        })
    }

    pub fn current(&self) -> Option<Arc<Workout>> {
        self.current.get()
    }

    pub fn completed_workouts(&self) -> Vec<Arc<Workout>> {
        self.history.get()
    }

    fn modify_workout<F>(&self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&Workout) -> Option<Workout>,
    {
        let changed = self.current.modify(|current| {
            let workout = current.as_ref()?;
            f(&**workout).map(|next| Some(Arc::new(next)))
        });
        if changed {
            debug!(op, "workout updated");
        } else {
            debug!(op, "ignored: no matching workout, exercise or set");
        }
        changed
    }

    fn modify_exercise<F>(&self, op: &'static str, exercise_id: &str, f: F) -> bool
    where
        F: FnOnce(&Exercise) -> Option<Exercise>,
    {
        self.modify_workout(op, |workout| {
            let index = workout
                .exercises
                .iter()
                .position(|exercise| exercise.id == exercise_id)?;
            let exercise = f(&*workout.exercises[index])?;

            let mut next = workout.clone();
            next.exercises[index] = Arc::new(exercise);
            Some(next)
        })
    }

    fn modify_set<F>(&self, op: &'static str, exercise_id: &str, set_id: u32, f: F) -> bool
    where
        F: FnOnce(&WorkoutSet) -> WorkoutSet,
    {
        self.modify_exercise(op, exercise_id, |exercise| {
            let index = exercise.sets.iter().position(|set| set.id == set_id)?;
            let set = f(&*exercise.sets[index]);

            let mut next = exercise.clone();
            next.sets[index] = Arc::new(set);
            Some(next)
        })
    }
}

impl Default for WorkoutStore {
    fn default() -> Self {
        Self::new()
    }
}
