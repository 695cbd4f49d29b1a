//! Log in, record a short session and print the history.
//!
//! Run with `RUST_LOG=debug` to see every store mutation.

use ironlog::{AuthConfig, AuthStore, SetUpdate, WorkoutStore};
use tracing_subscriber::filter::EnvFilter;

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    setup_tracing();

    let auth = AuthStore::mock(AuthConfig::default());
    let _auth_sub = auth.is_authenticated().subscribe(|authed| {
        println!("authenticated: {}", authed);
    });

    let outcome = auth.login("", "").await;
    println!("empty login -> {:?}", outcome);

    let outcome = auth.login("alice", "hunter2").await;
    println!("login -> {:?}", outcome);

    let workouts = WorkoutStore::new();
    let _active_sub = workouts.is_workout_active().subscribe(|active| {
        println!("workout active: {}", active);
    });

    workouts.start_workout();
    if let Some(bench) = workouts.add_exercise("Bench Press") {
        workouts.update_set(&bench, 1, &SetUpdate::weight(80.0).with_reps(8));
        workouts.toggle_set_complete(&bench, 1);
        if let Some(set_id) = workouts.add_set(&bench) {
            workouts.update_set(&bench, set_id, &SetUpdate::reps(6).with_completed(true));
        }
    }
    workouts.update_notes("Paused reps on the last set");
    workouts.end_workout();

    for workout in workouts.completed_workouts() {
        println!(
            "{} on {}: {} exercise(s), {:.1} kg moved",
            workout.id,
            workout.date.format("%Y-%m-%d"),
            workout.exercises.len(),
            workout.total_volume()
        );
    }

    auth.logout();
}
