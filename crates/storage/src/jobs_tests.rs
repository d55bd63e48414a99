use super::*;

fn sample_job() -> TimerJob {
    let mut job = TimerJob::new();
    job.set_delay(90);
    job.set_command("echo done");
    job.set_on_schedule("hook-sched");
    job.set_on_pause("hook-pause");
    job.set_on_resume("hook-resume");
    job.set_on_stop("hook-stop");
    job.set_on_success("hook-ok");
    job.set_on_failure("hook-fail");
    job.set_loop(true);
    job.set_one_instance(false);
    job.set_consecutive(true);
    job
}

#[test]
fn stopped_job_round_trips_all_fields() {
    let mut store = ConfigStore::new();
    let job = sample_job();

    save_job(&mut store, "Job0", &job, 5_000);
    let loaded = load_job(&store, "Job0", 6_000);

    assert_eq!(loaded.snapshot(), job.snapshot());
    // Stopped jobs never persist an expiry
    assert!(!store.contains("Job0", "Expires"));
}

#[test]
fn started_job_writes_expires() {
    let mut store = ConfigStore::new();
    let mut job = sample_job();
    job.start();
    job.tick(); // value 89

    save_job(&mut store, "Job0", &job, 1_000);
    assert_eq!(store.get_int("Job0", "Expires"), Some(1_089));
    assert_eq!(store.get_int("Job0", "State"), Some(2));
}

#[test]
fn stopping_clears_a_previous_expires_entry() {
    let mut store = ConfigStore::new();
    let mut job = sample_job();
    job.start();
    save_job(&mut store, "Job0", &job, 1_000);
    assert!(store.contains("Job0", "Expires"));

    job.stop();
    save_job(&mut store, "Job0", &job, 1_010);
    assert!(!store.contains("Job0", "Expires"));
}

#[test]
fn started_job_resumes_remaining_time_from_expires() {
    let mut store = ConfigStore::new();
    let mut job = sample_job();
    job.set_loop(false);
    job.start();
    job.tick(); // value 89

    save_job(&mut store, "Job0", &job, 1_000);

    // 30 wall-clock seconds pass before reload
    let loaded = load_job(&store, "Job0", 1_030);
    assert_eq!(loaded.state(), JobState::Started);
    assert_eq!(loaded.value(), 59); // 1089 - 1030, exact
}

#[test]
fn expired_job_keeps_stale_value_and_does_not_fire() {
    let mut store = ConfigStore::new();
    let mut job = sample_job();
    job.start();
    job.tick();

    save_job(&mut store, "Job0", &job, 1_000);

    // reload long after expiry
    let loaded = load_job(&store, "Job0", 9_999);
    assert_eq!(loaded.state(), JobState::Started);
    assert_eq!(loaded.value(), 89);
}

#[test]
fn paused_job_restores_persisted_value() {
    let mut store = ConfigStore::new();
    let mut job = sample_job();
    job.start();
    job.tick();
    job.tick();
    job.pause();

    save_job(&mut store, "Job0", &job, 1_000);
    let loaded = load_job(&store, "Job0", 50_000);

    assert_eq!(loaded.state(), JobState::Paused);
    assert_eq!(loaded.value(), 88);
}

#[test]
fn missing_entries_fall_back_to_defaults() {
    let store = ConfigStore::new();
    let job = load_job(&store, "Job3", 0);

    assert_eq!(job.delay(), 100);
    assert_eq!(job.value(), 100);
    assert_eq!(job.state(), JobState::Stopped);
    assert_eq!(job.command(), "");
    assert!(job.one_instance());
    assert!(!job.loop_enabled());
    assert!(!job.consecutive());
}

#[test]
fn malformed_entries_fall_back_to_defaults() {
    let mut store = ConfigStore::new();
    store.set_str("Job0", "Delay", "soon");
    store.set_int("Job0", "State", 17);
    store.set_int("Job0", "Value", -5);

    let job = load_job(&store, "Job0", 0);
    assert_eq!(job.delay(), 100);
    assert_eq!(job.state(), JobState::Stopped);
    assert_eq!(job.value(), 100);
}

#[test]
fn loaded_value_is_clamped_to_delay() {
    let mut store = ConfigStore::new();
    store.set_int("Job0", "Delay", 10);
    store.set_int("Job0", "Value", 600);

    let job = load_job(&store, "Job0", 0);
    assert_eq!(job.value(), 10);
}

#[test]
fn registry_round_trip_preserves_order_and_flags() {
    let mut registry = JobRegistry::new();
    registry.set_show_seconds(true);
    let a = registry.add();
    let b = registry.add();
    registry.get_mut(&a).unwrap().set_command("first");
    registry.get_mut(&b).unwrap().set_command("second");
    registry.get_mut(&b).unwrap().set_consecutive(true);

    let mut store = ConfigStore::new();
    save_registry(&mut store, &registry, 100);
    assert_eq!(store.get_int(JOBS_GROUP, "Number"), Some(2));

    let loaded = load_registry(&store, 100);
    assert_eq!(loaded.len(), 2);
    assert!(loaded.show_seconds());

    let jobs: Vec<_> = loaded.iter().collect();
    assert_eq!(jobs[0].command(), "first");
    assert_eq!(jobs[1].command(), "second");
    assert!(jobs[1].consecutive());
}

#[test]
fn stale_slots_beyond_count_are_ignored() {
    let mut store = ConfigStore::new();
    store.set_int(JOBS_GROUP, "Number", 1);
    store.set_str("Job0", "Command", "kept");
    store.set_str("Job1", "Command", "stale leftover");

    let loaded = load_registry(&store, 0);
    assert_eq!(loaded.len(), 1);
}

#[test]
fn empty_store_loads_empty_registry() {
    let loaded = load_registry(&ConfigStore::new(), 0);
    assert!(loaded.is_empty());
    assert!(!loaded.show_seconds());
}
