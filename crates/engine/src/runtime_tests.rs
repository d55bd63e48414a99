use super::*;
use crate::spawn::fake::FakeProcessAdapter;
use fuse_core::{FakeClock, JobState};
use std::time::Duration;

type TestEngine = Engine<FakeProcessAdapter, FakeClock>;

fn engine() -> (TestEngine, FakeProcessAdapter, FakeClock) {
    let adapter = FakeProcessAdapter::new();
    let clock = FakeClock::new();
    let engine = Engine::new(adapter.clone(), clock.clone());
    (engine, adapter, clock)
}

fn drain(rx: &mut EventReceiver) -> Vec<JobEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn names(events: &[JobEvent]) -> Vec<&'static str> {
    events.iter().map(JobEvent::name).collect()
}

/// Arm a job: delay in seconds, a command, started
async fn armed(engine: &mut TestEngine, delay: u32, command: &str) -> JobId {
    let id = engine.add_job();
    engine.set_delay(&id, delay).await.unwrap();
    engine.set_command(&id, command).await.unwrap();
    engine.start(&id).await.unwrap();
    id
}

async fn advance_and_poll(engine: &mut TestEngine, clock: &FakeClock, secs: u64) {
    for _ in 0..secs {
        clock.advance(Duration::from_secs(1));
        engine.poll().await;
    }
}

#[tokio::test]
async fn add_job_emits_changed_and_has_defaults() {
    let (mut engine, _adapter, _clock) = engine();
    let mut rx = engine.subscribe();

    let id = engine.add_job();
    let events = drain(&mut rx);
    assert_eq!(names(&events), vec!["changed"]);

    let job = engine.job(&id).unwrap();
    assert_eq!(job.delay(), 100);
    assert_eq!(job.value(), 100);
    assert_eq!(job.state(), JobState::Stopped);
    assert!(job.one_instance());
}

#[tokio::test]
async fn unknown_job_is_an_error() {
    let (mut engine, _adapter, _clock) = engine();
    let bogus = JobId::from("nope");
    let err = engine.start(&bogus).await.unwrap_err();
    assert!(matches!(err, EngineError::JobNotFound(_)));
}

#[tokio::test]
async fn countdown_decrements_once_per_second() {
    let (mut engine, _adapter, clock) = engine();
    let id = armed(&mut engine, 5, "true").await;

    advance_and_poll(&mut engine, &clock, 2).await;
    assert_eq!(engine.job(&id).unwrap().value(), 3);
    assert_eq!(engine.job(&id).unwrap().state(), JobState::Started);
}

#[tokio::test]
async fn fires_at_zero_then_stops_and_resets() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 2, "echo go").await;
    drain(&mut rx);

    advance_and_poll(&mut engine, &clock, 2).await;

    let spawns = adapter.spawns();
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].job, id);
    assert_eq!(spawns[0].command, "echo go");

    let events = drain(&mut rx);
    assert!(names(&events).contains(&"fired"));

    let job = engine.job(&id).unwrap();
    assert_eq!(job.state(), JobState::Stopped);
    assert_eq!(job.value(), 2);
}

#[tokio::test]
async fn no_tick_before_start() {
    let (mut engine, adapter, clock) = engine();
    let id = engine.add_job();
    engine.set_delay(&id, 1).await.unwrap();
    engine.set_command(&id, "true").await.unwrap();

    advance_and_poll(&mut engine, &clock, 3).await;
    assert_eq!(engine.job(&id).unwrap().value(), 1);
    assert!(adapter.spawns().is_empty());
}

#[tokio::test]
async fn looping_job_stays_started() {
    let (mut engine, adapter, clock) = engine();
    let id = armed(&mut engine, 2, "true").await;
    engine.set_loop(&id, true).await.unwrap();
    engine.set_one_instance(&id, false).await.unwrap();

    advance_and_poll(&mut engine, &clock, 4).await;

    assert_eq!(adapter.spawns().len(), 2);
    let job = engine.job(&id).unwrap();
    assert_eq!(job.state(), JobState::Started);
    assert_eq!(job.value(), 2);
}

#[tokio::test]
async fn one_instance_suppresses_overlapping_spawn() {
    let (mut engine, adapter, clock) = engine();
    let id = armed(&mut engine, 1, "true").await;
    engine.set_loop(&id, true).await.unwrap();

    // First fire spawns; second fire is suppressed while it still runs
    advance_and_poll(&mut engine, &clock, 2).await;
    assert_eq!(adapter.spawns().len(), 1);

    adapter.complete(adapter.spawns()[0].handle, true);
    engine.poll().await;
    advance_and_poll(&mut engine, &clock, 1).await;
    assert_eq!(adapter.spawns().len(), 2);
    let _ = id;
}

#[tokio::test]
async fn pause_stops_ticking_and_keeps_value() {
    let (mut engine, _adapter, clock) = engine();
    let id = armed(&mut engine, 5, "true").await;

    advance_and_poll(&mut engine, &clock, 2).await;
    engine.pause(&id).await.unwrap();
    advance_and_poll(&mut engine, &clock, 3).await;

    let job = engine.job(&id).unwrap();
    assert_eq!(job.state(), JobState::Paused);
    assert_eq!(job.value(), 3);
}

#[tokio::test]
async fn pause_then_restart_keeps_single_tick_rate() {
    let (mut engine, _adapter, clock) = engine();
    let id = armed(&mut engine, 8, "true").await;

    advance_and_poll(&mut engine, &clock, 1).await;
    engine.pause(&id).await.unwrap();
    engine.start(&id).await.unwrap();

    // one second, one decrement: the pre-pause source is gone
    advance_and_poll(&mut engine, &clock, 1).await;
    assert_eq!(engine.job(&id).unwrap().value(), 6);
}

#[tokio::test]
async fn stop_then_restart_keeps_single_tick_rate() {
    let (mut engine, _adapter, clock) = engine();
    let id = armed(&mut engine, 8, "true").await;

    advance_and_poll(&mut engine, &clock, 1).await;
    engine.stop(&id).await.unwrap();
    engine.start(&id).await.unwrap();

    advance_and_poll(&mut engine, &clock, 2).await;
    assert_eq!(engine.job(&id).unwrap().value(), 6);
}

#[tokio::test]
async fn resume_runs_resume_hook_not_schedule_hook() {
    let (mut engine, adapter, clock) = engine();
    let id = armed(&mut engine, 5, "true").await;
    engine.set_on_schedule(&id, "hook sched").await.unwrap();
    engine.set_on_resume(&id, "hook resume").await.unwrap();

    advance_and_poll(&mut engine, &clock, 1).await;
    engine.pause(&id).await.unwrap();
    engine.start(&id).await.unwrap();

    assert_eq!(adapter.hooks(), vec!["hook resume".to_string()]);
}

#[tokio::test]
async fn success_completion_runs_success_hook() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 1, "true").await;
    engine.set_on_success(&id, "hook ok").await.unwrap();
    drain(&mut rx);

    advance_and_poll(&mut engine, &clock, 1).await;
    adapter.complete(adapter.spawns()[0].handle, true);
    engine.poll().await;

    assert!(adapter.hooks().contains(&"hook ok".to_string()));
    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, JobEvent::Finished { error: false, .. })));
    assert!(!names(&events).contains(&"error"));
}

#[tokio::test]
async fn failed_completion_emits_error_and_runs_failure_hook() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 1, "true").await;
    engine.set_on_failure(&id, "hook bad").await.unwrap();
    drain(&mut rx);

    advance_and_poll(&mut engine, &clock, 1).await;
    adapter.complete(adapter.spawns()[0].handle, false);
    engine.poll().await;

    assert!(adapter.hooks().contains(&"hook bad".to_string()));
    let events = drain(&mut rx);
    assert!(names(&events).contains(&"error"));
    assert!(events
        .iter()
        .any(|e| matches!(e, JobEvent::Finished { error: true, .. })));
}

#[tokio::test]
async fn spawn_failure_reports_error_and_finished() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 1, "doesnotexist").await;
    adapter.fail_spawns();
    drain(&mut rx);

    advance_and_poll(&mut engine, &clock, 1).await;
    engine.poll().await;

    let events = drain(&mut rx);
    assert!(names(&events).contains(&"error"));
    assert!(events
        .iter()
        .any(|e| matches!(e, JobEvent::Finished { error: true, .. })));
    assert!(engine.job(&id).unwrap().handles().is_empty());
}

#[tokio::test]
async fn empty_command_fire_is_a_no_op() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 1, "  ").await;
    drain(&mut rx);

    advance_and_poll(&mut engine, &clock, 1).await;

    assert!(adapter.spawns().is_empty());
    let events = drain(&mut rx);
    assert!(!names(&events).contains(&"fired"));
    assert!(!names(&events).contains(&"error"));
    // Countdown still completes
    assert_eq!(engine.job(&id).unwrap().state(), JobState::Stopped);
}

#[tokio::test]
async fn consecutive_follower_starts_when_predecessor_finishes() {
    let (mut engine, adapter, clock) = engine();
    let first = armed(&mut engine, 1, "true").await;
    let second = engine.add_job();
    engine.set_delay(&second, 7).await.unwrap();
    engine.set_command(&second, "true").await.unwrap();
    engine.set_consecutive(&second, true).await.unwrap();

    advance_and_poll(&mut engine, &clock, 1).await;
    adapter.complete(adapter.spawns()[0].handle, true);
    engine.poll().await;

    assert_eq!(engine.job(&second).unwrap().state(), JobState::Started);
    let _ = first;
}

#[tokio::test]
async fn non_consecutive_follower_is_left_alone() {
    let (mut engine, adapter, clock) = engine();
    let _first = armed(&mut engine, 1, "true").await;
    let second = engine.add_job();
    engine.set_command(&second, "true").await.unwrap();

    advance_and_poll(&mut engine, &clock, 1).await;
    adapter.complete(adapter.spawns()[0].handle, true);
    engine.poll().await;

    assert_eq!(engine.job(&second).unwrap().state(), JobState::Stopped);
}

#[tokio::test]
async fn completion_for_removed_job_is_ignored() {
    let (mut engine, adapter, clock) = engine();
    let mut rx = engine.subscribe();
    let id = armed(&mut engine, 1, "true").await;

    advance_and_poll(&mut engine, &clock, 1).await;
    let handle = adapter.spawns()[0].handle;
    engine.remove_job(&id).unwrap();
    drain(&mut rx);

    adapter.complete(handle, true);
    engine.poll().await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn save_and_load_resumes_running_countdown() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("fuse.toml");

    let clock = FakeClock::new();
    clock.set_unix(1_000);
    let mut first = Engine::new(FakeProcessAdapter::new(), clock.clone());
    let id = first.add_job();
    first.set_delay(&id, 60).await.unwrap();
    first.set_command(&id, "echo hi").await.unwrap();
    first.start(&id).await.unwrap();
    first.save_to_path(&path).unwrap();

    // Restart 25 seconds later
    let clock2 = FakeClock::new();
    clock2.set_unix(1_025);
    let mut second = Engine::new(FakeProcessAdapter::new(), clock2.clone());
    second.load_from_path(&path).unwrap();

    let job = second.jobs().next().unwrap();
    assert_eq!(job.state(), JobState::Started);
    assert_eq!(job.value(), 35);
    assert!(second.next_deadline().is_some());
}

#[tokio::test]
async fn loaded_started_job_keeps_ticking() {
    let clock = FakeClock::new();
    let mut first = Engine::new(FakeProcessAdapter::new(), clock.clone());
    let id = first.add_job();
    first.set_delay(&id, 10).await.unwrap();
    first.start(&id).await.unwrap();

    let mut store = ConfigStore::new();
    first.save(&mut store);

    let adapter = FakeProcessAdapter::new();
    let mut second = Engine::new(adapter, clock.clone());
    second.load(&store);

    advance_and_poll(&mut second, &clock, 3).await;
    let job = second.jobs().next().unwrap();
    assert_eq!(job.value(), 7);
}

#[tokio::test]
async fn show_seconds_round_trips_through_store() {
    let clock = FakeClock::new();
    let mut first = Engine::new(FakeProcessAdapter::new(), clock.clone());
    first.set_show_seconds(true);
    first.add_job();

    let mut store = ConfigStore::new();
    first.save(&mut store);

    let mut second = Engine::new(FakeProcessAdapter::new(), clock.clone());
    second.load(&store);
    assert!(second.show_seconds());
    assert_eq!(second.jobs().count(), 1);
}
