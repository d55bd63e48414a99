use super::*;
use crate::id::JobId;

#[test]
fn publish_reaches_all_subscribers() {
    let bus = EventBus::new();
    let mut rx1 = bus.subscribe();
    let mut rx2 = bus.subscribe();

    let event = JobEvent::Changed {
        job: JobId::from("job-1"),
    };
    bus.publish(event.clone());

    assert_eq!(rx1.try_recv().ok(), Some(event.clone()));
    assert_eq!(rx2.try_recv().ok(), Some(event));
}

#[test]
fn publish_preserves_order() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let job = JobId::from("job-1");

    bus.publish(JobEvent::Fired { job: job.clone() });
    bus.publish(JobEvent::Finished {
        job: job.clone(),
        error: false,
    });

    assert!(matches!(rx.try_recv().ok(), Some(JobEvent::Fired { .. })));
    assert!(matches!(
        rx.try_recv().ok(),
        Some(JobEvent::Finished { error: false, .. })
    ));
}

#[test]
fn dropped_subscribers_are_pruned() {
    let bus = EventBus::new();
    let rx = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);

    drop(rx);
    bus.publish(JobEvent::Changed {
        job: JobId::from("job-1"),
    });
    assert_eq!(bus.subscriber_count(), 0);
}
