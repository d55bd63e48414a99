use super::*;

#[test]
fn event_name_matches_variant() {
    let id = JobId::from("job-1");
    assert_eq!(
        JobEvent::FieldChanged {
            job: id.clone(),
            field: Field::Delay
        }
        .name(),
        "field_changed"
    );
    assert_eq!(JobEvent::Changed { job: id.clone() }.name(), "changed");
    assert_eq!(JobEvent::Fired { job: id.clone() }.name(), "fired");
    assert_eq!(
        JobEvent::Finished {
            job: id,
            error: true
        }
        .name(),
        "finished"
    );
}

#[test]
fn event_job_returns_subject() {
    let id = JobId::from("job-7");
    let event = JobEvent::Finished {
        job: id.clone(),
        error: false,
    };
    assert_eq!(event.job(), &id);
}
