use appointment_core::{
    new_store, Appointment, AppointmentService, AppointmentStore, ServiceError, StoreError,
    StoreKind,
};
use std::collections::HashSet;

const NOW: i64 = 1_700_000_000_000;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn appointment(id: &str, description: &str) -> Appointment {
    Appointment::new_at(id, NOW + DAY_MS, description, NOW).unwrap()
}

fn ids<S: AppointmentStore + ?Sized>(store: &S) -> HashSet<String> {
    store
        .list()
        .iter()
        .map(|item| item.id().to_string())
        .collect()
}

#[test]
fn add_duplicate_delete_scenario_holds_for_every_strategy() {
    for kind in StoreKind::ALL {
        let mut store = new_store(kind);

        store.add(appointment("A1", "x")).unwrap();
        assert_eq!(store.size(), 1, "{kind}");

        let err = store.add(appointment("A1", "other")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateKey("A1".to_string()), "{kind}");
        assert_eq!(store.size(), 1, "{kind}");
        assert_eq!(store.get("A1").unwrap().description(), "x", "{kind}");

        let removed = store.delete("A1").unwrap();
        assert_eq!(removed.id().as_str(), "A1");
        assert_eq!(store.size(), 0, "{kind}");

        let err = store.delete("A1").unwrap_err();
        assert_eq!(err, StoreError::NotFound("A1".to_string()), "{kind}");
        assert!(
            err.to_string().contains("already deleted or does not exist"),
            "{kind}: {err}"
        );
    }
}

#[test]
fn delete_removes_only_the_target_id() {
    for kind in StoreKind::ALL {
        let mut store = new_store(kind);
        for id in ["A1", "B2", "C3"] {
            store.add(appointment(id, "x")).unwrap();
        }

        store.delete("B2").unwrap();

        assert_eq!(store.size(), 2, "{kind}");
        assert!(!store.contains("B2"), "{kind}");
        assert_eq!(
            ids(&store),
            HashSet::from(["A1".to_string(), "C3".to_string()]),
            "{kind}"
        );
    }
}

#[test]
fn delete_of_absent_id_leaves_store_unchanged() {
    for kind in StoreKind::ALL {
        let mut store = new_store(kind);
        store.add(appointment("A1", "x")).unwrap();
        let before = store.list();

        store.delete("Z9").unwrap_err();

        assert_eq!(store.size(), 1, "{kind}");
        assert_eq!(store.list(), before, "{kind}");
    }
}

#[test]
fn list_returns_detached_snapshot() {
    for kind in StoreKind::ALL {
        let mut store = new_store(kind);
        store.add(appointment("A1", "x")).unwrap();

        let snapshot = store.list();
        store.add(appointment("B2", "y")).unwrap();
        store.delete("A1").unwrap();

        assert_eq!(snapshot.len(), 1, "{kind}");
        assert_eq!(snapshot[0].id().as_str(), "A1", "{kind}");
        assert_eq!(ids(&store), HashSet::from(["B2".to_string()]), "{kind}");
    }
}

#[test]
fn list_backed_store_reports_insertion_order() {
    let mut store = new_store(StoreKind::List);
    for id in ["Zed", "Alpha", "Mid"] {
        store.add(appointment(id, "x")).unwrap();
    }

    let order: Vec<String> = store
        .list()
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(order, vec!["Zed", "Alpha", "Mid"]);
}

#[test]
fn service_reschedule_and_describe_replace_whole_records() {
    for kind in StoreKind::ALL {
        let mut service = AppointmentService::new(new_store(kind));
        service.add(appointment("A1", "x")).unwrap();

        let moved = service.reschedule_at("A1", NOW + 3 * DAY_MS, NOW).unwrap();
        assert_eq!(moved.date(), NOW + 3 * DAY_MS);

        let err = service.reschedule_at("A1", NOW - 1, NOW).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{kind}");
        assert_eq!(service.get("A1").unwrap().date(), NOW + 3 * DAY_MS, "{kind}");

        let renamed = service.describe("A1", "annual checkup").unwrap();
        assert_eq!(renamed.description(), "annual checkup");
        assert_eq!(service.count(), 1, "{kind}");
        assert_eq!(service.list(), vec![renamed], "{kind}");
    }
}

#[test]
fn service_messages_pass_through_verbatim() {
    let mut service = AppointmentService::new(new_store(StoreKind::Map));
    service.add(appointment("A1", "x")).unwrap();

    let err = service.add(appointment("A1", "x")).unwrap_err();
    assert_eq!(err.to_string(), "appointment with id `A1` already exists");

    let err = service.cancel("missing").unwrap_err();
    assert_eq!(
        err.to_string(),
        "appointment `missing` was already deleted or does not exist"
    );
}
