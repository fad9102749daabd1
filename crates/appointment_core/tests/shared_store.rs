use appointment_core::{
    Appointment, AppointmentStore, ListAppointmentStore, MapAppointmentStore,
    SharedAppointmentStore, SharedStoreError, StoreError,
};
use std::thread;

const NOW: i64 = 1_700_000_000_000;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[test]
fn concurrent_adds_of_same_id_admit_exactly_one() {
    let shared = SharedAppointmentStore::new(MapAppointmentStore::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                let appointment =
                    Appointment::new_at("A1", NOW + DAY_MS, format!("worker {worker}"), NOW)
                        .unwrap();
                shared.add_at(appointment, NOW)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    for result in results.iter().filter(|result| result.is_err()) {
        assert_eq!(
            result.as_ref().unwrap_err(),
            &SharedStoreError::Store(StoreError::DuplicateKey("A1".to_string()))
        );
    }
    assert_eq!(shared.size().unwrap(), 1);
}

#[test]
fn concurrent_distinct_adds_and_deletes_keep_size_consistent() {
    let shared = SharedAppointmentStore::new(ListAppointmentStore::new());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for index in 0..25 {
                    let id = format!("W{worker}N{index}");
                    let appointment =
                        Appointment::new_at(id.as_str(), NOW + DAY_MS, "x", NOW).unwrap();
                    shared.add_at(appointment, NOW).unwrap();
                    if index % 5 == 0 {
                        shared.delete(&id).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.size().unwrap(), 4 * 20);
    assert_eq!(shared.list().unwrap().len(), 4 * 20);
    assert!(shared.get("W0N0").unwrap().is_none());
    assert!(shared.get("W3N24").unwrap().is_some());
}

#[test]
fn with_store_gives_exclusive_access() {
    let shared = SharedAppointmentStore::new(MapAppointmentStore::new());
    let appointment = Appointment::new_at("A1", NOW + DAY_MS, "x", NOW).unwrap();
    shared.add_at(appointment, NOW).unwrap();

    let removed = shared
        .with_store(|store| store.delete("A1").map(|removed| removed.id().to_string()))
        .unwrap();

    assert_eq!(removed, Ok("A1".to_string()));
    assert_eq!(shared.size().unwrap(), 0);
}
