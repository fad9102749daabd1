use appointment_core::{replay, Appointment, StoreKind, StoreOp};
use proptest::prelude::*;

const NOW: i64 = 1_700_000_000_000;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Small id pool so generated scripts hit duplicates and misses often.
const ID_POOL: &[&str] = &["A1", "B2", "C3", "D4", "E5", "F6"];

fn op_strategy() -> impl Strategy<Value = StoreOp> {
    let id = prop::sample::select(ID_POOL);
    prop_oneof![
        (id.clone(), 1..30_i64).prop_map(|(id, days)| {
            StoreOp::Add(
                Appointment::new_at(id, NOW + days * DAY_MS, format!("visit {days}"), NOW)
                    .unwrap(),
            )
        }),
        id.prop_map(|id| StoreOp::Delete(id.to_string())),
    ]
}

fn script_strategy() -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(op_strategy(), 0..64)
}

#[test]
fn fixed_script_produces_same_outcomes_on_both_strategies() {
    let add = |id: &str| {
        StoreOp::Add(Appointment::new_at(id, NOW + DAY_MS, "x", NOW).unwrap())
    };
    let ops = vec![
        add("A1"),
        add("B2"),
        add("A1"),
        StoreOp::Delete("C3".to_string()),
        StoreOp::Delete("A1".to_string()),
        add("C3"),
        StoreOp::Delete("A1".to_string()),
    ];

    let list = replay(StoreKind::List, &ops);
    let map = replay(StoreKind::Map, &ops);

    assert!(list.is_equivalent_to(&map), "{list:?} vs {map:?}");
    assert_eq!(list.size, 2);
    assert_eq!(
        list.results.iter().filter(|result| result.is_err()).count(),
        3
    );
}

proptest! {
    #[test]
    fn list_and_map_stores_agree_on_any_script(ops in script_strategy()) {
        let list = replay(StoreKind::List, &ops);
        let map = replay(StoreKind::Map, &ops);

        prop_assert_eq!(&list.results, &map.results);
        prop_assert_eq!(list.size, map.size);
        prop_assert_eq!(&list.ids, &map.ids);
    }

    #[test]
    fn size_tracks_successful_adds_minus_deletes(ops in script_strategy()) {
        for kind in StoreKind::ALL {
            let outcome = replay(kind, &ops);
            let mut expected = 0_usize;
            for (op, result) in ops.iter().zip(&outcome.results) {
                if result.is_ok() {
                    match op {
                        StoreOp::Add(_) => expected += 1,
                        StoreOp::Delete(_) => expected -= 1,
                    }
                }
            }
            prop_assert_eq!(outcome.size, expected);
            prop_assert_eq!(outcome.ids.len(), outcome.size);
        }
    }
}
