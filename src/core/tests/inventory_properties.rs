use crate::core::execution::config::DepletionPolicy;
use crate::core::inventory::{DepletionFlag, MaterialInventory, RequestKind};
use crate::core::types::{Material, Unit};
use proptest::prelude::*;
use std::thread;

fn kind_from(index: u8) -> RequestKind {
    match index % 3 {
        0 => RequestKind::Check,
        1 => RequestKind::Consume,
        _ => RequestKind::Query,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_concurrent_requests_keep_inventory_consistent(
        stock in 0i64..60,
        scripts in prop::collection::vec(
            prop::collection::vec((0u8..3, 1i64..6), 0..16),
            1..6,
        ),
    ) {
        let flag = DepletionFlag::new();
        let service = MaterialInventory::new(stock, 2, DepletionPolicy::Strict, flag.clone())
            .spawn()
            .unwrap();

        let results: Vec<(RequestKind, Material, bool, Material)> = thread::scope(|s| {
            let handles: Vec<_> = scripts
                .iter()
                .enumerate()
                .map(|(i, script)| {
                    let client = service.client();
                    s.spawn(move || {
                        let unit = Unit::new(1, i as u32 + 1, 8);
                        script
                            .iter()
                            .map(|&(k, amount)| {
                                let kind = kind_from(k);
                                let response = match kind {
                                    RequestKind::Check => client.check(&unit, amount),
                                    RequestKind::Consume => client.consume(&unit, amount),
                                    RequestKind::Query => client.query(),
                                }
                                .unwrap();
                                (kind, amount, response.ok, response.remaining)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let ledger = service.shutdown().unwrap();

        prop_assert!(results.iter().all(|(_, _, _, remaining)| *remaining >= 0));

        let consumed: Material = results
            .iter()
            .filter(|(kind, _, ok, _)| *kind == RequestKind::Consume && *ok)
            .map(|(_, amount, _, _)| *amount)
            .sum();
        prop_assert_eq!(consumed + ledger.remaining, stock);
        prop_assert_eq!(ledger.consumed_total, consumed);

        let mut before: Vec<Material> = results
            .iter()
            .filter(|(kind, _, ok, _)| *kind == RequestKind::Consume && *ok)
            .map(|(_, amount, _, remaining)| remaining + amount)
            .collect();
        let successes = before.len();
        before.sort_unstable();
        before.dedup();
        prop_assert_eq!(before.len(), successes);

        let any_failed = results
            .iter()
            .any(|(kind, _, ok, _)| *kind != RequestKind::Query && !*ok);
        prop_assert_eq!(flag.is_raised(), any_failed);
    }
}
