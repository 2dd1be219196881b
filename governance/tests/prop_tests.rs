use proptest::prelude::*;

use birthright_governance::{compute_allocations, LevelWeights, OfficialsSource, StaticRoster};
use birthright_types::{GovernmentLevel, Official, TimeBalance};

fn level_strategy() -> impl Strategy<Value = GovernmentLevel> {
    prop_oneof![
        Just(GovernmentLevel::Local),
        Just(GovernmentLevel::County),
        Just(GovernmentLevel::State),
        Just(GovernmentLevel::Federal),
    ]
}

fn weights_strategy() -> impl Strategy<Value = LevelWeights> {
    prop::collection::btree_map(level_strategy(), 0u32..=2_500, 0..=4)
        .prop_filter_map("weights within scale", |map| LevelWeights::new(map).ok())
}

proptest! {
    /// Floor division never hands out more than the balance (reference dataset).
    #[test]
    fn reference_never_overallocates(balance in 0u64..10_000_000) {
        let officials = StaticRoster::san_francisco().profile().officials;
        let table = compute_allocations(TimeBalance::new(balance), &officials, &LevelWeights::reference());
        prop_assert!(table.total() <= balance);
        prop_assert_eq!(table.total() + table.unallocated(), balance);
    }

    /// Valid weights over arbitrary rosters never overallocate either.
    #[test]
    fn arbitrary_roster_never_overallocates(
        balance in 0u64..u32::MAX as u64,
        levels in prop::collection::vec(level_strategy(), 0..40),
        weights in weights_strategy(),
    ) {
        let officials: Vec<Official> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| Official::new(format!("o{i}"), "Title", "Name", *level))
            .collect();
        let table = compute_allocations(TimeBalance::new(balance), &officials, &weights);
        prop_assert!(table.total() <= balance);
        prop_assert_eq!(table.len(), officials.len());
    }

    /// Same inputs, same table.
    #[test]
    fn allocation_is_idempotent(balance in 0u64..10_000_000) {
        let officials = StaticRoster::san_francisco().profile().officials;
        let weights = LevelWeights::reference();
        let first = compute_allocations(TimeBalance::new(balance), &officials, &weights);
        let second = compute_allocations(TimeBalance::new(balance), &officials, &weights);
        prop_assert_eq!(first, second);
    }

    /// Level totals partition the allocated total.
    #[test]
    fn level_totals_sum_to_total(balance in 0u64..10_000_000) {
        let officials = StaticRoster::san_francisco().profile().officials;
        let table = compute_allocations(TimeBalance::new(balance), &officials, &LevelWeights::reference());
        let by_level: u64 = table.level_totals().values().sum();
        prop_assert_eq!(by_level, table.total());
    }
}
