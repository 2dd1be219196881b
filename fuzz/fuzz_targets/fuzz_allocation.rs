#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use birthright_governance::{compute_allocations, LevelWeights};
use birthright_types::{GovernmentLevel, Official, TimeBalance};

#[derive(Debug, Arbitrary)]
struct Input {
    balance: u64,
    weights: [Option<u16>; 4],
    officials: Vec<(u8, u8)>,
}

// Fuzz the allocator with arbitrary balances, weights, and rosters.
// Whatever validates must never hand out more than the balance.
fuzz_target!(|input: Input| {
    let pairs = GovernmentLevel::ALL
        .iter()
        .zip(input.weights)
        .filter_map(|(&level, bps)| bps.map(|bps| (level, bps as u32)));
    let Ok(weights) = LevelWeights::new(pairs) else {
        return;
    };

    let officials: Vec<Official> = input
        .officials
        .iter()
        .take(256)
        .map(|&(id, level)| {
            let level = GovernmentLevel::ALL[level as usize % GovernmentLevel::ALL.len()];
            Official::new(format!("o{id}"), "Official", "Name", level)
        })
        .collect();

    let balance = TimeBalance::new(input.balance);
    let table = compute_allocations(balance, &officials, &weights);

    assert!(table.total() <= input.balance);
    assert_eq!(table.total() + table.unallocated(), input.balance);
});
