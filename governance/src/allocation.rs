//! The allocation calculator.
//!
//! Every share is an exact integer floor computed on basis points, so the
//! table never hands out more than the balance. What floor division drops is
//! reported by [`AllocationTable::unallocated`].

use birthright_types::{GovernmentLevel, Official, TimeBalance};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::params::{LevelWeights, BPS_SCALE};
use crate::roster::{GovernanceProfile, OfficialsSource};

/// One official's slice of the balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Share {
    pub level: GovernmentLevel,
    pub days: u64,
}

/// Official id → share. Pure data; level totals are derived on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllocationTable {
    balance: TimeBalance,
    shares: BTreeMap<String, Share>,
}

impl AllocationTable {
    pub fn balance(&self) -> TimeBalance {
        self.balance
    }

    /// Share for `official_id`; 0 for unknown ids.
    pub fn share(&self, official_id: &str) -> u64 {
        self.shares.get(official_id).map(|s| s.days).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Share)> {
        self.shares.iter().map(|(id, share)| (id.as_str(), share))
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of the shares held by officials at `level`.
    pub fn level_allocation(&self, level: GovernmentLevel) -> u64 {
        self.total_allocation_for(&[level])
    }

    /// Sum of the shares held by officials at any of `levels`.
    pub fn total_allocation_for(&self, levels: &[GovernmentLevel]) -> u64 {
        self.shares
            .values()
            .filter(|s| levels.contains(&s.level))
            .map(|s| s.days)
            .sum()
    }

    /// Per-level totals for every level, including empty ones.
    pub fn level_totals(&self) -> BTreeMap<GovernmentLevel, u64> {
        GovernmentLevel::ALL
            .iter()
            .map(|&level| (level, self.level_allocation(level)))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.shares.values().map(|s| s.days).sum()
    }

    /// Balance left over after rounding and unweighted remainder.
    pub fn unallocated(&self) -> u64 {
        self.balance.days().saturating_sub(self.total())
    }
}

/// Split `balance` across `officials` by level weight.
///
/// `share(o) = floor(balance × bps(level) / (10_000 × count(level)))` where
/// `count(level)` is taken over `officials` itself, so every level that
/// appears has at least one member. Ids are expected to be unique; a repeated
/// id keeps a single entry.
pub fn compute_allocations(
    balance: TimeBalance,
    officials: &[Official],
    weights: &LevelWeights,
) -> AllocationTable {
    let mut counts: HashMap<GovernmentLevel, u64> = HashMap::new();
    for official in officials {
        *counts.entry(official.level).or_default() += 1;
    }

    let mut shares = BTreeMap::new();
    for official in officials {
        let count = counts[&official.level] as u128;
        let bps = weights.weight_bps(official.level) as u128;
        let days = (balance.days() as u128 * bps) / (BPS_SCALE as u128 * count);
        shares.insert(
            official.id.clone(),
            Share {
                level: official.level,
                days: days as u64,
            },
        );
    }

    AllocationTable { balance, shares }
}

/// Binds an officials source to a set of weights.
#[derive(Clone)]
pub struct Allocator {
    source: Arc<dyn OfficialsSource>,
    weights: LevelWeights,
}

impl Allocator {
    pub fn new(source: Arc<dyn OfficialsSource>, weights: LevelWeights) -> Self {
        Self { source, weights }
    }

    pub fn profile(&self) -> GovernanceProfile {
        self.source.profile()
    }

    pub fn weights(&self) -> &LevelWeights {
        &self.weights
    }

    pub fn allocate(&self, balance: TimeBalance) -> AllocationTable {
        let profile = self.source.profile();
        let table = compute_allocations(balance, &profile.officials, &self.weights);
        tracing::debug!(
            location = %profile.location,
            balance = balance.days(),
            allocated = table.total(),
            "allocated time balance"
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::StaticRoster;

    fn reference() -> (Vec<Official>, LevelWeights) {
        (
            StaticRoster::san_francisco().profile().officials,
            LevelWeights::reference(),
        )
    }

    #[test]
    fn eighty_years_gives_each_local_official_730() {
        let (officials, weights) = reference();
        let table = compute_allocations(TimeBalance::new(29_200), &officials, &weights);
        assert_eq!(table.share("mayor"), 730);
        assert_eq!(table.share("sup-11"), 730);
        assert_eq!(table.level_allocation(GovernmentLevel::Local), 8_760);
    }

    #[test]
    fn other_levels_for_eighty_years() {
        let (officials, weights) = reference();
        let table = compute_allocations(TimeBalance::new(29_200), &officials, &weights);
        // 29200 × 0.15 / 6 = 730
        assert_eq!(table.share("sheriff"), 730);
        // 29200 × 0.25 / 6 = 1216.67
        assert_eq!(table.share("governor"), 1_216);
        // 29200 × 0.25 / 5 = 1460
        assert_eq!(table.share("president"), 1_460);
        assert_eq!(table.total(), 8_760 + 4_380 + 7_296 + 7_300);
        assert_eq!(table.unallocated(), 29_200 - table.total());
    }

    #[test]
    fn zero_balance_is_all_zero() {
        let (officials, weights) = reference();
        let table = compute_allocations(TimeBalance::ZERO, &officials, &weights);
        assert_eq!(table.len(), officials.len());
        assert!(table.iter().all(|(_, s)| s.days == 0));
        assert_eq!(table.unallocated(), 0);
    }

    #[test]
    fn missing_weight_uses_fallback() {
        let officials = vec![
            Official::new("a", "A", "A", GovernmentLevel::Local),
            Official::new("b", "B", "B", GovernmentLevel::County),
        ];
        let weights = LevelWeights::new([(GovernmentLevel::Local, 5_000)]).unwrap();
        let table = compute_allocations(TimeBalance::new(1_000), &officials, &weights);
        assert_eq!(table.share("a"), 500);
        assert_eq!(table.share("b"), 50);
    }

    #[test]
    fn empty_level_totals_zero() {
        let officials = vec![Official::new("a", "A", "A", GovernmentLevel::State)];
        let table = compute_allocations(TimeBalance::new(100), &officials, &LevelWeights::reference());
        assert_eq!(table.level_allocation(GovernmentLevel::Local), 0);
        assert_eq!(table.level_totals()[&GovernmentLevel::Federal], 0);
        assert_eq!(table.share("nobody"), 0);
    }

    #[test]
    fn total_allocation_for_sums_levels() {
        let (officials, weights) = reference();
        let table = compute_allocations(TimeBalance::new(29_200), &officials, &weights);
        let both = table.total_allocation_for(&[GovernmentLevel::Local, GovernmentLevel::County]);
        assert_eq!(
            both,
            table.level_allocation(GovernmentLevel::Local)
                + table.level_allocation(GovernmentLevel::County)
        );
        assert_eq!(table.total_allocation_for(&GovernmentLevel::ALL), table.total());
    }

    #[test]
    fn order_does_not_matter() {
        let (mut officials, weights) = reference();
        let forward = compute_allocations(TimeBalance::new(12_345), &officials, &weights);
        officials.reverse();
        let backward = compute_allocations(TimeBalance::new(12_345), &officials, &weights);
        assert_eq!(forward, backward);
    }

    #[test]
    fn allocator_reads_from_source() {
        let allocator = Allocator::new(
            Arc::new(StaticRoster::san_francisco()),
            LevelWeights::reference(),
        );
        let table = allocator.allocate(TimeBalance::new(29_200));
        assert_eq!(table.share("mayor"), 730);
        assert_eq!(allocator.profile().location, "San Francisco, CA");
    }
}
