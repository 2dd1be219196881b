//! Officials data source and the bundled reference roster.

use birthright_types::{GovernmentLevel, Official};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of laws that apply at each jurisdiction level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawCounts {
    pub local: u32,
    pub county: u32,
    pub state: u32,
    pub federal: u32,
    pub international: u32,
}

impl LawCounts {
    pub fn total(&self) -> u64 {
        [
            self.local,
            self.county,
            self.state,
            self.federal,
            self.international,
        ]
        .iter()
        .map(|&n| n as u64)
        .sum()
    }
}

/// Who governs a location, and under how many laws.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceProfile {
    pub location: String,
    pub officials: Vec<Official>,
    pub laws: LawCounts,
}

impl GovernanceProfile {
    pub fn officials_at(&self, level: GovernmentLevel) -> impl Iterator<Item = &Official> {
        self.officials.iter().filter(move |o| o.level == level)
    }

    /// Officials grouped by level, local first. Levels without officials are omitted.
    pub fn officials_by_level(&self) -> BTreeMap<GovernmentLevel, Vec<&Official>> {
        let mut grouped: BTreeMap<GovernmentLevel, Vec<&Official>> = BTreeMap::new();
        for official in &self.officials {
            grouped.entry(official.level).or_default().push(official);
        }
        grouped
    }

    pub fn total_officials(&self) -> usize {
        self.officials.len()
    }

    pub fn total_laws(&self) -> u64 {
        self.laws.total()
    }
}

/// Supplies the governance profile the allocator works over.
///
/// The bundled implementation is static; a live provider can replace it
/// without changing the allocation contract.
pub trait OfficialsSource: Send + Sync {
    fn profile(&self) -> GovernanceProfile;
}

/// A fixed, in-memory governance profile.
#[derive(Clone, Debug)]
pub struct StaticRoster {
    profile: GovernanceProfile,
}

impl StaticRoster {
    pub fn new(profile: GovernanceProfile) -> Self {
        Self { profile }
    }

    /// Reference dataset for San Francisco, CA.
    pub fn san_francisco() -> Self {
        use GovernmentLevel::*;

        let officials = [
            ("mayor", "Mayor", "London Breed", Local),
            ("sup-1", "Supervisor D1", "Connie Chan", Local),
            ("sup-2", "Supervisor D2", "Catherine Stefani", Local),
            ("sup-3", "Supervisor D3", "Aaron Peskin", Local),
            ("sup-4", "Supervisor D4", "Joel Engardio", Local),
            ("sup-5", "Supervisor D5", "Dean Preston", Local),
            ("sup-6", "Supervisor D6", "Matt Dorsey", Local),
            ("sup-7", "Supervisor D7", "Myrna Melgar", Local),
            ("sup-8", "Supervisor D8", "Rafael Mandelman", Local),
            ("sup-9", "Supervisor D9", "Hillary Ronen", Local),
            ("sup-10", "Supervisor D10", "Shamann Walton", Local),
            ("sup-11", "Supervisor D11", "Ahsha Safai", Local),
            ("da", "District Attorney", "Brooke Jenkins", County),
            ("sheriff", "Sheriff", "Paul Miyamoto", County),
            ("assessor", "Assessor-Recorder", "Joaquín Torres", County),
            ("treasurer", "Treasurer", "José Cisneros", County),
            ("city-attorney", "City Attorney", "David Chiu", County),
            ("public-defender", "Public Defender", "Mano Raju", County),
            ("governor", "Governor", "Gavin Newsom", State),
            ("lt-gov", "Lt. Governor", "Eleni Kounalakis", State),
            ("state-sen", "State Senator", "Scott Wiener", State),
            ("assembly", "Assembly Member", "Matt Haney", State),
            ("ag", "Attorney General", "Rob Bonta", State),
            ("sos", "Secretary of State", "Shirley Weber", State),
            ("president", "President", "Donald Trump", Federal),
            ("vp", "Vice President", "JD Vance", Federal),
            ("senator-1", "U.S. Senator", "Alex Padilla", Federal),
            ("senator-2", "U.S. Senator", "Adam Schiff", Federal),
            ("rep", "U.S. Representative", "Nancy Pelosi", Federal),
        ]
        .into_iter()
        .map(|(id, title, name, level)| Official::new(id, title, name, level))
        .collect();

        Self::new(GovernanceProfile {
            location: "San Francisco, CA".to_string(),
            officials,
            laws: LawCounts {
                local: 847,
                county: 234,
                state: 4521,
                federal: 6892,
                international: 353,
            },
        })
    }
}

impl Default for StaticRoster {
    fn default() -> Self {
        Self::san_francisco()
    }
}

impl OfficialsSource for StaticRoster {
    fn profile(&self) -> GovernanceProfile {
        self.profile.clone()
    }
}
