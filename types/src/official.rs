//! Government officials and the jurisdiction levels they serve at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BirthrightError;

/// Jurisdiction level of an official, ordered from closest to furthest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernmentLevel {
    Local,
    County,
    State,
    Federal,
}

impl GovernmentLevel {
    /// All levels, local first.
    pub const ALL: [GovernmentLevel; 4] = [Self::Local, Self::County, Self::State, Self::Federal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::County => "county",
            Self::State => "state",
            Self::Federal => "federal",
        }
    }
}

impl fmt::Display for GovernmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovernmentLevel {
    type Err = BirthrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "county" => Ok(Self::County),
            "state" => Ok(Self::State),
            "federal" => Ok(Self::Federal),
            other => Err(BirthrightError::InvalidLevel(other.to_string())),
        }
    }
}

/// A public official. Static reference data, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Official {
    /// Unique within a dataset.
    pub id: String,
    pub title: String,
    pub name: String,
    pub level: GovernmentLevel,
}

impl Official {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        name: impl Into<String>,
        level: GovernmentLevel,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            name: name.into(),
            level,
        }
    }
}
