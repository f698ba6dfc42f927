//! Priority tiers and their ranks.
//!
//! Ranks are numeric so that the sentinel tiers sit strictly outside the
//! business tiers: `Immediate` above everything, `Deferred` below zero.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named priority rank. Ordering follows [`PriorityTier::rank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Shown ahead of everything pending, FIFO among its own members.
    Immediate,
    Critical,
    High,
    #[default]
    Normal,
    Low,
    /// Shown after everything else, LIFO among its own members.
    Deferred,
}

impl PriorityTier {
    /// All tiers in descending rank.
    pub const ALL: [PriorityTier; 6] = [
        PriorityTier::Immediate,
        PriorityTier::Critical,
        PriorityTier::High,
        PriorityTier::Normal,
        PriorityTier::Low,
        PriorityTier::Deferred,
    ];

    pub fn rank(self) -> i32 {
        match self {
            PriorityTier::Immediate => 1000,
            PriorityTier::Critical => 3,
            PriorityTier::High => 2,
            PriorityTier::Normal => 1,
            PriorityTier::Low => 0,
            PriorityTier::Deferred => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::Immediate => "immediate",
            PriorityTier::Critical => "critical",
            PriorityTier::High => "high",
            PriorityTier::Normal => "normal",
            PriorityTier::Low => "low",
            PriorityTier::Deferred => "deferred",
        }
    }
}

impl Ord for PriorityTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for PriorityTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriorityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown priority tier '{}' (expected one of: immediate, critical, high, normal, low, deferred)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_bracket_business_tiers() {
        for tier in [
            PriorityTier::Critical,
            PriorityTier::High,
            PriorityTier::Normal,
            PriorityTier::Low,
        ] {
            assert!(PriorityTier::Immediate > tier);
            assert!(PriorityTier::Deferred < tier);
        }
        assert!(PriorityTier::Deferred.rank() < 0);
    }

    #[test]
    fn test_all_is_descending() {
        let ranks: Vec<i32> = PriorityTier::ALL.iter().map(|t| t.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<PriorityTier>(), Ok(PriorityTier::High));
        assert_eq!(" deferred ".parse::<PriorityTier>(), Ok(PriorityTier::Deferred));
        assert!("urgent".parse::<PriorityTier>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for tier in PriorityTier::ALL {
            assert_eq!(tier.to_string().parse::<PriorityTier>(), Ok(tier));
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&PriorityTier::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");
    }
}
