//! Territory held by a faction.
//!
//! A faction's territory is four sets of identifiers. Territory points are a
//! weighted sum over those sets and drive the faction's level.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The four kinds of territorial asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerritoryKind {
    /// A single map hex.
    Hex,
    /// A village, town, or city.
    Settlement,
    /// A fortified holding.
    Stronghold,
    /// A broad region under the faction's rule.
    Domain,
}

impl TerritoryKind {
    /// All kinds in processing order.
    pub const ALL: [Self; 4] = [Self::Hex, Self::Settlement, Self::Stronghold, Self::Domain];

    /// Lowercase label used in effect payloads and messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Settlement => "settlement",
            Self::Stronghold => "stronghold",
            Self::Domain => "domain",
        }
    }
}

impl std::fmt::Display for TerritoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point weight per territory kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryPointValues {
    /// Points per hex.
    pub hex: u32,
    /// Points per settlement.
    pub settlement: u32,
    /// Points per stronghold.
    pub stronghold: u32,
    /// Points per domain.
    pub domain: u32,
}

impl Default for TerritoryPointValues {
    fn default() -> Self {
        Self {
            hex: 1,
            settlement: 2,
            stronghold: 3,
            domain: 4,
        }
    }
}

impl TerritoryPointValues {
    /// Weight for one asset of the given kind.
    pub fn weight(&self, kind: TerritoryKind) -> u32 {
        match kind {
            TerritoryKind::Hex => self.hex,
            TerritoryKind::Settlement => self.settlement,
            TerritoryKind::Stronghold => self.stronghold,
            TerritoryKind::Domain => self.domain,
        }
    }
}

/// A stronghold or domain entry in a home territory, with optional custom points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedHolding {
    /// Identifier of the holding.
    pub id: String,
    /// Point value overriding the kind's default weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

/// Starting territory declared in a faction definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeTerritory {
    /// Hex identifiers.
    pub hexes: Vec<String>,
    /// Settlement identifiers.
    pub settlements: Vec<String>,
    /// Strongholds, optionally weighted.
    pub strongholds: Vec<WeightedHolding>,
    /// Domains, optionally weighted.
    pub domains: Vec<WeightedHolding>,
}

/// Territory currently held by one faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Territory {
    /// Held hexes.
    pub hexes: BTreeSet<String>,
    /// Held settlements.
    pub settlements: BTreeSet<String>,
    /// Held strongholds.
    pub strongholds: BTreeSet<String>,
    /// Held domains.
    pub domains: BTreeSet<String>,
    /// Point overrides per kind and asset id.
    pub custom_points: BTreeMap<TerritoryKind, BTreeMap<String, u32>>,
}

impl Territory {
    /// Build territory from a definition's home territory.
    ///
    /// A weighted holding whose points differ from the kind's weight records
    /// a custom override.
    pub fn from_home(home: &HomeTerritory, values: &TerritoryPointValues) -> Self {
        let mut territory = Self {
            hexes: home.hexes.iter().cloned().collect(),
            settlements: home.settlements.iter().cloned().collect(),
            ..Self::default()
        };
        for (kind, holdings) in [
            (TerritoryKind::Stronghold, &home.strongholds),
            (TerritoryKind::Domain, &home.domains),
        ] {
            for holding in holdings {
                territory.insert(kind, &holding.id);
                if let Some(points) = holding.points
                    && points != values.weight(kind)
                {
                    territory.set_custom_points(kind, &holding.id, points);
                }
            }
        }
        territory
    }

    /// The set of held identifiers of one kind.
    pub fn set(&self, kind: TerritoryKind) -> &BTreeSet<String> {
        match kind {
            TerritoryKind::Hex => &self.hexes,
            TerritoryKind::Settlement => &self.settlements,
            TerritoryKind::Stronghold => &self.strongholds,
            TerritoryKind::Domain => &self.domains,
        }
    }

    fn set_mut(&mut self, kind: TerritoryKind) -> &mut BTreeSet<String> {
        match kind {
            TerritoryKind::Hex => &mut self.hexes,
            TerritoryKind::Settlement => &mut self.settlements,
            TerritoryKind::Stronghold => &mut self.strongholds,
            TerritoryKind::Domain => &mut self.domains,
        }
    }

    /// Whether this territory holds `id` as an asset of `kind`.
    pub fn holds(&self, kind: TerritoryKind, id: &str) -> bool {
        self.set(kind).contains(id)
    }

    /// Add an asset. Returns `true` if it was not already held.
    pub fn insert(&mut self, kind: TerritoryKind, id: &str) -> bool {
        self.set_mut(kind).insert(id.to_string())
    }

    /// Remove an asset. Returns `true` if it was held.
    ///
    /// A custom point override for the asset is dropped along with it.
    pub fn remove(&mut self, kind: TerritoryKind, id: &str) -> bool {
        let removed = self.set_mut(kind).remove(id);
        if removed && let Some(overrides) = self.custom_points.get_mut(&kind) {
            overrides.remove(id);
            if overrides.is_empty() {
                self.custom_points.remove(&kind);
            }
        }
        removed
    }

    /// The point override for one asset, if any.
    pub fn custom_points(&self, kind: TerritoryKind, id: &str) -> Option<u32> {
        self.custom_points.get(&kind)?.get(id).copied()
    }

    /// Record a point override for one asset.
    pub fn set_custom_points(&mut self, kind: TerritoryKind, id: &str, points: u32) {
        self.custom_points
            .entry(kind)
            .or_default()
            .insert(id.to_string(), points);
    }

    /// Number of held assets of one kind.
    pub fn count(&self, kind: TerritoryKind) -> usize {
        self.set(kind).len()
    }

    /// Weighted territory points.
    pub fn compute_points(&self, values: &TerritoryPointValues) -> u32 {
        TerritoryKind::ALL
            .iter()
            .map(|&kind| {
                self.set(kind)
                    .iter()
                    .map(|id| {
                        self.custom_points(kind, id)
                            .unwrap_or_else(|| values.weight(kind))
                    })
                    .sum::<u32>()
            })
            .sum()
    }
}
