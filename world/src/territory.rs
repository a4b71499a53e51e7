//! Territory records held by the authoritative world.

use turf_war_core::{
    ControlVector, FactionId, FactionTable, Position, TerritoryId, TerritorySnapshot, WeightVector,
};

use crate::control;

/// Weight credited to the starting owner of a seeded territory.
const OWNED_SEED_WEIGHT: f64 = 10.0;
/// Weight credited to every faction on a neutral territory.
const NEUTRAL_SEED_WEIGHT: f64 = 1.0;

/// Static description of a territory as it exists when the session starts.
#[derive(Clone, Debug, PartialEq)]
pub struct TerritorySeed {
    /// Unique identifier assigned to the territory.
    pub id: TerritoryId,
    /// Display name.
    pub name: String,
    /// Short flavour line shown alongside the name.
    pub vibe: String,
    /// Location on the city map.
    pub position: Position,
    /// Faction that controls the territory outright at start, if any.
    pub starting_owner: Option<FactionId>,
}

impl TerritorySeed {
    /// Creates a neutral seed without a flavour line.
    #[must_use]
    pub fn new(id: TerritoryId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            vibe: String::new(),
            position,
            starting_owner: None,
        }
    }

    /// Assigns a starting owner to the seed.
    #[must_use]
    pub fn owned_by(mut self, faction: FactionId) -> Self {
        self.starting_owner = Some(faction);
        self
    }

    /// Attaches a flavour line to the seed.
    #[must_use]
    pub fn with_vibe(mut self, vibe: impl Into<String>) -> Self {
        self.vibe = vibe.into();
        self
    }

    /// Transaction weights the territory starts with.
    ///
    /// Owned territories credit only their owner; neutral territories credit
    /// every faction equally so the first update never divides by zero.
    #[must_use]
    pub fn seeded_weights(&self) -> WeightVector {
        match self.starting_owner {
            Some(owner) => FactionTable::from_fn(|faction| {
                if faction == owner {
                    OWNED_SEED_WEIGHT
                } else {
                    0.0
                }
            }),
            None => FactionTable::splat(NEUTRAL_SEED_WEIGHT),
        }
    }
}

/// Mutable control state of a single territory.
#[derive(Clone, Debug)]
pub(crate) struct Territory {
    pub(crate) seed: TerritorySeed,
    pub(crate) weights: WeightVector,
    pub(crate) control: ControlVector,
    pub(crate) owner: Option<FactionId>,
    pub(crate) contested: bool,
}

impl Territory {
    /// Builds the seeded state for the provided description.
    ///
    /// Returns `None` when the seeded weights sum to zero.
    pub(crate) fn from_seed(seed: TerritorySeed) -> Option<Self> {
        let weights = seed.seeded_weights();
        let control = control::normalize(&weights)?;
        let (_, max_control) = control.leader();
        let contested = control::is_contested(max_control, weights.total());
        Some(Self {
            owner: seed.starting_owner,
            seed,
            weights,
            control,
            contested,
        })
    }

    pub(crate) fn id(&self) -> TerritoryId {
        self.seed.id
    }

    pub(crate) fn snapshot(&self) -> TerritorySnapshot {
        TerritorySnapshot {
            id: self.seed.id,
            name: self.seed.name.clone(),
            vibe: self.seed.vibe.clone(),
            position: self.seed.position,
            control: self.control,
            weights: self.weights,
            owner: self.owner,
            contested: self.contested,
        }
    }
}

/// Roster of the fifteen city territories used by default.
#[must_use]
pub fn default_roster() -> Vec<TerritorySeed> {
    const ROSTER: [(u32, &str, Option<FactionId>, &str, f32, f32); 15] = [
        (1, "The Rooftop", Some(FactionId::Monad), "Top of the world", 50.0, 12.0),
        (2, "Mural Wall", Some(FactionId::Monad), "Art district", 22.0, 28.0),
        (3, "The Plaza", Some(FactionId::Monad), "Public square", 58.0, 30.0),
        (4, "Warehouse", Some(FactionId::Monad), "Big moves only", 82.0, 22.0),
        (5, "The Block", Some(FactionId::Base), "Home turf", 12.0, 48.0),
        (6, "The Corner", Some(FactionId::Base), "Where deals go down", 18.0, 72.0),
        (7, "The Courts", Some(FactionId::Base), "Ball is life", 32.0, 85.0),
        (8, "The Alley", Some(FactionId::Base), "Shortcut central", 28.0, 58.0),
        (9, "Skate Park", Some(FactionId::Hyperliquid), "Grind territory", 88.0, 45.0),
        (10, "The Bodega", Some(FactionId::Hyperliquid), "Open 24/7", 85.0, 68.0),
        (11, "The Garage", Some(FactionId::Hyperliquid), "Where builds happen", 72.0, 82.0),
        (12, "The Bridge", Some(FactionId::Hyperliquid), "Connecting zones", 75.0, 55.0),
        (13, "North Central", None, "The northern crossroads", 50.0, 45.0),
        (14, "West Central", None, "Western gateway", 38.0, 68.0),
        (15, "East Central", None, "Eastern gateway", 62.0, 68.0),
    ];

    ROSTER
        .iter()
        .map(|&(id, name, owner, vibe, x, y)| {
            let seed =
                TerritorySeed::new(TerritoryId::new(id), name, Position::new(x, y)).with_vibe(vibe);
            match owner {
                Some(faction) => seed.owned_by(faction),
                None => seed,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_seed_credits_only_the_owner() {
        let seed = TerritorySeed::new(TerritoryId::new(1), "Owned", Position::new(10.0, 10.0))
            .owned_by(FactionId::Hyperliquid);
        assert_eq!(seed.seeded_weights().as_array(), &[0.0, 10.0, 0.0]);

        let territory = Territory::from_seed(seed).expect("seeded weights are positive");
        assert_eq!(territory.control.as_array(), &[0.0, 100.0, 0.0]);
        assert_eq!(territory.owner, Some(FactionId::Hyperliquid));
        assert!(!territory.contested);
    }

    #[test]
    fn neutral_seed_splits_control_evenly_and_is_not_contested() {
        let seed = TerritorySeed::new(TerritoryId::new(2), "Neutral", Position::new(50.0, 50.0));
        let territory = Territory::from_seed(seed).expect("seeded weights are positive");

        for (_, share) in territory.control.iter() {
            assert!((share - 100.0 / 3.0).abs() < 1e-9);
        }
        assert_eq!(territory.owner, None);
        assert!(!territory.contested, "total weight 3 is below the activity floor");
    }

    #[test]
    fn default_roster_has_three_neutral_centres() {
        let roster = default_roster();
        assert_eq!(roster.len(), 15);

        let neutral: Vec<&str> = roster
            .iter()
            .filter(|seed| seed.starting_owner.is_none())
            .map(|seed| seed.name.as_str())
            .collect();
        assert_eq!(neutral, vec!["North Central", "West Central", "East Central"]);

        for faction in FactionId::ALL {
            let owned = roster
                .iter()
                .filter(|seed| seed.starting_owner == Some(faction))
                .count();
            assert_eq!(owned, 4, "{faction} should start with four territories");
        }
    }
}
