#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Turf War.
//!
//! The [`World`] owns every territory record together with the bounded
//! activity log. It is mutated exclusively through [`apply`], which makes the
//! control state machine the single writer; everything else reads through the
//! [`query`] module.

mod activity;
mod control;
mod territory;

use std::{collections::HashSet, time::Duration};

use turf_war_core::{ActivityEntry, Command, ControlError, Event, TerritoryId, WELCOME_BANNER};

pub use activity::{ActivityLog, ACTIVITY_LOG_CAPACITY};
pub use territory::{default_roster, TerritorySeed};

use territory::Territory;

/// Represents the authoritative Turf War world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    seeds: Vec<TerritorySeed>,
    territories: Vec<Territory>,
    activity: ActivityLog,
    clock: Duration,
}

impl World {
    /// Creates a new world populated with the default city roster.
    #[must_use]
    pub fn new() -> Self {
        match Self::from_seeds(default_roster()) {
            Ok(world) => world,
            Err(error) => unreachable!("default roster is valid: {error}"),
        }
    }

    /// Creates a world from a custom roster.
    ///
    /// Territories are stored in ascending id order. The roster must be
    /// non-empty, use unique identifiers, and give every territory a positive
    /// seeded weight.
    pub fn from_seeds(mut seeds: Vec<TerritorySeed>) -> Result<Self, ControlError> {
        if seeds.is_empty() {
            return Err(ControlError::EmptyRoster);
        }

        seeds.sort_by_key(|seed| seed.id);
        let mut seen = HashSet::with_capacity(seeds.len());
        for seed in &seeds {
            if !seen.insert(seed.id) {
                return Err(ControlError::DuplicateTerritory(seed.id));
            }
        }

        let territories = seed_territories(&seeds)?;
        Ok(Self {
            banner: WELCOME_BANNER,
            seeds,
            territories,
            activity: ActivityLog::new(),
            clock: Duration::ZERO,
        })
    }

    fn territory_mut(&mut self, id: TerritoryId) -> Result<&mut Territory, ControlError> {
        self.territories
            .binary_search_by_key(&id, Territory::id)
            .map(|index| &mut self.territories[index])
            .map_err(|_| ControlError::UnknownTerritory(id))
    }

    fn reset(&mut self) -> Result<(), ControlError> {
        self.territories = seed_territories(&self.seeds)?;
        self.activity.clear();
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_territories(seeds: &[TerritorySeed]) -> Result<Vec<Territory>, ControlError> {
    seeds
        .iter()
        .map(|seed| {
            Territory::from_seed(seed.clone()).ok_or(ControlError::DegenerateWeights(seed.id))
        })
        .collect()
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave every territory untouched and push no events.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), ControlError> {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::ApplyTransaction {
            territory,
            faction,
            weight,
        } => {
            let at = world.clock;
            let record = world.territory_mut(territory)?;
            let Some(outcome) = control::apply_transaction(record, faction, weight)? else {
                return Ok(());
            };
            let territory_name = record.seed.name.clone();

            out_events.push(Event::TransactionApplied {
                territory,
                faction,
                weight,
                control: outcome.control,
            });
            if let Some(contested) = outcome.contested_changed {
                out_events.push(Event::ContestedChanged {
                    territory,
                    contested,
                });
            }
            if let Some(transition) = outcome.transition {
                world.activity.push(ActivityEntry {
                    territory,
                    territory_name,
                    from: transition.from,
                    to: transition.to,
                    at,
                });
                out_events.push(Event::OwnershipChanged {
                    territory,
                    from: transition.from,
                    to: transition.to,
                });
            }
        }
        Command::Reset => {
            world.reset()?;
            out_events.push(Event::WorldReset);
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{ActivityLog, World};
    use turf_war_core::{TerritoryId, TerritorySnapshot, TerritoryView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of every territory.
    #[must_use]
    pub fn territory_view(world: &World) -> TerritoryView {
        TerritoryView::from_snapshots(
            world
                .territories
                .iter()
                .map(|territory| territory.snapshot())
                .collect(),
        )
    }

    /// Captures a single territory, if it exists.
    #[must_use]
    pub fn territory(world: &World, id: TerritoryId) -> Option<TerritorySnapshot> {
        world
            .territories
            .binary_search_by_key(&id, |territory| territory.id())
            .ok()
            .map(|index| world.territories[index].snapshot())
    }

    /// Identifiers of every territory in ascending order.
    #[must_use]
    pub fn territory_ids(world: &World) -> Vec<TerritoryId> {
        world
            .territories
            .iter()
            .map(|territory| territory.id())
            .collect()
    }

    /// Provides read-only access to the recent ownership transitions.
    #[must_use]
    pub fn activity_log(world: &World) -> &ActivityLog {
        &world.activity
    }

    /// Simulated time elapsed since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turf_war_core::{FactionId, Position};

    fn transact(world: &mut World, id: u32, faction: FactionId, weight: f64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::ApplyTransaction {
                territory: TerritoryId::new(id),
                faction,
                weight,
            },
            &mut events,
        )
        .expect("transaction accepted");
        events
    }

    #[test]
    fn capture_of_neutral_territory_is_logged() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1200),
            },
            &mut events,
        )
        .expect("tick accepted");

        let events = transact(&mut world, 13, FactionId::Base, 3.0);
        assert!(events.contains(&Event::OwnershipChanged {
            territory: TerritoryId::new(13),
            from: None,
            to: FactionId::Base,
        }));

        let log = query::activity_log(&world);
        assert_eq!(log.len(), 1);
        let entry = log.latest().expect("entry recorded");
        assert_eq!(entry.territory_name, "North Central");
        assert_eq!(entry.from, None);
        assert_eq!(entry.to, FactionId::Base);
        assert_eq!(entry.at, Duration::from_millis(1200));
    }

    #[test]
    fn unknown_territory_is_rejected_without_side_effects() {
        let mut world = World::new();
        let before = query::territory_view(&world);
        let mut events = Vec::new();

        let error = apply(
            &mut world,
            Command::ApplyTransaction {
                territory: TerritoryId::new(99),
                faction: FactionId::Monad,
                weight: 1.0,
            },
            &mut events,
        )
        .expect_err("unknown territory must be rejected");

        assert_eq!(error, ControlError::UnknownTerritory(TerritoryId::new(99)));
        assert!(events.is_empty());
        assert_eq!(query::territory_view(&world), before);
    }

    #[test]
    fn zero_weight_emits_nothing() {
        let mut world = World::new();
        let events = transact(&mut world, 1, FactionId::Base, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn reset_restores_seeds_and_clears_log() {
        let mut world = World::new();
        let seeded = query::territory_view(&world);
        let _ = transact(&mut world, 1, FactionId::Base, 40.0);
        let _ = transact(&mut world, 14, FactionId::Hyperliquid, 5.0);
        assert_eq!(query::activity_log(&world).len(), 2);

        let mut events = Vec::new();
        apply(&mut world, Command::Reset, &mut events).expect("reset accepted");

        assert_eq!(events, vec![Event::WorldReset]);
        assert_eq!(query::territory_view(&world), seeded);
        assert!(query::activity_log(&world).is_empty());
    }

    #[test]
    fn roster_validation_rejects_duplicates_and_empty_rosters() {
        let seed = TerritorySeed::new(TerritoryId::new(3), "Dup", Position::new(1.0, 1.0));
        let error = World::from_seeds(vec![seed.clone(), seed]).expect_err("duplicate ids");
        assert_eq!(error, ControlError::DuplicateTerritory(TerritoryId::new(3)));

        let error = World::from_seeds(Vec::new()).expect_err("empty roster");
        assert_eq!(error, ControlError::EmptyRoster);
    }

    #[test]
    fn queries_expose_territories_in_id_order() {
        let world = World::from_seeds(vec![
            TerritorySeed::new(TerritoryId::new(8), "Eight", Position::new(80.0, 80.0)),
            TerritorySeed::new(TerritoryId::new(2), "Two", Position::new(20.0, 20.0))
                .owned_by(FactionId::Monad),
        ])
        .expect("valid roster");

        assert_eq!(
            query::territory_ids(&world),
            vec![TerritoryId::new(2), TerritoryId::new(8)]
        );
        let two = query::territory(&world, TerritoryId::new(2)).expect("present");
        assert_eq!(two.owner, Some(FactionId::Monad));
        assert!(query::territory(&world, TerritoryId::new(5)).is_none());
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }
}
