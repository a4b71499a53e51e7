#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure standings system summarising how much of the city each faction holds.

use turf_war_core::{FactionId, FactionTable, TerritoryView};

/// Territory count and board share for one side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Holding {
    /// Number of territories held.
    pub count: usize,
    /// Share of all territories held, in percent.
    pub share: f64,
}

impl Holding {
    fn new(count: usize, total: usize) -> Self {
        let share = if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        };
        Self { count, share }
    }
}

/// Ownership summary of the whole board.
#[derive(Clone, Debug, PartialEq)]
pub struct StandingsReport {
    factions: FactionTable<Holding>,
    neutral: Holding,
    total: usize,
}

impl StandingsReport {
    /// Holding of the provided faction.
    #[must_use]
    pub fn faction(&self, faction: FactionId) -> Holding {
        self.factions.get(faction)
    }

    /// Holdings of every faction in canonical order.
    pub fn factions(&self) -> impl Iterator<Item = (FactionId, Holding)> + '_ {
        self.factions.iter()
    }

    /// Territories without an owner.
    #[must_use]
    pub const fn neutral(&self) -> Holding {
        self.neutral
    }

    /// Number of territories on the board.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Faction holding the most territories, if one leads outright.
    #[must_use]
    pub fn frontrunner(&self) -> Option<FactionId> {
        let mut best: Option<(FactionId, usize)> = None;
        let mut tied = false;
        for (faction, holding) in self.factions.iter() {
            match best {
                Some((_, count)) if holding.count == count => tied = true,
                Some((_, count)) if holding.count < count => {}
                _ => {
                    best = Some((faction, holding.count));
                    tied = false;
                }
            }
        }
        match best {
            Some((faction, count)) if count > 0 && !tied => Some(faction),
            _ => None,
        }
    }
}

/// Derives standings from immutable territory views.
#[derive(Debug, Default)]
pub struct Standings;

impl Standings {
    /// Summarises ownership across the provided view.
    #[must_use]
    pub fn from_view(view: &TerritoryView) -> StandingsReport {
        let mut counts = FactionTable::splat(0_usize);
        let mut neutral = 0;
        for snapshot in view.iter() {
            match snapshot.owner {
                Some(owner) => counts[owner] += 1,
                None => neutral += 1,
            }
        }

        let total = view.len();
        StandingsReport {
            factions: FactionTable::from_fn(|faction| Holding::new(counts[faction], total)),
            neutral: Holding::new(neutral, total),
            total,
        }
    }
}
