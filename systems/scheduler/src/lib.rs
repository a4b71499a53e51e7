#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic scheduler that drives background skirmishes and user attacks.
//!
//! The scheduler never touches the world. It consumes
//! [`Event::TimeAdvanced`] to measure elapsed time and answers with
//! [`Command::ApplyTransaction`] batches; user attacks go through the same
//! command surface so both sources are serialised by the world's `apply`.

use std::time::Duration;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use turf_war_core::{Command, Event, FactionId, Selection, TerritoryId, TerritoryView};

/// Weight committed by each background skirmish.
pub const RANDOM_TICK_WEIGHT: f64 = 1.0;

/// Weight committed by an explicit user attack.
pub const ATTACK_WEIGHT: f64 = 3.0;

/// Default delay between background skirmishes.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1200);

/// Inclusive range an operator may choose the skirmish period from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodBounds {
    min: Duration,
    max: Duration,
}

impl PeriodBounds {
    /// Creates bounds from the provided limits.
    ///
    /// Returns `None` when `min` is zero or exceeds `max`.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Option<Self> {
        if min.is_zero() || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    /// Shortest permitted period.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Longest permitted period.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Clamps a requested period into the bounds.
    #[must_use]
    pub fn clamp(&self, period: Duration) -> Duration {
        period.clamp(self.min, self.max)
    }
}

impl Default for PeriodBounds {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(350),
            max: Duration::from_millis(2200),
        }
    }
}

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    period: Duration,
    bounds: PeriodBounds,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence and seed.
    #[must_use]
    pub fn new(period: Duration, rng_seed: u64) -> Self {
        Self {
            period,
            bounds: PeriodBounds::default(),
            rng_seed,
        }
    }

    /// Replaces the permitted period range.
    #[must_use]
    pub fn with_bounds(mut self, bounds: PeriodBounds) -> Self {
        self.bounds = bounds;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD, 0)
    }
}

/// Cancellable periodic driver that emits background skirmishes.
#[derive(Debug)]
pub struct SimulationScheduler {
    period: Duration,
    bounds: PeriodBounds,
    accumulator: Duration,
    running: bool,
    rng: ChaCha8Rng,
}

impl SimulationScheduler {
    /// Creates a running scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period: config.bounds.clamp(config.period),
            bounds: config.bounds,
            accumulator: Duration::ZERO,
            running: true,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Current delay between skirmishes.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Range the period is clamped into.
    #[must_use]
    pub const fn bounds(&self) -> PeriodBounds {
        self.bounds
    }

    /// Reports whether background skirmishes are being emitted.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Pauses or resumes the scheduler.
    ///
    /// Pausing discards the partially elapsed period so nothing can fire
    /// afterwards; resuming starts a fresh period instead of replaying the
    /// skirmishes that would have happened while paused.
    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            self.accumulator = Duration::ZERO;
        }
        self.running = running;
    }

    /// Changes the skirmish period, returning the value actually applied.
    ///
    /// Elapsed phase is kept but capped at the new period, so a shorter period
    /// releases at most one skirmish on the next update.
    pub fn set_period(&mut self, period: Duration) -> Duration {
        self.period = self.bounds.clamp(period);
        self.accumulator = self.accumulator.min(self.period);
        self.period
    }

    /// Consumes world events and emits one skirmish per elapsed period.
    pub fn handle(&mut self, events: &[Event], territories: &[TerritoryId], out: &mut Vec<Command>) {
        if !self.running || territories.is_empty() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_fire_count() {
            let Some(&territory) = territories.choose(&mut self.rng) else {
                return;
            };
            let faction = self.random_faction();
            out.push(Command::ApplyTransaction {
                territory,
                faction,
                weight: RANDOM_TICK_WEIGHT,
            });
        }
    }

    /// Emits a user attack on behalf of the selected faction.
    ///
    /// The target is the selected territory if there is one, else the first
    /// contested territory, else a uniformly random territory. Returns the
    /// resolved target, or `None` when no faction is selected or the board is
    /// empty.
    pub fn attack(
        &mut self,
        selection: &Selection,
        view: &TerritoryView,
        out: &mut Vec<Command>,
    ) -> Option<TerritoryId> {
        let faction = selection.faction?;
        let territory = match selection.territory {
            Some(territory) => territory,
            None => match view.first_contested() {
                Some(snapshot) => snapshot.id,
                None => self.random_territory(view)?,
            },
        };

        out.push(Command::ApplyTransaction {
            territory,
            faction,
            weight: ATTACK_WEIGHT,
        });
        Some(territory)
    }

    fn resolve_fire_count(&mut self) -> usize {
        if self.period.is_zero() {
            return 0;
        }

        let mut fires = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            fires += 1;
        }
        fires
    }

    fn random_faction(&mut self) -> FactionId {
        FactionId::ALL[self.rng.gen_range(0..FactionId::COUNT)]
    }

    fn random_territory(&mut self, view: &TerritoryView) -> Option<TerritoryId> {
        if view.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..view.len());
        view.iter().nth(index).map(|snapshot| snapshot.id)
    }
}
