#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interactive Turf War session.
//!
//! A [`Session`] owns the world and wires the scheduler, standings and
//! renderer around it. Every mutation, whether a background skirmish or a
//! user attack, is turned into [`Command`]s and executed through
//! [`world::apply`], so transactions on a territory are applied one at a time
//! in issue order.

mod config;

use std::time::Duration;

use tracing::{debug, info, warn};
use turf_war_core::{
    ActivityEntry, Command, ControlError, Event, FactionId, Selection, TerritoryId, TerritoryView,
};
use turf_war_rendering::{
    AnimationPhase, FieldParams, FieldSnapshot, InfluenceFieldRenderer, PixelBuffer, Resolution,
};
use turf_war_system_scheduler::SimulationScheduler;
use turf_war_system_standings::{Standings, StandingsReport};
use turf_war_world::{self as world, query, World};

pub use config::{ConfigError, SessionConfig};

/// Live simulation plus the presentation-side selection.
#[derive(Debug)]
pub struct Session {
    world: World,
    territory_ids: Vec<TerritoryId>,
    scheduler: SimulationScheduler,
    renderer: InfluenceFieldRenderer,
    selection: Selection,
}

impl Session {
    /// Creates a session over the default city roster.
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        Self::with_world(World::new(), config)
    }

    /// Creates a session over an existing world.
    pub fn with_world(world: World, config: &SessionConfig) -> Result<Self, ConfigError> {
        let mut scheduler = SimulationScheduler::new(config.scheduler_config()?);
        scheduler.set_running(config.simulating);
        let renderer = InfluenceFieldRenderer::new(FieldParams::default())
            .with_frame_interval(config.frame_interval()?)
            .map_err(|_| ConfigError::ZeroFrameInterval)?;

        info!(
            territories = query::territory_ids(&world).len(),
            seed = config.seed,
            period_ms = scheduler.period().as_millis() as u64,
            simulating = config.simulating,
            "session started"
        );

        Ok(Self {
            territory_ids: query::territory_ids(&world),
            world,
            scheduler,
            renderer,
            selection: Selection::default(),
        })
    }

    /// Greeting shown when the session opens.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Current faction and territory selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Chooses the faction user attacks are made on behalf of.
    pub fn select_faction(&mut self, faction: Option<FactionId>) {
        debug!(faction = ?faction, "faction selected");
        self.selection.faction = faction;
    }

    /// Singles out the territory user attacks target.
    ///
    /// Unknown identifiers are rejected and leave the selection unchanged.
    pub fn select_territory(&mut self, territory: Option<TerritoryId>) -> Result<(), ControlError> {
        if let Some(id) = territory {
            if query::territory(&self.world, id).is_none() {
                warn!(territory = %id, "rejected selection of unknown territory");
                return Err(ControlError::UnknownTerritory(id));
            }
        }
        debug!(territory = ?territory.map(|id| id.get()), "territory selected");
        self.selection.territory = territory;
        Ok(())
    }

    /// Commits an attack for the selected faction.
    ///
    /// Returns the territory that was hit, or `None` when no faction is
    /// selected.
    pub fn attack(&mut self) -> Result<Option<TerritoryId>, ControlError> {
        let view = query::territory_view(&self.world);
        let mut commands = Vec::new();
        let Some(target) = self.scheduler.attack(&self.selection, &view, &mut commands) else {
            debug!("attack ignored without a selected faction");
            return Ok(None);
        };

        let mut events = Vec::new();
        self.execute(commands, &mut events)?;
        Ok(Some(target))
    }

    /// Restores the seeded board and clears the activity log.
    pub fn reset(&mut self) -> Result<(), ControlError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Reset, &mut events)?;
        info!("board reset to seeded state");
        Ok(())
    }

    /// Changes the background skirmish period, returning the clamped value applied.
    pub fn set_tick_period(&mut self, period: Duration) -> Duration {
        let applied = self.scheduler.set_period(period);
        if applied != period {
            warn!(
                requested_ms = period.as_millis() as u64,
                applied_ms = applied.as_millis() as u64,
                "tick period clamped"
            );
        } else {
            debug!(period_ms = applied.as_millis() as u64, "tick period changed");
        }
        applied
    }

    /// Current background skirmish period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.scheduler.period()
    }

    /// Pauses or resumes background skirmishes.
    pub fn set_simulating(&mut self, simulating: bool) {
        if simulating != self.scheduler.is_running() {
            info!(simulating, "background simulation toggled");
        }
        self.scheduler.set_running(simulating);
    }

    /// Reports whether background skirmishes are running.
    #[must_use]
    pub const fn is_simulating(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Advances simulated time by `dt`.
    ///
    /// Runs every background skirmish that came due and steps the animation
    /// clock. Returns all events the world emitted, starting with
    /// [`Event::TimeAdvanced`].
    pub fn advance(&mut self, dt: Duration) -> Result<Vec<Event>, ControlError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events)?;

        let mut commands = Vec::new();
        self.scheduler
            .handle(&events, &self.territory_ids, &mut commands);
        self.execute(commands, &mut events)?;

        let _ = self.renderer.advance(dt);
        Ok(events)
    }

    /// Simulated time elapsed since the session started.
    #[must_use]
    pub fn clock(&self) -> Duration {
        query::clock(&self.world)
    }

    /// Snapshot of every territory.
    #[must_use]
    pub fn territories(&self) -> TerritoryView {
        query::territory_view(&self.world)
    }

    /// Recent ownership transitions, newest first.
    #[must_use]
    pub fn activity_log(&self) -> Vec<ActivityEntry> {
        query::activity_log(&self.world).to_vec()
    }

    /// Ownership summary of the board.
    #[must_use]
    pub fn standings(&self) -> StandingsReport {
        Standings::from_view(&self.territories())
    }

    /// Current animation phase of the influence field.
    #[must_use]
    pub const fn animation_phase(&self) -> AnimationPhase {
        self.renderer.phase()
    }

    /// Renders the influence field of the current board.
    #[must_use]
    pub fn rasterize(&self, resolution: Resolution) -> PixelBuffer {
        let snapshot = FieldSnapshot::from_view(&self.territories());
        self.renderer.render(&snapshot, resolution)
    }

    fn execute(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) -> Result<(), ControlError> {
        for command in commands {
            let first_new = events.len();
            if let Err(error) = world::apply(&mut self.world, command, events) {
                warn!(%error, "command rejected");
                return Err(error);
            }
            for event in &events[first_new..] {
                log_event(event);
            }
        }
        Ok(())
    }
}

fn log_event(event: &Event) {
    match event {
        Event::OwnershipChanged {
            territory,
            from,
            to,
        } => {
            info!(territory = %territory, from = ?from, to = %to, "territory changed hands");
        }
        Event::ContestedChanged {
            territory,
            contested,
        } => {
            debug!(territory = %territory, contested, "contested state changed");
        }
        Event::TransactionApplied {
            territory,
            faction,
            weight,
            ..
        } => {
            debug!(territory = %territory, faction = %faction, weight, "transaction applied");
        }
        Event::TimeAdvanced { .. } | Event::WorldReset => {}
    }
}
