#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Turf War engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Presentation code never touches
//! the store directly; it reads [`TerritoryView`] snapshots instead.

use std::{
    fmt,
    ops::{Index, IndexMut},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Turf War.";

/// Control share a faction must strictly exceed to take ownership of a territory.
pub const OWNERSHIP_THRESHOLD: f64 = 50.0;

/// Control share below which an active territory counts as contested.
pub const CONTESTED_THRESHOLD: f64 = 55.0;

/// Accumulated weight a territory must strictly exceed before it can be contested.
pub const CONTESTED_MIN_ACTIVITY: f64 = 5.0;

/// Colour used for neutral ground that no faction has claimed.
pub const NEUTRAL_COLOR: Rgb = Rgb::from_rgb(150, 150, 150);

/// Competing factions, listed in their canonical enumeration order.
///
/// The order is significant: whenever two factions tie, the one that appears
/// first in [`FactionId::ALL`] wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactionId {
    /// The Base faction.
    Base,
    /// The Hyperliquid faction.
    Hyperliquid,
    /// The Monad faction.
    Monad,
}

impl FactionId {
    /// Number of factions taking part in the simulation.
    pub const COUNT: usize = 3;

    /// Every faction in canonical enumeration order.
    pub const ALL: [FactionId; Self::COUNT] =
        [FactionId::Base, FactionId::Hyperliquid, FactionId::Monad];

    /// Zero-based position of the faction within [`FactionId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Base => 0,
            Self::Hyperliquid => 1,
            Self::Monad => 2,
        }
    }

    /// Human readable faction name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Hyperliquid => "Hyperliquid",
            Self::Monad => "Monad",
        }
    }

    /// Display colours associated with the faction.
    #[must_use]
    pub const fn palette(self) -> FactionPalette {
        match self {
            Self::Base => FactionPalette {
                primary: Rgb::from_rgb(0x00, 0x52, 0xff),
                light: Rgb::from_rgb(0x33, 0x73, 0xff),
                dark: Rgb::from_rgb(0x00, 0x41, 0xcc),
            },
            Self::Hyperliquid => FactionPalette {
                primary: Rgb::from_rgb(0x3f, 0xed, 0xc0),
                light: Rgb::from_rgb(0x6f, 0xf2, 0xd0),
                dark: Rgb::from_rgb(0x2b, 0xc9, 0xa0),
            },
            Self::Monad => FactionPalette {
                primary: Rgb::from_rgb(0x83, 0x6e, 0xf9),
                light: Rgb::from_rgb(0x9d, 0x8b, 0xfa),
                dark: Rgb::from_rgb(0x6b, 0x56, 0xe0),
            },
        }
    }

    /// Primary display colour of the faction.
    #[must_use]
    pub const fn color(self) -> Rgb {
        self.palette().primary
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// sRGB colour expressed as byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Primary colour of a faction together with its accent variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FactionPalette {
    /// Main colour used for fills and the influence field.
    pub primary: Rgb,
    /// Lighter accent used for highlights.
    pub light: Rgb,
    /// Darker accent used for outlines.
    pub dark: Rgb,
}

/// Fixed-size table holding one value per faction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FactionTable<T> {
    values: [T; FactionId::COUNT],
}

impl<T: Copy> FactionTable<T> {
    /// Creates a table populated with the same value for every faction.
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self {
            values: [value; FactionId::COUNT],
        }
    }

    /// Creates a table from values listed in canonical faction order.
    #[must_use]
    pub const fn from_array(values: [T; FactionId::COUNT]) -> Self {
        Self { values }
    }

    /// Creates a table by evaluating `f` once per faction.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(FactionId) -> T) -> Self {
        Self {
            values: FactionId::ALL.map(&mut f),
        }
    }

    /// Value stored for the provided faction.
    #[must_use]
    pub fn get(&self, faction: FactionId) -> T {
        self.values[faction.index()]
    }

    /// Iterates `(faction, value)` pairs in canonical faction order.
    pub fn iter(&self) -> impl Iterator<Item = (FactionId, T)> + '_ {
        FactionId::ALL
            .iter()
            .map(move |faction| (*faction, self.values[faction.index()]))
    }

    /// Underlying values in canonical faction order.
    #[must_use]
    pub const fn as_array(&self) -> &[T; FactionId::COUNT] {
        &self.values
    }
}

impl FactionTable<f64> {
    /// Sum of every faction's value.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Faction holding the largest value, together with that value.
    ///
    /// Exact ties resolve to the faction that appears first in
    /// [`FactionId::ALL`].
    #[must_use]
    pub fn leader(&self) -> (FactionId, f64) {
        let mut leader = (FactionId::ALL[0], self.values[0]);
        for (faction, value) in self.iter().skip(1) {
            if value > leader.1 {
                leader = (faction, value);
            }
        }
        leader
    }
}

impl<T> Index<FactionId> for FactionTable<T> {
    type Output = T;

    fn index(&self, faction: FactionId) -> &Self::Output {
        &self.values[faction.index()]
    }
}

impl<T> IndexMut<FactionId> for FactionTable<T> {
    fn index_mut(&mut self, faction: FactionId) -> &mut Self::Output {
        &mut self.values[faction.index()]
    }
}

/// Percentage share of each faction's influence over a territory.
pub type ControlVector = FactionTable<f64>;

/// Accumulated transaction weight each faction has committed to a territory.
pub type WeightVector = FactionTable<f64>;

/// Unique identifier assigned to a territory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerritoryId(u32);

impl TerritoryId {
    /// Creates a new territory identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Planar position on the city map, measured in percent of each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Largest coordinate value along either axis.
    pub const EXTENT: f32 = 100.0;

    /// Creates a position, clamping both coordinates into `0.0..=100.0`.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(0.0, Self::EXTENT),
            y: y.clamp(0.0, Self::EXTENT),
        }
    }

    /// Horizontal coordinate in `0.0..=100.0`.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in `0.0..=100.0`.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Position rescaled into the unit square.
    #[must_use]
    pub fn normalized(&self) -> (f32, f32) {
        (self.x / Self::EXTENT, self.y / Self::EXTENT)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Commits weight from one faction to one territory.
    ApplyTransaction {
        /// Territory receiving the transaction.
        territory: TerritoryId,
        /// Faction committing the weight.
        faction: FactionId,
        /// Non-negative weight added to the faction's running total.
        weight: f64,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Restores every territory to its seeded state and clears the activity log.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a transaction was folded into a territory's weights.
    TransactionApplied {
        /// Territory that received the transaction.
        territory: TerritoryId,
        /// Faction that committed the weight.
        faction: FactionId,
        /// Weight that was added.
        weight: f64,
        /// Control vector after the update.
        control: ControlVector,
    },
    /// Announces that a territory changed hands.
    OwnershipChanged {
        /// Territory whose owner changed.
        territory: TerritoryId,
        /// Owner before the transition, if any.
        from: Option<FactionId>,
        /// Owner after the transition.
        to: FactionId,
    },
    /// Announces that a territory entered or left the contested state.
    ContestedChanged {
        /// Territory whose contested flag flipped.
        territory: TerritoryId,
        /// New value of the flag.
        contested: bool,
    },
    /// Confirms that the world returned to its seeded configuration.
    WorldReset,
}

/// Immutable representation of a single territory used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TerritorySnapshot {
    /// Unique identifier assigned to the territory.
    pub id: TerritoryId,
    /// Display name.
    pub name: String,
    /// Short flavour line shown alongside the name.
    pub vibe: String,
    /// Location on the city map.
    pub position: Position,
    /// Percentage share per faction; sums to 100.
    pub control: ControlVector,
    /// Accumulated transaction weight per faction.
    pub weights: WeightVector,
    /// Faction currently owning the territory, if any.
    pub owner: Option<FactionId>,
    /// Whether no faction holds a comfortable majority on an active territory.
    pub contested: bool,
}

/// Read-only snapshot describing every territory on the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerritoryView {
    snapshots: Vec<TerritorySnapshot>,
}

impl TerritoryView {
    /// Creates a new territory view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TerritorySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TerritorySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided territory.
    #[must_use]
    pub fn get(&self, id: TerritoryId) -> Option<&TerritorySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// First contested territory in ascending id order.
    #[must_use]
    pub fn first_contested(&self) -> Option<&TerritorySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.contested)
    }

    /// Number of territories captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TerritorySnapshot> {
        self.snapshots
    }
}

/// Record of a single ownership transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Territory that changed hands.
    pub territory: TerritoryId,
    /// Display name of the territory at the time of the transition.
    pub territory_name: String,
    /// Owner before the transition, if any.
    pub from: Option<FactionId>,
    /// Owner after the transition.
    pub to: FactionId,
    /// Simulated time at which the transition happened.
    pub at: Duration,
}

/// Presentation-side selection consumed by user attacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Faction the player is attacking with.
    pub faction: Option<FactionId>,
    /// Territory the player has singled out as the attack target.
    pub territory: Option<TerritoryId>,
}

/// Reasons a world mutation may be refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ControlError {
    /// No territory with the provided identifier exists.
    #[error("unknown territory {0}")]
    UnknownTerritory(TerritoryId),
    /// The transaction weight was negative or not a finite number.
    #[error("invalid transaction weight {0}")]
    InvalidWeight(f64),
    /// The territory's accumulated weights sum to zero, so percentages are undefined.
    #[error("territory {0} has no accumulated weight")]
    DegenerateWeights(TerritoryId),
    /// Two roster entries share the same identifier.
    #[error("territory {0} appears more than once in the roster")]
    DuplicateTerritory(TerritoryId),
    /// The roster does not contain any territory.
    #[error("roster must contain at least one territory")]
    EmptyRoster,
}
