//! Transport modes and their static routing policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transport mode: {0}")]
pub struct InvalidMode(String);

/// A way of travelling along a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Walk,
    Bicycle,
    Car,
    Transit,
}

impl TransportMode {
    /// Every mode, in declaration order.
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Walk,
        TransportMode::Bicycle,
        TransportMode::Car,
        TransportMode::Transit,
    ];

    /// Cruising speed in metres per second.
    pub fn speed_mps(self) -> f64 {
        match self {
            TransportMode::Walk => 1.4,
            TransportMode::Bicycle => 4.2,
            TransportMode::Car => 11.1,
            TransportMode::Transit => 8.3,
        }
    }

    /// Estimated travel time over `distance_meters`, truncated to whole seconds.
    pub fn duration_for_distance(self, distance_meters: f64) -> u64 {
        (distance_meters.max(0.0) / self.speed_mps()) as u64
    }

    /// Penalty in seconds charged when a path leaves this mode.
    ///
    /// Models parking the car or locking the bicycle.
    pub fn transfer_penalty(self) -> u64 {
        match self {
            TransportMode::Car => 300,
            TransportMode::Bicycle => 60,
            TransportMode::Walk | TransportMode::Transit => 0,
        }
    }

    /// Whether a path that arrived using `prev` may continue using `next`.
    ///
    /// A car or bicycle is only available from the start of a path: once
    /// the traveller has left it (or never had it), they cannot pick it up.
    pub fn can_transfer(prev: Option<TransportMode>, next: TransportMode) -> bool {
        match prev {
            None => true,
            Some(prev) if prev == next => true,
            Some(_) => !matches!(next, TransportMode::Car | TransportMode::Bicycle),
        }
    }

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Walk => "WALK",
            TransportMode::Bicycle => "BICYCLE",
            TransportMode::Car => "CAR",
            TransportMode::Transit => "TRANSIT",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WALK" => Ok(TransportMode::Walk),
            "BICYCLE" => Ok(TransportMode::Bicycle),
            "CAR" => Ok(TransportMode::Car),
            "TRANSIT" => Ok(TransportMode::Transit),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

/// A small set of transport modes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    /// The empty set.
    pub const fn empty() -> Self {
        ModeSet(0)
    }

    /// The set of every mode.
    pub fn all() -> Self {
        TransportMode::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, mode: TransportMode) {
        self.0 |= mode.bit();
    }

    pub fn contains(&self, mode: TransportMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = TransportMode> + '_ {
        TransportMode::ALL
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<TransportMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = TransportMode>>(iter: I) -> Self {
        let mut set = ModeSet::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
