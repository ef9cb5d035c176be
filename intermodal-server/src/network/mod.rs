//! The live network searches run against.
//!
//! The graph only ever grows. Each growth step produces a fresh
//! [`Network`] snapshot which is swapped in atomically; searches keep using
//! whatever snapshot they started with.

mod expand;
mod snapshot;

pub use expand::{Expander, Expansion, OdPair};
pub use snapshot::{Network, NetworkHandle, NetworkStats};
