//! Factorio bridge for connection resolving
//!
//! Reads world state from a running Factorio server over RCON:
//!
//! - **Commands**: Lua chunks sent with `/sc`, answered through `rcon.print`
//! - **Snapshots**: entities around a point, decoded into the entity model
//!   and frozen into a [`WorldSnapshot`] that serves occupancy queries
//!
//! Nothing here mutates the game.

mod bridge;
mod rcon;
mod snapshot;

pub use bridge::{FactorioConfig, FactorioWorld};
pub use rcon::{MAX_PACKET_SIZE, RconClient, RconPacket};
pub use snapshot::{EntityRecord, FluidConnection, WorldSnapshot};
