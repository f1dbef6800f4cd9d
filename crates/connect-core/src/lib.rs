//! # connect-core
//!
//! Core types shared by the connection resolvers and the Factorio bridge.
//!
//! This crate provides:
//! - Grid geometry (positions, directions, footprints)
//! - The closed entity model the resolvers dispatch over
//! - Belt groups and connection endpoints
//! - The occupancy query capability injected into resolvers
//! - Error types

pub mod belt;
pub mod connection;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod query;

pub use belt::{BeltGroup, TransportBelt};
pub use connection::{ConnectionPair, Endpoint};
pub use entity::{Entity, EntityKind};
pub use error::{ConnectError, Result};
pub use geometry::{Dimensions, Direction, Position};
pub use query::EntityQuery;
