//! Connection point resolution
//!
//! Given two things that must be linked by a belt or a pipe, decide which
//! grid points on each are legal, unobstructed attachment points and in
//! which order a router should try them.
//!
//! - [`FluidConnectionResolver`] handles pipe links between fluid handlers
//! - [`TransportConnectionResolver`] handles belt links between belts,
//!   belt groups, inserters, drills and bare positions
//!
//! Both return every source x target combination sorted by Manhattan
//! distance, never an empty list. Whether a pair can actually be built is
//! decided by the caller's placement routine, see [`attempt_in_order`].

mod fluid;
mod resolver;
mod transport;

pub use fluid::FluidConnectionResolver;
pub use resolver::{
    ConnectionKind, OCCUPANCY_RADIUS, Resolver, attempt_in_order, is_blocked, rank_pairs,
    resolver_for,
};
pub use transport::TransportConnectionResolver;
