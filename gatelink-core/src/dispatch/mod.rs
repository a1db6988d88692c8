//! Channel routing and dispatch of validated frames
//!
//! A frame's channel selects a route from [`ROUTES`]; the offset of the
//! channel from the route's base selects the output within that subsystem.

pub mod router;
pub mod routes;

pub use router::{Dispatch, IgnoreReason, Router};
pub use routes::{resolve, Route, Target, GPIO_BASE, RELAY_BASE, ROUTES};
