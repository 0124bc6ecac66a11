//! Application layer: events, the reducer, and the services around it.

pub mod dispatcher;
pub mod events;
pub mod input;
pub mod reducer;
pub mod session;
