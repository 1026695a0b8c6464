//! Route composition server.
//!
//! Finds all valid multi-leg journeys between two locations on a travel
//! date, combining scheduled transportation segments (flights, buses,
//! subways, ride-hail) into complete itineraries, and serves repeated
//! queries from a cache that segment mutations invalidate.

pub mod cache;
pub mod catalog;
pub mod domain;
pub mod routing;
pub mod web;
