//! Route composition: the search over the transportation graph.
//!
//! This module owns the business rule that decides which combinations of
//! segments form a valid journey, and the collaborator contracts it consumes
//! (location resolution, weekday-filtered segment lookup).

mod compose;

pub use compose::{LocationDirectory, RouteComposer, RouteError, SegmentCatalog};
