// Job management: CRUD over jobs, weight edits routed through the propagator,
// and per-job candidate statistics.

pub mod handlers;
pub mod stats;
