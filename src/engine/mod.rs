//! Per-instant pipeline: interpolate values, rank them, lay out bars.
//!
//! Every function here is synchronous and pure; the scheduler decides when they run.

pub(crate) mod interp;
pub(crate) mod layout;
pub(crate) mod rank;
pub(crate) mod scale;
