//! Best-placement tracking with deterministic tie-breaking.

pub(crate) mod best;
