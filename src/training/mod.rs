//! Generational training: matches, tournaments, selection and
//! reproduction, plus per-generation metrics.

pub mod episode;
pub mod metrics;
pub mod population;
pub mod tournament;
pub mod trainer;
