#![forbid(unsafe_code)]

pub mod model;
pub mod sampler;
pub mod scoring;
pub mod time;

pub use sampler::{DEFAULT_SAMPLE_SIZE, Sampler};
pub use scoring::{BASE_POINTS, ScoreDelta, score_answer};
pub use time::Clock;
