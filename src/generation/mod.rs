//! Value generation
//!
//! `scalars` draws leaf values from a seeded RNG. `composite` fills arrays,
//! collections, maps and enumerations, recursing into synthesis for element
//! types.

mod composite;
pub mod scalars;

pub use self::scalars::ScalarGenerator;
