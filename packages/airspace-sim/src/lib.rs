//! # airspace-sim
//!
//! Demo and traffic tooling around the deconfliction pipeline: primary
//! mission templates, seeded background-traffic generation, named demo
//! scenarios, text report rendering and JSON artifact export.

pub mod export;
pub mod primary;
pub mod report;
pub mod scenarios;
pub mod traffic;
