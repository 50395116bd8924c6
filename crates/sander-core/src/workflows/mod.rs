//! # Workflows Module
//!
//! Complete procedures built from the session facade.
//!
//! - **Single Point** ([`single_point`]) - Set up a calculation, evaluate energies and
//!   forces once, and tear the calculation down again, reporting each phase.

pub mod single_point;
