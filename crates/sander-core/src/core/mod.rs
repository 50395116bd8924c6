//! # Core Module
//!
//! Stateless building blocks shared by the facade and the native boundary.
//!
//! - **Arguments** ([`args`]) - The tagged union that replaces duck-typed caller input
//! - **Unit Cell** ([`cell`]) - The six-value periodic box and its normalization rules
//! - **Options** ([`options`]) - MM and QM/MM input option structs passed to the engine
//! - **Energies** ([`energy`]) - The per-term energy decomposition returned by the engine
//! - **Collaborators** ([`io`]) - Traits for topology writers and restart parsers

pub mod args;
pub mod cell;
pub mod energy;
pub mod io;
pub mod options;
