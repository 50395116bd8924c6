//! # Engine Module
//!
//! The session facade over the sander energy engine.
//!
//! ## Overview
//!
//! The engine can hold exactly one calculation at a time, and every query (energies,
//! forces, positions, box) is only meaningful while that calculation is active. This
//! module turns those process-wide rules into ownership: [`session::Sander`] owns the
//! engine handle, validates and normalizes caller input before anything reaches the
//! engine, and hands out [`session::Session`] guards that tear the calculation down when
//! they go out of scope.
//!
//! ## Architecture
//!
//! - **Facade** ([`session`]) - Setup, cleanup, scoped sessions and pass-through queries
//! - **Backend Seam** ([`backend`]) - The trait over the engine's entry points
//! - **Configuration** ([`config`]) - Builder for single-point calculation parameters
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for long-running callers
//! - **Error Handling** ([`error`]) - Argument errors and engine failures
//!
//! ## Key Capabilities
//!
//! - **Validation before side effects**: a malformed box, a missing QM/MM option set or an
//!   argument of the wrong type is reported before a temporary file is written or the
//!   engine is called
//! - **Temporary topologies**: in-memory topology objects are written to a `.parm7` file
//!   that lives exactly as long as the setup call
//! - **Guaranteed teardown**: scoped sessions clean up on normal exit, early return and
//!   panic, and never clean up twice

pub mod backend;
pub mod config;
pub mod error;
pub(crate) mod normalize;
pub mod progress;
pub mod session;
