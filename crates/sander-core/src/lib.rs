//! # sander
//!
//! A typed, session-managing facade over the sander molecular mechanics and QM/MM
//! energy and force engine.
//!
//! The library implements no physics. All force-field evaluation, QM/MM coupling and
//! particle-mesh Ewald electrostatics happen inside the precompiled `libsander`; this
//! crate normalizes caller input into the exact argument shapes the engine expects and
//! keeps track of the single calculation the engine can hold at a time.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data: the loosely-typed argument union
//!   ([`core::args::Arg`]), the periodic unit cell, MM and QM option structs, the energy
//!   decomposition, and the collaborator traits for topology writing and restart parsing.
//!
//! - **[`engine`]: The Session Facade.** [`engine::session::Sander`] owns one
//!   [`engine::backend::Backend`] handle, validates every argument before the engine is
//!   touched, and hands out scoped [`engine::session::Session`] guards that tear the
//!   calculation down when they leave scope.
//!
//! - **`native`: The Engine Boundary.** Behind the `native` cargo feature, FFI
//!   declarations for `libsander` and the process-wide `NativeBackend`.
//!
//! - **[`workflows`]: The Public API.** Complete procedures, such as a single-point
//!   energy and force evaluation, built from the facade.

pub mod core;
pub mod engine;
#[cfg(feature = "native")]
pub mod native;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
