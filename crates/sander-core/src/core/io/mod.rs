//! Interfaces to the file-format collaborators the facade relies on.
//!
//! The facade never parses topology or coordinate files itself. In-memory topologies
//! serialize themselves through [`traits::TopologyWriter`], and restart files are read by
//! whatever [`traits::RestartParser`] the caller registers.

pub mod traits;
