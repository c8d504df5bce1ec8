//! Runtime utilities for statuscope.

/// Shutdown signalling: OS interrupt future and cooperative stop tokens
pub mod shutdown;
