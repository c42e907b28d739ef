//! Device backends.
//!
//! The host supplies its own [`FixedFunctionDevice`](crate::FixedFunctionDevice)
//! implementation. This module provides the backends that ship with the crate.
//!
//! # Available Backends
//!
//! - `dummy` (default): Headless recording backend for tests, demos and
//!   environments without a GPU

#[cfg(feature = "dummy")]
pub mod dummy;

#[cfg(feature = "dummy")]
pub use dummy::{DeviceStateSnapshot, RecordingDevice};
