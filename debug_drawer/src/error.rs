//! Draw protocol errors.

use std::fmt;

use crate::topology::Topology;

/// Misuse of the `begin` / `add_vertex` / `end` protocol.
///
/// These are programming errors. Debug builds panic when one is detected;
/// release builds reject the call and leave every batch unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawProtocolError {
    /// `begin` was called while a batch was already open.
    NestedBegin(Topology),
    /// A vertex or `end` arrived with no batch open.
    NoOpenBatch,
}

impl fmt::Display for DrawProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedBegin(topology) => {
                write!(f, "begin called while the {topology} batch is still open")
            }
            Self::NoOpenBatch => write!(f, "no batch is open"),
        }
    }
}

impl std::error::Error for DrawProtocolError {}

/// Report a protocol violation: fatal in debug builds, logged otherwise.
pub(crate) fn violation(err: DrawProtocolError) -> DrawProtocolError {
    if cfg!(debug_assertions) {
        panic!("draw protocol violation: {err}");
    }
    log::error!("draw protocol violation: {err}");
    err
}
