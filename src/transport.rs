//! Real-time connection handle
//!
//! The websocket is owned by an external connection manager. The store only
//! keeps a reference so components can reach it.

use std::fmt;

/// Handle to the widget's live connection
pub trait Transport: Send + Sync {
    /// Endpoint the connection was opened against
    fn endpoint(&self) -> &str;

    /// Whether the connection is currently usable
    fn is_connected(&self) -> bool;
}

impl fmt::Debug for dyn Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint())
            .field("connected", &self.is_connected())
            .finish()
    }
}
