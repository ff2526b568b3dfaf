//! `ChatFAQ` widget conversation store
//!
//! Client-side state for an embedded chat widget: the sender's past
//! conversations, the active message chain, and the UI flags components
//! react to, backed by the broker REST API.

pub mod broker;
pub mod config;
pub mod references;
pub mod store;
pub mod transport;

pub use broker::{BrokerClient, BrokerError, BrokerErrorKind, HttpBroker, LoggingBroker};
pub use config::WidgetConfig;
pub use references::{index_layer_refs, GroupedStackEntry, Layer};
pub use store::{ConversationStore, StoreError, StoreResult, StoreState, UiFlags};
pub use transport::Transport;
