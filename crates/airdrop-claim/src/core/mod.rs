//! Core infrastructure: configuration, persistence, session, backend and
//! chain access, navigation, events and logging.

pub mod api;
pub mod chain;
pub mod config;
pub mod events;
pub mod logging;
pub mod navigation;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use chain::{AlloyChain, ChainClient, ContractCall, ReceiptOutcome};
pub use config::Config;
pub use events::{ClaimEvent, EventBus, Notification, NotificationLevel};
pub use logging::init_logging;
pub use navigation::{Navigator, Router};
pub use session::{SessionContext, SessionCredential};
pub use storage::Storage;
