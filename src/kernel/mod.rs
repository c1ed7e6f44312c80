//! Headless workspace core (state/action/effect).

pub mod action;
pub mod dnd;
pub mod effect;
pub mod error;
pub mod language;
pub mod services;
pub mod shared;
pub mod state;
pub mod store;
pub mod sync;
pub mod tabs;
pub mod terminal;

pub use action::Action;
pub use dnd::{DragController, DragState, DropOutcome};
pub use effect::Effect;
pub use error::{ExternalIoError, WorkspaceError};
pub use language::LanguageId;
pub use shared::{SharedStore, WorkspaceSnapshot};
pub use state::{AppState, ExtensionsState, Notice, NoticeLevel};
pub use store::{DispatchResult, Store};
pub use sync::ContentSyncBridge;
pub use tabs::{Tab, TabSet};
pub use terminal::{CommandRequest, LineKind, RequestId, TerminalLine, TerminalState};
