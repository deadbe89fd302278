pub mod engine;
pub mod session;

pub use engine::{ActiveRootPolicy, ActiveTierLimits, SyncLog, SyncRecord, UnlockState};
pub use session::EditorSession;
