pub mod confirm;
pub mod console;
pub mod preview;
pub mod resolve;

pub use confirm::{confirm, Approval, Decision, CONFIRM_PHRASE};
pub use console::{Console, Theme};
pub use resolve::ConflictChoice;
