pub mod translator;

pub use translator::{translate_app_error, translate_git_output, UserFriendlyError};
