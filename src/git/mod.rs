pub mod conflicts;
pub mod executor;
pub mod repository;

pub use conflicts::{apply_resolutions, parse_conflicts, ConflictBlock};
pub use executor::{CommandExecutor, ExecutionError, ExecutionResult};
pub use repository::{Repository, RepositorySnapshot};
