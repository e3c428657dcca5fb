pub mod analyze;
pub mod cli;
pub mod entropy;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod score;
pub mod util;

pub use entropy::{aggregate_entropy, per_file_entropy};
pub use error::{AlmanackError, Result};
pub use git::GitRepo;
pub use model::{FileChangeCount, FileEntropy};
