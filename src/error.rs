use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlmanackError>;

#[derive(Error, Debug)]
pub enum AlmanackError {
    #[error("Unresolvable commit '{rev}': {reason}")]
    UnresolvableCommit { rev: String, reason: String },
    #[error("Repository access error: {0}")]
    RepositoryAccess(String),
    #[error("Repository has no commits reachable from HEAD")]
    EmptyHistory,
    #[error("Clone error: {0}")]
    Clone(String),
    #[error("Diff error: {0}")]
    Diff(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlmanackError {
    pub fn unresolvable(rev: &str, reason: impl ToString) -> Self {
        AlmanackError::UnresolvableCommit {
            rev: rev.to_string(),
            reason: reason.to_string(),
        }
    }
}

// gix errors are large; they are flattened into the two access categories
// callers care about instead of being carried as boxed sources.
impl From<gix::discover::Error> for AlmanackError {
    fn from(err: gix::discover::Error) -> Self {
        AlmanackError::RepositoryAccess(err.to_string())
    }
}

impl From<gix::open::Error> for AlmanackError {
    fn from(err: gix::open::Error) -> Self {
        AlmanackError::RepositoryAccess(err.to_string())
    }
}

impl From<gix::object::find::existing::Error> for AlmanackError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        AlmanackError::RepositoryAccess(err.to_string())
    }
}

impl From<gix::object::commit::Error> for AlmanackError {
    fn from(err: gix::object::commit::Error) -> Self {
        AlmanackError::RepositoryAccess(err.to_string())
    }
}

impl From<gix::objs::decode::Error> for AlmanackError {
    fn from(err: gix::objs::decode::Error) -> Self {
        AlmanackError::RepositoryAccess(err.to_string())
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for AlmanackError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        AlmanackError::Diff(err.to_string())
    }
}
