use thiserror::Error;

/// Everything that can go wrong during a review run.
///
/// Only `FileUnavailable` is recoverable; it is handled inside
/// `git::read_contents` and never reaches `main`. The rest abort the
/// invocation with a non-zero exit, but never block the underlying
/// git push or commit (the hook script must always `|| true` us).
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("repository access error: {0}")]
    RepositoryAccess(String),

    #[error("file unavailable: {0}")]
    FileUnavailable(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("review service unavailable: {0}")]
    ServiceUnavailable(String),
}
