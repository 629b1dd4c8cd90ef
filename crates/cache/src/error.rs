use thiserror::Error;

/// Errors raised by the cache registry.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The registry holds a cache of another type under this domain name.
    #[error("Cache registry type mismatch for domain {domain}")]
    TypeMismatch { domain: &'static str },

    /// A policy was registered after the domain's cache was already created.
    #[error("Cache for domain {domain} already exists; its policy can no longer change")]
    AlreadyCreated { domain: &'static str },
}

/// Result type for cache registry operations.
pub type Result<T> = std::result::Result<T, CacheError>;
