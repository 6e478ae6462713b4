use crate::handle::Category;

/// Native error code as reported by the OS (`errno` on unix, `GetLastError`
/// on windows). Windows codes are reinterpreted as `i32`, the same way
/// [`std::io::Error::from_raw_os_error`] expects them.
pub type OsErrorCode = i32;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The allocator (or heap) could not satisfy the request.
    #[error("out of memory")]
    OutOfMemory,
    /// An OS-level mapping, heap or thread operation failed.
    #[error("native resource operation failed (os error {code})")]
    ResourceError { code: OsErrorCode },
    /// A handle value could not be decoded to a native address.
    #[error("invalid handle")]
    InvalidHandle,
    /// The OS refused to create a thread.
    #[error("failed to create native thread")]
    ThreadCreateError(#[source] std::io::Error),
    /// A tagged handle was passed to an operation of another category.
    #[error("expected a {expected:?} handle, got a {found:?} handle")]
    WrongCategory { expected: Category, found: Category },
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("failed to install logger")]
    Logger(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HarnessError {
    /// Builds a [`HarnessError::ResourceError`] from the calling thread's last OS error.
    pub(crate) fn last_os_error() -> Self {
        let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        HarnessError::ResourceError { code }
    }

    /// The native error behind a [`HarnessError::ResourceError`], if this is one.
    pub fn os_error(&self) -> Option<std::io::Error> {
        match self {
            HarnessError::ResourceError { code } => Some(std::io::Error::from_raw_os_error(*code)),
            _ => None,
        }
    }
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_exposes_os_error() {
        let err = HarnessError::ResourceError { code: 12 };
        assert_eq!(err.os_error().and_then(|e| e.raw_os_error()), Some(12));
        assert!(err.to_string().contains("12"));

        assert!(HarnessError::OutOfMemory.os_error().is_none());
    }

    #[test]
    fn wrong_category_message_names_both_sides() {
        let err = HarnessError::WrongCategory { expected: Category::Raw, found: Category::Mapping };
        let msg = err.to_string();
        assert!(msg.contains("Raw") && msg.contains("Mapping"), "{msg}");
    }
}
