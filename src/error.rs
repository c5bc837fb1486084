use jni::JNIEnv;
use thiserror::Error;

/// Area engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AreaEngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Event worker stopped")]
    WorkerStopped,

    #[error("JNI error: {0}")]
    JniError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, AreaEngineError>;

impl AreaEngineError {
    /// Java exception class matching this error kind
    pub fn java_exception_class(&self) -> &'static str {
        match self {
            AreaEngineError::InvalidConfig(_) => "java/lang/IllegalArgumentException",
            AreaEngineError::LockPoisoned(_) | AreaEngineError::WorkerStopped => {
                "java/lang/IllegalStateException"
            }
            AreaEngineError::JniError(_) | AreaEngineError::Internal(_) => {
                "java/lang/RuntimeException"
            }
        }
    }
}

impl From<jni::errors::Error> for AreaEngineError {
    fn from(err: jni::errors::Error) -> Self {
        AreaEngineError::JniError(err.to_string())
    }
}

/// Throw Java exception from Rust error
pub fn throw_java_exception(env: &mut JNIEnv, error: &AreaEngineError) -> EngineResult<()> {
    let message = error.to_string();
    env.throw_new(error.java_exception_class(), message)
        .map_err(|_| AreaEngineError::JniError("Failed to throw exception".to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_class_mapping() {
        assert_eq!(
            AreaEngineError::InvalidConfig("x".into()).java_exception_class(),
            "java/lang/IllegalArgumentException"
        );
        assert_eq!(
            AreaEngineError::WorkerStopped.java_exception_class(),
            "java/lang/IllegalStateException"
        );
        assert_eq!(
            AreaEngineError::Internal("x".into()).java_exception_class(),
            "java/lang/RuntimeException"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AreaEngineError::InvalidConfig("preview_points must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: preview_points must be > 0"
        );
    }
}
