//! Common error infrastructure for event-core.
//!
//! This module provides shared types and traits used across all error types in
//! event-core. Domain-specific errors (e.g., `FactoryError`, `ProgramError`) are
//! defined next to the components that raise them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each layer has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Local Recovery**: Authoring-time errors are recoverable; a malformed
//!   program is rejected before it runs

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The offending instruction is dropped or replaced and the
///   surrounding work continues
/// - **Validation**: Invalid input that must be rejected as a whole
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - the caller drops or replaces the failing unit.
    ///
    /// Examples: unknown command tag, undecodable parameter blob
    Recoverable,

    /// Validation error - reject the request without retry.
    ///
    /// Examples: interpreter already running, unbalanced flow markers
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a resolver scan ran past the end of a validated program
    Internal,

    /// Fatal error - cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all event-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EventError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
