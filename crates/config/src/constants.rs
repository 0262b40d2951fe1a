//! Centralized constants for the layered configuration crate.
//!
//! This module contains the separators and well-known names shared by
//! sources, the resolver, and the loader.

// =============================================================================
// Key & Value Syntax
// =============================================================================

/// Separator between segments of a configuration path (`server/port`).
pub const KEY_SEPARATOR: char = '/';

/// Separator between elements when a string is coerced into a list.
pub const LIST_SEPARATOR: char = ',';

// =============================================================================
// Environment
// =============================================================================

/// Environment variable that disables `.env` file loading when set to `true` or `1`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Error Reporting
// =============================================================================

/// Prefix of the aggregate error returned when field resolution failed.
pub const AGGREGATE_ERROR_PREFIX: &str = "failed building config";

/// Separator used when joining field-level error messages.
pub const AGGREGATE_ERROR_SEPARATOR: &str = "; ";
