//! Default values for Gloss configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Atlas Defaults
// ============================================================================

/// Default Atlas base URL.
pub const DEFAULT_ATLAS_URL: &str = "http://localhost:21000";

/// Default Atlas user.
pub const DEFAULT_ATLAS_USERNAME: &str = "admin";

/// Default Atlas password.
pub const DEFAULT_ATLAS_PASSWORD: &str = "admin";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path prefix of the Atlas v2 REST API.
pub const ATLAS_API_PREFIX: &str = "/api/atlas/v2";

/// Maximum number of glossaries requested from the basic search endpoint.
pub const DEFAULT_SEARCH_LIMIT: u32 = 1000;

// ============================================================================
// Import Defaults
// ============================================================================

/// Dry-run is on unless explicitly disabled.
pub const DEFAULT_DRY_RUN: bool = true;

/// Default log level for the CLI.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Status given to categories and terms that don't declare one.
pub const DEFAULT_ENTITY_STATUS: &str = "Active";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file names, checked in order.
pub const LOCAL_CONFIG_FILES: &[&str] = &["gloss.yaml", "config.yaml"];

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "gloss";

/// File name inside the user config directory.
pub const USER_CONFIG_FILE: &str = "config.yaml";

// ============================================================================
// Relationship Defaults
// ============================================================================

/// Relationship kinds recorded in both directions.
pub const DEFAULT_BIDIRECTIONAL_TYPES: &[&str] =
    &["synonym", "antonym", "related_term", "see_also"];

/// Relationship kinds recorded only from source to target.
pub const DEFAULT_UNIDIRECTIONAL_TYPES: &[&str] =
    &["preferred_term", "replacement_term", "is_a", "classifies"];
