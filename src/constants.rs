//! Application-wide constants
//!
//! Single source of truth for the storage layout and timing values used
//! throughout the application.

/// Profile storage constants
pub mod profiles {
    /// Application directory under the platform config dir
    pub const APP_DIR: &str = "zrpc";

    /// Subdirectory holding profile files
    pub const SUBDIR: &str = "profiles";

    /// File extension for persisted profiles
    pub const FILE_EXT: &str = "ini";

    /// Characters rejected in profile names (unsafe as filesystem entries)
    pub const UNSAFE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
}

/// Elapsed-time unit multipliers
pub mod elapsed {
    /// Seconds per hour
    pub const HOUR_SECS: f64 = 3600.0;

    /// Seconds per minute
    pub const MINUTE_SECS: f64 = 60.0;
}

/// Shutdown wait loop
pub mod shutdown {
    /// Interval between checks of the shutdown flag, in milliseconds
    pub const POLL_INTERVAL_MS: u64 = 200;
}
