//! Exit codes of `partview-settings`.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success                                   |
//! | 1    | General error                             |
//! | 2    | Usage error (bad arguments)               |
//! | 3    | Settings file unreadable or unwritable    |
//! | 4    | Unknown setting key or group              |
//! | 5    | Value rejected by the setting             |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

/// The settings file could not be read, parsed or written.
pub const EXIT_STORE: u8 = 3;

/// No setting or group with the given key.
pub const EXIT_UNKNOWN_KEY: u8 = 4;

/// The value could not be parsed or failed validation.
pub const EXIT_INVALID_VALUE: u8 = 5;
