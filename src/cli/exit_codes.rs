//! exit codes for ifday commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// condition could not be evaluated (invalid name, syntax, safety)
pub const INVALID_CONDITION: i32 = 2;

/// condition evaluated to false (only with `eval --check`)
pub const CONDITION_FALSE: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;
