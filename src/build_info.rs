//! Build metadata baked in by `build.rs`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_COMMIT: &str = env!("TOOLGATE_BUILD_GIT_HASH");
pub const BUILD_TIMESTAMP: &str = env!("TOOLGATE_BUILD_TIMESTAMP");

/// Trailer appended to `toolgate --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("TOOLGATE_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("TOOLGATE_BUILD_TIMESTAMP")
);

/// Multi-line text for `toolgate --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TOOLGATE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TOOLGATE_BUILD_TIMESTAMP")
);

/// One-line form used in debug logs at startup.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}
