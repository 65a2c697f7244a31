//! Environment variable helpers for tests.
#![allow(dead_code)]

use env_lock::{EnvGuard as LockedEnvGuard, lock_env};
use tracing::{instrument, trace};

/// RAII guard to restore environment variables on drop.
///
/// Holding the guard also serializes every test that touches the process
/// environment.
pub struct EnvGuard<'a> {
    _guard: LockedEnvGuard<'a>,
}

impl<'a> EnvGuard<'a> {
    #[must_use]
    #[instrument]
    pub fn set(key: &'a str, value: &str) -> Self {
        trace!(key, value, "Setting env var");
        let guard = lock_env([(key, Some(value))]);
        Self { _guard: guard }
    }

    /// Point `HOME` at `home` and clear the cheatx overrides.
    #[must_use]
    pub fn isolated_home(home: &str) -> Self {
        trace!(home, "Isolating home directory");
        let guard = lock_env([
            ("HOME", Some(home)),
            ("USERPROFILE", Some(home)),
            ("CHEATX_CATALOG", None),
            ("CHEATX_PREFS", None),
        ]);
        Self { _guard: guard }
    }
}
