use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Environment variable holding a path list of kouchconfig files to merge.
pub const KOUCHCONFIG_ENV: &str = "KOUCHCONFIG";

/// Read [`KOUCHCONFIG_ENV`] from the process environment.
pub fn kouchconfig_var() -> Option<OsString> {
    std::env::var_os(KOUCHCONFIG_ENV)
}

/// Split a path-list value using the platform delimiter (`:` on Unix, `;` on
/// Windows). Empty entries are dropped. An empty or missing value yields `None`
/// so the caller falls through to the default path.
///
/// Takes the raw value so tests can pass synthetic data instead of the real
/// environment.
pub fn config_paths(value: Option<&OsStr>) -> Option<Vec<PathBuf>> {
    let value = value.filter(|v| !v.is_empty())?;
    let paths: Vec<PathBuf> = std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect();
    (!paths.is_empty()).then_some(paths)
}
