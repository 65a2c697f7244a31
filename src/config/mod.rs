//! Configuration: preferences, structured file formats, and path helpers.

pub mod format;
pub mod path;
pub mod prefs;

pub use format::ConfigFormat;
pub use path::{
    default_catalog_path, default_export_root, default_prefs_path, expand_tilde, home_dir,
    resolve_path,
};
pub use prefs::{
    CustomProfile, DEFAULT_CORE_LABEL, DEFAULT_RETROARCH_CORES, Preferences, ProfileSort,
};
