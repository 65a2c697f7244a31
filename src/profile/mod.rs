//! Export profiles: the catalog data model, the session registry, and
//! starter templates.

mod registry;
mod schema;
mod template;

pub use registry::{BUILTIN_CATALOG, PINNED_PROFILE_ID, ProfileRegistry, custom_id};
pub use schema::{
    Extension, IdentifierFormat, Profile, ProfileKind, ProfileOrigin, Template,
    normalize_extension,
};
pub use template::{ApplyMode, apply_template, default_template};
