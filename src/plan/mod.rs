//! Export planning: field values, placeholder substitution, path safety,
//! and the planner itself.

pub mod fields;
pub mod placeholder;
pub mod planner;
pub mod sanitize;

pub use fields::{ExportFields, derive_cheat_name};
pub use placeholder::{Placeholder, placeholders_in};
pub use planner::{ExportPlan, PathPlanner, materialize};
