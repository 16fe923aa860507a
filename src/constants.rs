//! Global constants for plotmark

/// Lower bound of the percentage coordinate space
pub const PERCENT_MIN: f32 = 0.0;

/// Upper bound of the percentage coordinate space
pub const PERCENT_MAX: f32 = 100.0;

/// Where a freshly placed marker appears before it is dragged
pub const DEFAULT_MARKER_POSITION: (f32, f32) = (50.0, 50.0);

/// Number of placeholder tasks in a seeded project
pub const DEFAULT_SEED_TASKS: usize = 131;

/// Survey year used for seeded tasks
pub const SURVEY_YEAR: &str = "115";

/// Default container size for SVG export when none is given
pub const DEFAULT_EXPORT_SIZE: (u32, u32) = (1200, 800);
