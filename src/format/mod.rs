//! Project files and scene export.
//!
//! - **Project JSON**: every task of a campaign with its annotations, versioned
//! - **SVG**: one composed scene, for review outside the editor

pub mod error;
pub mod project;
pub mod svg;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use project::{ProjectData, ProjectMetadata, current_timestamp};
pub use svg::{save_svg, write_svg};
