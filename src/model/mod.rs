//! Data models for survey annotations.

mod marker;
mod plot_range;
mod point;
mod task;

pub use marker::{Marker, MarkerKind};
pub use plot_range::{MIN_ENCLOSING_VERTICES, PlotRange};
pub use point::Point;
pub use task::{InspectionData, SurveyPhotos, SurveyTask, TaskStatus};
