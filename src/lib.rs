//! plotmark - field survey annotation engine
//!
//! Point markers (wells, inlets, sample points) and freehand plot boundaries
//! drawn over a survey photograph, stored in a resolution-independent
//! percentage space.

pub mod app;
pub mod config;
pub mod constants;
pub mod coords;
pub mod drag;
pub mod draw;
pub mod error;
pub mod format;
pub mod handlers;
pub mod input;
pub mod message;
pub mod model;
pub mod render;
pub mod session;
pub mod store;

pub use error::{AnnotationError, AppError};
pub use message::Message;
pub use session::{ActiveTool, EditorSession, InteractionMode};
pub use store::Annotations;
