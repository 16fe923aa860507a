//! Unit tests for the project file and SVG export.

mod project_tests;
