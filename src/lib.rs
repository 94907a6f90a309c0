pub mod grading;
pub mod import;
pub mod simulation;
pub(crate) mod utils;

pub use grading::{GradeReport, TaskGrader};
