//! Analyzer module - grid layout grading engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::GradingEngine;
pub use scoring::GradeScale;
