// src/extractors/mod.rs
pub mod appointment;
pub mod field;
pub mod officer;
pub mod patterns;

pub use officer::OfficerExtractor;
pub use patterns::ExtractionPatterns;
