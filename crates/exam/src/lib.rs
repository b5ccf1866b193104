//! Exam packages: a questions document and an answers document, zipped.

pub mod package;

pub use package::ExamPackage;
