// Core modules implementing traversal, byte transforms, and error modeling.
pub mod content;
pub mod error;
pub mod fixeol;
pub mod rename;
pub mod report;
pub mod walk;
