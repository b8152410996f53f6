//! Functions and types dealing with the Japan Post data files.

pub mod import;
pub mod japan_post;
