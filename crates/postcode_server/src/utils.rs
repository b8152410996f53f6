//! Miscellaneous utilities.

pub mod diesel;
