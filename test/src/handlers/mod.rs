//! Demo routes whose access is decided by stored permission expressions.

pub mod documents;
