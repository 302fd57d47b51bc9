//! Canonical output records produced by every scanner parser.

pub mod finding;
