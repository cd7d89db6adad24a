//! Domain types shared by the Coach Score repository and service crates.
pub mod types;
