//! Command implementations for the bamraster CLI

pub mod render;
