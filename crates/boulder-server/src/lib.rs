//! Shared library surface for the boulder server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod seed;
pub mod state;
