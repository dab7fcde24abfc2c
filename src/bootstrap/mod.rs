//! Application bootstrapping.
//!
//! This module includes all the functions to build the application, its
//! dependencies, and run the background jobs.
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
