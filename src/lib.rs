//! Tomato backend application library
//!
//! Startup sequence pieces shared by the `tomato-app` and `tomato` binaries.

pub mod bootstrap;
pub mod modules;
