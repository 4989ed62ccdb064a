//! Integration tests module
//!
//! This module organizes all integration tests for the r-wavstream application.

pub mod config_test;
pub mod playback_test;
