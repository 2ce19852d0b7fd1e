//! Integration tests for the package tracker
//!
//! These tests run the tracker against wiremock servers standing in for the
//! carrier sites, with real JSON files in temporary directories.

mod common;
mod menu_tests;
mod tracking_tests;
