//! Integration tests for rolegate
//!
//! These tests verify end-to-end functionality across modules.

mod decision_integration;
