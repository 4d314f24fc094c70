//! Whole-program tests for the backend
//!
//! - `translator_tests` - dispatcher behaviour: options, stats, error locations
//! - `program_tests` - translated programs executed on the simulator

mod translator_tests;
