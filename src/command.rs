//! Command execution for the devtools CLI.
//!
//! Each subcommand is a short, linear batch transform: read inputs (files
//! or API responses), apply template substitution, write output. Commands
//! parse configuration, then delegate to a `run` function that takes plain
//! inputs so tests can drive it directly.

pub mod gen_all_tests_js;
pub mod gen_test_htmls;
pub mod release_notes;
