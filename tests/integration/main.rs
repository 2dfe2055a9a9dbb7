//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific part of the
//! beacon pipeline against mock adapters.  All tests run on the host
//! (x86_64) with no real hardware required.

mod mock_hw;
mod pipeline_tests;
mod radio_tests;
mod sleep_tests;
