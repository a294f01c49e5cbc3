mod common;
mod driver_tests;
mod failure_tests;
mod lifecycle_tests;
