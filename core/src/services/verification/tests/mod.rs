//! Tests for the verification controller

#[cfg(test)]
pub(crate) mod mocks;

#[cfg(test)]
mod controller_tests;
