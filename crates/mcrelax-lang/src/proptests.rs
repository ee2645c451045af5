//! Property-based tests for the interchange format.
