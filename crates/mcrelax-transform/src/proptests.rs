//! Property-based tests for whole-expression relaxations.
//!
//! Random expressions over `x` and a positive `y` are rewritten, assembled
//! and compiled; the four bounds must then enclose the true value at any
//! point of any sub-box of the declared domain.
