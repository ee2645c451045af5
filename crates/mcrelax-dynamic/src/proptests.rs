//! Property-based tests for expanded systems.
//!
//! The expanded decay system `x' = -k x` is integrated with explicit Euler
//! next to the original system. With the same step, every original
//! trajectory started inside the bounds must stay between `lo` and `hi`, and
//! the trajectory through the nominal point between `cv` and `cc`.
