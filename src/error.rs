//! Error types for the checked kernel wrappers.

use std::fmt;

/// Which caller-supplied container an offset indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Delta,
    Bias,
    Output,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Delta => f.write_str("delta"),
            Operand::Bias => f.write_str("bias"),
            Operand::Output => f.write_str("output"),
        }
    }
}

/// Error type for rejected kernel calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// A slice `[offset, offset + len)` does not fit in a container of
    /// `capacity` elements
    OutOfBounds {
        operand: Operand,
        offset: usize,
        len: usize,
        capacity: usize,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::OutOfBounds {
                operand,
                offset,
                len,
                capacity,
            } => {
                write!(
                    f,
                    "{operand} slice at offset {offset} of length {len} exceeds capacity {capacity}"
                )
            }
        }
    }
}

impl std::error::Error for KernelError {}
