use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::memory::Cell;

/// which of the two stacks a fault happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    Data,
    Return,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Data => write!(f, "data"),
            StackKind::Return => write!(f, "return"),
        }
    }
}

/// Everything that can stop a run early. `addr` is always the address of
/// the instruction that was executing when the fault happened.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("unable to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid instruction at {addr}, opcode {opcode}")]
    InvalidOpcode { addr: Cell, opcode: Cell },

    #[error("{stack} stack overflow at {addr}")]
    StackOverflow { stack: StackKind, addr: Cell },

    #[error("{stack} stack underflow at {addr}")]
    StackUnderflow { stack: StackKind, addr: Cell },

    #[error("division by zero at {addr}")]
    DivisionByZero { addr: Cell },

    #[error("memory access out of bounds at {addr}: address {target}")]
    OutOfBounds { addr: Cell, target: Cell },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_opcode_message() {
        let e = VmError::InvalidOpcode {
            addr: 0,
            opcode: 9999,
        };
        assert_eq!(e.to_string(), "invalid instruction at 0, opcode 9999");
    }

    #[test]
    fn test_stack_fault_message() {
        let e = VmError::StackOverflow {
            stack: StackKind::Return,
            addr: 12,
        };
        assert_eq!(e.to_string(), "return stack overflow at 12");
    }

    #[test]
    fn test_load_message() {
        let e = VmError::Load {
            path: PathBuf::from("ngbImage"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.to_string().starts_with("unable to load image ngbImage"));
    }
}
