use thiserror::Error;

/// A trap raised while executing a program. `ip` is the index of the
/// offending instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("runtime error: argument slot {slot} out of range for {len} arguments (ip={ip})")]
    IndexOutOfRange { ip: usize, slot: usize, len: usize },

    #[error("runtime error: stack underflow (ip={ip})")]
    StackUnderflow { ip: usize },

    #[error("runtime error: division by zero (ip={ip})")]
    DivisionByZero { ip: usize },

    #[error("runtime error: stack size limit exceeded ({limit}) (ip={ip})")]
    StackLimitExceeded { ip: usize, limit: usize },
}

impl RuntimeError {
    /// Index of the instruction that trapped.
    pub fn ip(&self) -> usize {
        match self {
            RuntimeError::IndexOutOfRange { ip, .. }
            | RuntimeError::StackUnderflow { ip }
            | RuntimeError::DivisionByZero { ip }
            | RuntimeError::StackLimitExceeded { ip, .. } => *ip,
        }
    }
}
