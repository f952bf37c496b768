use thiserror::Error;

use crate::op::AluOp;

/// Reasons an instruction can fail. Every fault is fatal to the run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("memory address {0:#04X} is out of bounds")]
    AddressOutOfBounds(usize),
    #[error("register R{0} is out of bounds")]
    RegisterOutOfBounds(u8),
    #[error("unknown instruction")]
    UnknownInstruction,
    #[error("unsupported ALU operation {0}")]
    UnsupportedAluOperation(AluOp),
    #[error("stack overflow with sp at {0:#04X}")]
    StackOverflow(u8),
    #[error("stack underflow with sp at {0:#04X}")]
    StackUnderflow(u8),
}
