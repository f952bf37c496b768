use crate::{fault::Fault, memory::Registers, op::AluOp};

/// Applies `op` to registers `reg_a` and `reg_b`, storing the result in `reg_a`.
/// Results wrap modulo 256.
pub fn apply(op: AluOp, registers: &mut Registers, reg_a: u8, reg_b: u8) -> Result<(), Fault> {
    let a = registers.get(reg_a)?;
    let b = registers.get(reg_b)?;
    let result = match op {
        AluOp::ADD => a.wrapping_add(b),
        AluOp::MUL => a.wrapping_mul(b),
        unsupported => return Err(Fault::UnsupportedAluOperation(unsupported)),
    };
    registers.set(reg_a, result)
}
