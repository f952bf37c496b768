use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use strum::{Display, IntoStaticStr};

// Opcode layout is AABCDDDD: AA is the operand count, B marks an ALU op.
const OPERAND_COUNT_SHIFT: u8 = 6;
const ALU_FLAG: u8 = 0b0010_0000;

#[derive(FromPrimitive, Display, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    HLT = 0b0000_0001,
    LDI = 0b1000_0010,
    PRN = 0b0100_0111,
    PUSH = 0b0100_0101,
    POP = 0b0100_0110,
    JMP = 0b0101_0100,
}

#[derive(FromPrimitive, Display, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    ADD = 0b1010_0000,
    SUB = 0b1010_0001,
    MUL = 0b1010_0010,
    DIV = 0b1010_0011,
    MOD = 0b1010_0100,
    INC = 0b0110_0101,
    DEC = 0b0110_0110,
    CMP = 0b1010_0111,
    AND = 0b1010_1000,
    NOT = 0b0110_1001,
    OR = 0b1010_1010,
    XOR = 0b1010_1011,
    SHL = 0b1010_1100,
    SHR = 0b1010_1101,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Basic(OpCode),
    Alu(AluOp),
}

impl Op {
    pub fn from_byte(byte: u8) -> Option<Self> {
        if byte & ALU_FLAG == ALU_FLAG {
            AluOp::from_u8(byte).map(Op::Alu)
        } else {
            OpCode::from_u8(byte).map(Op::Basic)
        }
    }

    pub fn to_byte(&self) -> u8 {
        match self {
            Op::Basic(opcode) => *opcode as u8,
            Op::Alu(alu_op) => *alu_op as u8,
        }
    }

    pub fn operand_count(&self) -> usize {
        (self.to_byte() >> OPERAND_COUNT_SHIFT) as usize
    }

    /// Instruction width in bytes, opcode included.
    pub fn len(&self) -> usize {
        1 + self.operand_count()
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Basic(opcode) => (*opcode).into(),
            Op::Alu(alu_op) => (*alu_op).into(),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
