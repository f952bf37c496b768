use std::fmt::Debug;

use log::{debug, trace};
use thiserror::Error;

use crate::alu;
use crate::debugger::Debugger;
use crate::device::{Output, StdoutOutput};
use crate::fault::Fault;
use crate::load::LoadError;
use crate::memory::{Memory, Registers, MEMORY_SIZE, STACK_TOP};
use crate::op::{Op, OpCode};

/// A fatal error, tagged with where it happened.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Fatal error at pc {pc:#04X}{}", describe_opcode(.opcode))]
pub struct VmError {
    pub pc: usize,
    /// `None` when the opcode itself couldn't be fetched.
    pub opcode: Option<u8>,
    #[source]
    pub fault: Fault,
}

fn describe_opcode(opcode: &Option<u8>) -> String {
    opcode
        .map(|opcode| format!(" executing opcode {:#010b}", opcode))
        .unwrap_or_default()
}

/// How pc moves once a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance by the instruction's width.
    Next,
    Jump(usize),
    Halt,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StopReason {
    Halted,
    CycleLimit,
}

pub struct Vm {
    pub memory: Memory,
    pub registers: Registers,
    pub pc: usize,
    pub debugger: Option<Box<dyn Debugger>>,
    running: bool,
    program_len: usize,
    output: Box<dyn Output>,
}

impl Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("pc", &self.pc)
            .field("registers", self.registers.as_array())
            .field("running", &self.running)
            .field("program_len", &self.program_len)
            .finish()
    }
}

impl Vm {
    pub fn empty() -> Self {
        Self {
            memory: Memory::new(),
            registers: Registers::new(),
            pc: 0,
            debugger: None,
            running: true,
            program_len: 0,
            output: Box::new(StdoutOutput),
        }
    }

    /// Copies a decoded program image into memory at address 0. The stack may
    /// not grow down into the image.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MEMORY_SIZE {
            return Err(LoadError::TooLarge(program.len()));
        }
        self.memory.load(program)?;
        self.program_len = program.len();
        debug!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Replaces the PRN sink, returning the previous one.
    pub fn set_output(&mut self, output: Box<dyn Output>) -> Box<dyn Output> {
        std::mem::replace(&mut self.output, output)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn push(&mut self, value: u8) -> Result<(), Fault> {
        let sp = self.registers.sp();
        if sp as usize <= self.program_len {
            return Err(Fault::StackOverflow(sp));
        }
        let sp = sp - 1;
        self.memory.write(sp as usize, value)?;
        self.registers.set_sp(sp);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u8, Fault> {
        let sp = self.registers.sp();
        if sp >= STACK_TOP {
            return Err(Fault::StackUnderflow(sp));
        }
        let value = self.memory.read(sp as usize)?;
        self.registers.set_sp(sp + 1);
        Ok(value)
    }

    /// Runs until HLT or a fatal error.
    pub fn run(&mut self) -> Result<(), VmError> {
        while self.running {
            self.step()?;
        }
        debug!("Halted at pc {:#04X}", self.pc);
        Ok(())
    }

    pub fn run_until(&mut self, max_cycles: u64) -> Result<StopReason, VmError> {
        let mut cycles = 0;
        while self.running {
            if cycles >= max_cycles {
                debug!("Cycle limit {} reached at pc {:#04X}", max_cycles, self.pc);
                return Ok(StopReason::CycleLimit);
            }
            self.step()?;
            cycles += 1;
        }
        debug!("Halted at pc {:#04X} after {} cycles", self.pc, cycles);
        Ok(StopReason::Halted)
    }

    pub fn step(&mut self) -> Result<(), VmError> {
        if !self.running {
            return Ok(());
        }

        let pc = self.pc;
        let opcode = self.memory.read(pc).map_err(|fault| VmError {
            pc,
            opcode: None,
            fault,
        })?;
        let op = Op::from_byte(opcode).ok_or(VmError {
            pc,
            opcode: Some(opcode),
            fault: Fault::UnknownInstruction,
        })?;
        trace!("{:#04X}: {}", pc, op);

        let mut debugger = self.debugger.take();
        if let Some(debugger) = debugger.as_mut() {
            debugger.op_read(self, &op);
        }

        let result = self.run_op(op);
        if let Ok(flow) = result {
            match flow {
                Flow::Next => self.pc += op.len(),
                Flow::Jump(address) => self.pc = address,
                Flow::Halt => self.running = false,
            }
            if let Some(debugger) = debugger.as_mut() {
                debugger.op_executed(self, &op);
            }
        }
        self.debugger = debugger;

        result.map(|_| ()).map_err(|fault| VmError {
            pc,
            opcode: Some(opcode),
            fault,
        })
    }

    fn operands(&self, op: &Op) -> Result<[u8; 2], Fault> {
        let mut operands = [0; 2];
        for (n, operand) in operands.iter_mut().take(op.operand_count()).enumerate() {
            *operand = self.memory.read(self.pc + 1 + n)?;
        }
        Ok(operands)
    }

    fn run_op(&mut self, op: Op) -> Result<Flow, Fault> {
        let [a, b] = self.operands(&op)?;
        match op {
            Op::Basic(opcode) => match opcode {
                OpCode::LDI => {
                    self.registers.set(a, b)?;
                }
                OpCode::PRN => {
                    let value = self.registers.get(a)?;
                    self.output.print(value);
                }
                OpCode::HLT => {
                    return Ok(Flow::Halt);
                }
                OpCode::PUSH => {
                    let value = self.registers.get(a)?;
                    self.push(value)?;
                }
                OpCode::POP => {
                    // Check the target before touching the stack
                    self.registers.get(a)?;
                    let value = self.pop()?;
                    self.registers.set(a, value)?;
                }
                OpCode::JMP => {
                    return Ok(Flow::Jump(self.registers.get(a)? as usize));
                }
            },
            Op::Alu(alu_op) => {
                alu::apply(alu_op, &mut self.registers, a, b)?;
            }
        }
        Ok(Flow::Next)
    }

    /// One line snapshot: pc, the next three bytes of memory and all registers.
    pub fn trace(&self) -> String {
        let byte_at = |address: usize| {
            self.memory
                .read(address)
                .map(|byte| format!("{:02X}", byte))
                .unwrap_or_else(|_| "--".to_owned())
        };
        let registers = self
            .registers
            .as_array()
            .iter()
            .map(|register| format!(" {:02X}", register))
            .collect::<String>();

        format!(
            "TRACE: {:02X} | {} {} {} |{}",
            self.pc,
            byte_at(self.pc),
            byte_at(self.pc + 1),
            byte_at(self.pc + 2),
            registers
        )
    }
}
