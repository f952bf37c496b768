use crate::{
    memory::{REGISTER_COUNT, SP},
    op::Op,
    vm::Vm,
};

/// Hooks called around every executed instruction.
pub trait Debugger {
    fn op_read(&mut self, vm_state: &Vm, op: &Op);
    fn op_executed(&mut self, vm_state: &Vm, op: &Op);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegState {
    registers: [u8; REGISTER_COUNT],
    pc: usize,
    running: bool,
}

impl RegState {
    fn capture(vm_state: &Vm) -> Self {
        RegState {
            registers: *vm_state.registers.as_array(),
            pc: vm_state.pc,
            running: vm_state.is_running(),
        }
    }

    /// Describes what changed between `self` and `other`. Sequential pc
    /// advances for `op` aren't reported.
    fn diff(&self, other: &RegState, op: &Op) -> Option<String> {
        let mut diffs = Vec::new();

        for (index, (prev, cur)) in self.registers.iter().zip(other.registers.iter()).enumerate() {
            if prev != cur {
                let name = if index == SP as usize {
                    "SP".to_owned()
                } else {
                    format!("R{}", index)
                };
                diffs.push(format!("{} {:#04X} -> {:#04X}", name, prev, cur));
            }
        }

        if self.running && other.running && other.pc != self.pc + op.len() {
            diffs.push(format!("PC {:#04X} -> {:#04X}", self.pc, other.pc));
        }

        if self.running && !other.running {
            diffs.push("halted".to_owned());
        }

        if diffs.is_empty() {
            None
        } else {
            Some(diffs.join(", "))
        }
    }
}

/// Prints a trace line to stderr before every instruction. The verbose
/// variant also prints the mnemonic and what the instruction changed.
pub struct TraceDebugger {
    verbose: bool,
    last_reg_state: RegState,
}

impl TraceDebugger {
    pub fn new() -> Self {
        TraceDebugger {
            verbose: false,
            last_reg_state: RegState::default(),
        }
    }

    pub fn verbose() -> Self {
        TraceDebugger {
            verbose: true,
            last_reg_state: RegState::default(),
        }
    }
}

impl Default for TraceDebugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Debugger for TraceDebugger {
    fn op_read(&mut self, vm_state: &Vm, op: &Op) {
        if self.verbose {
            eprintln!("{} {}", vm_state.trace(), op);
        } else {
            eprintln!("{}", vm_state.trace());
        }
        self.last_reg_state = RegState::capture(vm_state);
    }

    fn op_executed(&mut self, vm_state: &Vm, op: &Op) {
        if !self.verbose {
            return;
        }
        let new_reg_state = RegState::capture(vm_state);
        if let Some(diff) = self.last_reg_state.diff(&new_reg_state, op) {
            eprintln!("  {}", diff);
        }
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use crate::{
        device::MemoryOutput,
        op::{AluOp, OpCode},
    };

    use super::*;

    struct RecordingDebugger {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl Debugger for RecordingDebugger {
        fn op_read(&mut self, vm_state: &Vm, op: &Op) {
            self.events
                .borrow_mut()
                .push(format!("read {} at {}", op, vm_state.pc));
        }

        fn op_executed(&mut self, vm_state: &Vm, op: &Op) {
            self.events
                .borrow_mut()
                .push(format!("executed {} now at {}", op, vm_state.pc));
        }
    }

    #[test]
    fn hooks() {
        let mut vm = Vm::empty();
        vm.load(&[0x82, 0x00, 0x08, 0x47, 0x00, 0x01]).unwrap();
        let (_, output) = MemoryOutput::new();
        vm.set_output(Box::new(output));
        let events = Rc::new(RefCell::new(Vec::new()));
        vm.debugger = Some(Box::new(RecordingDebugger {
            events: Rc::clone(&events),
        }));

        vm.run().unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                "read LDI at 0",
                "executed LDI now at 3",
                "read PRN at 3",
                "executed PRN now at 5",
                "read HLT at 5",
                "executed HLT now at 5",
            ]
        );
        assert!(vm.debugger.is_some());
    }

    #[test]
    fn hooks_survive_faults() {
        let mut vm = Vm::empty();
        vm.load(&[AluOp::DIV as u8, 0, 1]).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        vm.debugger = Some(Box::new(RecordingDebugger {
            events: Rc::clone(&events),
        }));

        assert!(vm.run().is_err());
        assert_eq!(*events.borrow(), vec!["read DIV at 0"]);
        assert!(vm.debugger.is_some());
    }

    #[test]
    fn diff() {
        let ldi = Op::Basic(OpCode::LDI);
        let before = RegState {
            registers: [0, 0, 0, 0, 0, 0, 0, 0xF4],
            pc: 0,
            running: true,
        };

        let mut after = before.clone();
        after.pc = 3;
        assert_eq!(before.diff(&after, &ldi), None);

        after.registers[2] = 0x10;
        after.registers[7] = 0xF3;
        assert_eq!(
            before.diff(&after, &ldi),
            Some("R2 0x00 -> 0x10, SP 0xF4 -> 0xF3".to_owned())
        );

        let jmp = Op::Basic(OpCode::JMP);
        let mut jumped = before.clone();
        jumped.pc = 0x20;
        assert_eq!(
            before.diff(&jumped, &jmp),
            Some("PC 0x00 -> 0x20".to_owned())
        );

        let hlt = Op::Basic(OpCode::HLT);
        let mut halted = before.clone();
        halted.running = false;
        assert_eq!(before.diff(&halted, &hlt), Some("halted".to_owned()));
    }
}
