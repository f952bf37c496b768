pub use load::vm_with_program;
pub use vm::{StopReason, Vm, VmError};

pub mod alu;
pub mod debugger;
pub mod device;
pub mod fault;
pub mod load;
pub mod memory;
pub mod op;
pub mod vm;
