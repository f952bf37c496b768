use libls8::{
    device::MemoryOutput,
    fault::Fault,
    load::{parse_program, read_program},
    vm_with_program, StopReason,
};

#[test]
fn test_print8() {
    let test_program = include_str!("../programs/print8.ls8");
    let mut vm = vm_with_program(test_program).unwrap();
    let (output_buffer, output) = MemoryOutput::new();
    vm.set_output(Box::new(output));

    vm.run().unwrap();

    assert_eq!(*output_buffer.borrow(), vec![8]);
    assert!(!vm.is_running());
    assert_eq!(vm.pc, 5);
}

#[test]
fn test_mult() {
    let test_program = include_str!("../programs/mult.ls8");
    let mut vm = vm_with_program(test_program).unwrap();
    let (output_buffer, output) = MemoryOutput::new();
    vm.set_output(Box::new(output));

    assert_eq!(vm.run_until(100), Ok(StopReason::Halted));

    assert_eq!(*output_buffer.borrow(), vec![72]);
    assert_eq!(vm.registers.get(1), Ok(9));
}

#[test]
fn test_stack() {
    let test_program = include_str!("../programs/stack.ls8");
    let mut vm = vm_with_program(test_program).unwrap();
    let (output_buffer, output) = MemoryOutput::new();
    vm.set_output(Box::new(output));

    vm.run().unwrap();

    assert_eq!(*output_buffer.borrow(), vec![2, 4, 1]);
    assert_eq!(vm.registers.sp(), 0xF4);
}

#[test]
fn test_loop() {
    let test_program = include_str!("../programs/loop.ls8");
    let mut vm = vm_with_program(test_program).unwrap();

    assert_eq!(vm.run_until(1000), Ok(StopReason::CycleLimit));
    assert!(vm.is_running());
}

#[test]
fn test_image_is_packed() {
    let test_program = include_str!("../programs/print8.ls8");
    let vm = vm_with_program(test_program).unwrap();

    assert_eq!(
        &vm.memory.as_slice()[..7],
        &[0x82, 0x00, 0x08, 0x47, 0x00, 0x01, 0x00]
    );
}

#[test]
fn test_read_program() {
    let program = read_program("programs/mult.ls8").unwrap();
    assert_eq!(program, parse_program(include_str!("../programs/mult.ls8")));
    assert_eq!(program.len(), 12);
}

#[test]
fn test_missing_halt() {
    // LDI R0,8 then falls into zeroed memory
    let mut vm = vm_with_program("10000010\n00000000\n00001000\n").unwrap();
    let err = vm.run().unwrap_err();

    assert_eq!(err.pc, 3);
    assert_eq!(err.opcode, Some(0));
    assert_eq!(err.fault, Fault::UnknownInstruction);
}
