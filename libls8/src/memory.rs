use crate::fault::Fault;

pub const MEMORY_SIZE: usize = 256;
pub const REGISTER_COUNT: usize = 8;
/// R7 holds the stack pointer.
pub const SP: u8 = 7;
/// Initial stack pointer. The stack grows down from here.
pub const STACK_TOP: u8 = 0xF4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    pub fn read(&self, address: usize) -> Result<u8, Fault> {
        self.cells
            .get(address)
            .copied()
            .ok_or(Fault::AddressOutOfBounds(address))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Fault> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(Fault::AddressOutOfBounds(address))?;
        *cell = value;
        Ok(())
    }

    /// Copies `image` into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        for (address, byte) in image.iter().enumerate() {
            self.write(address, *byte)?;
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    values: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        let mut values = [0; REGISTER_COUNT];
        values[SP as usize] = STACK_TOP;
        Self { values }
    }

    pub fn get(&self, index: u8) -> Result<u8, Fault> {
        self.values
            .get(index as usize)
            .copied()
            .ok_or(Fault::RegisterOutOfBounds(index))
    }

    pub fn set(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        let register = self
            .values
            .get_mut(index as usize)
            .ok_or(Fault::RegisterOutOfBounds(index))?;
        *register = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.values[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.values[SP as usize] = value;
    }

    pub fn as_array(&self) -> &[u8; REGISTER_COUNT] {
        &self.values
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
