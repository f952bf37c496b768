use std::{
    cell::RefCell,
    fs::File,
    io::{self, Write},
    path::Path,
    rc::Rc,
};

use log::warn;
use thiserror::Error;

/// Receives every value printed by PRN, in execution order.
pub trait Output {
    fn print(&mut self, value: u8);
}

pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn print(&mut self, value: u8) {
        println!("{}", value);
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Error creating output file")]
    CreateError(#[from] io::Error),
}

pub struct FileOutput {
    file: File,
}

impl FileOutput {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, OutputError> {
        Ok(Self {
            file: File::create(path)?,
        })
    }
}

impl Output for FileOutput {
    fn print(&mut self, value: u8) {
        if let Err(e) = writeln!(self.file, "{}", value) {
            warn!("Couldn't write {} to output file: {}", value, e);
        }
    }
}

pub struct MemoryOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl MemoryOutput {
    pub fn new() -> (Rc<RefCell<Vec<u8>>>, Self) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let output = Self {
            buffer: Rc::clone(&buffer),
        };
        (buffer, output)
    }
}

impl Output for MemoryOutput {
    fn print(&mut self, value: u8) {
        self.buffer.borrow_mut().push(value);
    }
}
