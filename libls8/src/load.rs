use std::{fs, io, path::Path};

use log::debug;
use once_cell::sync::OnceCell;
use regex::Regex;
use thiserror::Error;

use crate::{fault::Fault, memory::MEMORY_SIZE, vm::Vm};

static LINE_REGEX: OnceCell<Regex> = OnceCell::new();
static LINE_REGEX_PATTERN: &str = r#"^\s*(?P<bits>[01]+)\s*(?:#.*)?$"#;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error reading program file")]
    Io(#[from] io::Error),
    #[error("Program is {0} bytes but memory only holds {} bytes", MEMORY_SIZE)]
    TooLarge(usize),
    #[error("Error copying program into memory")]
    Memory(#[from] Fault),
}

fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| Regex::new(LINE_REGEX_PATTERN).expect("Invalid line regex"))
}

/// Parses one line of a program file. Blank lines, comment-only lines and
/// anything that isn't a byte written in binary yield `None`.
pub fn parse_line(line: &str) -> Option<u8> {
    line_regex()
        .captures(line)
        .and_then(|cap| u8::from_str_radix(&cap["bits"], 2).ok())
}

pub fn parse_program(program_text: &str) -> Vec<u8> {
    program_text.lines().filter_map(parse_line).collect()
}

pub fn read_program<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let program_text = fs::read_to_string(path)?;
    let program = parse_program(&program_text);
    debug!("Read {} bytes from {}", program.len(), path.display());
    Ok(program)
}

pub fn vm_with_program(program_text: &str) -> Result<Vm, LoadError> {
    let mut vm = Vm::empty();
    vm.load(&parse_program(program_text))?;
    Ok(vm)
}
