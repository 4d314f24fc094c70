//! Two-pass Hack assembler
//!
//! The first pass assigns every label the ROM address of the instruction that
//! follows it. The second pass resolves `@symbol` operands against the
//! predefined symbols, then the labels, and allocates any remaining symbol as
//! a variable starting at RAM 16.

use crate::error::SimError;
use log::debug;
use std::collections::HashMap;
use vmt_codegen::abi::{FIRST_VARIABLE, PREDEFINED_SYMBOLS};
use vmt_codegen::{Address, AsmInst, Comp, Dest, Jump, MAX_ADDRESS};

/// Instruction with every symbol resolved to a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineInst {
    Load(u16),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub instructions: Vec<MachineInst>,
    labels: HashMap<String, u16>,
    variables: HashMap<String, u16>,
}

impl Program {
    /// ROM address a label was bound to
    pub fn label_address(&self, name: &str) -> Option<u16> {
        self.labels.get(name).copied()
    }

    /// RAM address a variable symbol was allocated
    pub fn variable_address(&self, name: &str) -> Option<u16> {
        self.variables.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Assemble Hack assembly text
pub fn assemble(source: &str) -> Result<Program, SimError> {
    let mut program = Program::default();
    let mut pending = Vec::new();

    // First pass: labels
    for (line_index, raw) in source.lines().enumerate() {
        let text = raw.split("//").next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }
        let inst: AsmInst = text.parse().map_err(|message| SimError::Parse {
            line: line_index + 1,
            message,
        })?;
        match inst {
            AsmInst::Label(name) => {
                let address = pending.len() as u16;
                if program.labels.insert(name.clone(), address).is_some() {
                    return Err(SimError::DuplicateLabel(name));
                }
            }
            AsmInst::Comment(_) => {}
            other => pending.push(other),
        }
    }
    if pending.len() > usize::from(MAX_ADDRESS) + 1 {
        return Err(SimError::ProgramTooLarge(pending.len()));
    }

    // Second pass: symbols
    let mut next_variable = FIRST_VARIABLE;
    for inst in pending {
        let resolved = match inst {
            AsmInst::At(Address::Number(value)) => MachineInst::Load(value),
            AsmInst::At(Address::Symbol(symbol)) => {
                let known = predefined(&symbol).or_else(|| program.labels.get(&symbol).copied());
                let value = match known {
                    Some(value) => value,
                    None => *program.variables.entry(symbol).or_insert_with(|| {
                        let address = next_variable;
                        next_variable += 1;
                        address
                    }),
                };
                MachineInst::Load(value)
            }
            AsmInst::Compute { dest, comp, jump } => MachineInst::Compute { dest, comp, jump },
            AsmInst::Label(_) | AsmInst::Comment(_) => continue,
        };
        program.instructions.push(resolved);
    }

    debug!(
        "Assembled {} instructions, {} labels, {} variables",
        program.instructions.len(),
        program.labels.len(),
        program.variables.len()
    );
    Ok(program)
}

fn predefined(symbol: &str) -> Option<u16> {
    PREDEFINED_SYMBOLS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, value)| *value)
}
