//! Hack CPU
//!
//! Sixteen-bit two's-complement machine with an address register A, a data
//! register D and word-addressed RAM. M always means RAM[A] as A was before the
//! instruction executed; a jump target is also the old A.

use crate::assembler::{MachineInst, Program};
use crate::error::SimError;
use log::trace;
use vmt_codegen::abi::{SegmentPointer, STACK_BASE};
use vmt_codegen::Comp;

pub const RAM_SIZE: usize = 32768;

#[derive(Debug, Clone)]
pub struct Cpu {
    pub ram: Vec<i16>,
    pub a: i16,
    pub d: i16,
    pub pc: u16,
    steps: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            steps: 0,
        }
    }

    /// Machine with SP at the stack base and the four segment pointers set,
    /// as a test harness would prepare it for code without bootstrap
    pub fn with_segments(local: i16, argument: i16, this: i16, that: i16) -> Self {
        let mut cpu = Self::new();
        cpu.ram[0] = STACK_BASE as i16;
        cpu.ram[SegmentPointer::Local.cell() as usize] = local;
        cpu.ram[SegmentPointer::Argument.cell() as usize] = argument;
        cpu.ram[SegmentPointer::This.cell() as usize] = this;
        cpu.ram[SegmentPointer::That.cell() as usize] = that;
        cpu
    }

    pub fn peek(&self, address: u16) -> i16 {
        self.ram[usize::from(address)]
    }

    pub fn poke(&mut self, address: u16, value: i16) {
        self.ram[usize::from(address)] = value;
    }

    pub fn sp(&self) -> i16 {
        self.ram[0]
    }

    /// Live stack contents from the stack base up to SP
    pub fn stack(&self) -> &[i16] {
        let base = usize::from(STACK_BASE);
        let top = (self.sp().max(0) as usize).clamp(base, RAM_SIZE);
        &self.ram[base..top]
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self, program: &Program) -> bool {
        usize::from(self.pc) >= program.len()
    }

    fn memory_index(&self) -> Result<usize, SimError> {
        let address = self.a;
        if address < 0 {
            return Err(SimError::AddressOutOfRange { address, pc: self.pc });
        }
        Ok(address as usize)
    }

    /// Execute one instruction; returns false when the program has run off
    /// the end of ROM
    pub fn step(&mut self, program: &Program) -> Result<bool, SimError> {
        let Some(inst) = program.instructions.get(usize::from(self.pc)) else {
            return Ok(false);
        };
        self.steps += 1;

        match *inst {
            MachineInst::Load(value) => {
                self.a = value as i16;
                self.pc += 1;
            }
            MachineInst::Compute { dest, comp, jump } => {
                let m = if comp.reads_memory() {
                    self.ram[self.memory_index()?]
                } else {
                    0
                };
                let value = alu(comp, self.a, self.d, m);
                let old_a = self.a;

                if let Some(dest) = dest {
                    if dest.writes_m() {
                        let index = self.memory_index()?;
                        self.ram[index] = value;
                    }
                    if dest.writes_a() {
                        self.a = value;
                    }
                    if dest.writes_d() {
                        self.d = value;
                    }
                }

                self.pc = match jump {
                    Some(jump) if jump.taken(value) => old_a as u16,
                    _ => self.pc + 1,
                };
            }
        }
        trace!("pc={} a={} d={} sp={}", self.pc, self.a, self.d, self.ram[0]);
        Ok(true)
    }

    /// Run until the program falls off the end of ROM
    pub fn run(&mut self, program: &Program, max_steps: u64) -> Result<u64, SimError> {
        let start = self.steps;
        while self.step(program)? {
            if self.steps - start >= max_steps {
                return Err(SimError::StepLimit(max_steps));
            }
        }
        Ok(self.steps - start)
    }

    /// Run until the program counter reaches `address`
    pub fn run_until(
        &mut self,
        program: &Program,
        address: u16,
        max_steps: u64,
    ) -> Result<u64, SimError> {
        let start = self.steps;
        while self.pc != address {
            if !self.step(program)? || self.steps - start >= max_steps {
                return Err(SimError::StepLimit(self.steps - start));
            }
        }
        Ok(self.steps - start)
    }
}

fn alu(comp: Comp, a: i16, d: i16, m: i16) -> i16 {
    match comp {
        Comp::Zero => 0,
        Comp::One => 1,
        Comp::MinusOne => -1,
        Comp::D => d,
        Comp::A => a,
        Comp::M => m,
        Comp::NotD => !d,
        Comp::NotA => !a,
        Comp::NotM => !m,
        Comp::NegD => d.wrapping_neg(),
        Comp::NegA => a.wrapping_neg(),
        Comp::NegM => m.wrapping_neg(),
        Comp::DPlusOne => d.wrapping_add(1),
        Comp::APlusOne => a.wrapping_add(1),
        Comp::MPlusOne => m.wrapping_add(1),
        Comp::DMinusOne => d.wrapping_sub(1),
        Comp::AMinusOne => a.wrapping_sub(1),
        Comp::MMinusOne => m.wrapping_sub(1),
        Comp::DPlusA => d.wrapping_add(a),
        Comp::DPlusM => d.wrapping_add(m),
        Comp::DMinusA => d.wrapping_sub(a),
        Comp::DMinusM => d.wrapping_sub(m),
        Comp::AMinusD => a.wrapping_sub(d),
        Comp::MMinusD => m.wrapping_sub(d),
        Comp::DAndA => d & a,
        Comp::DAndM => d & m,
        Comp::DOrA => d | a,
        Comp::DOrM => d | m,
    }
}
