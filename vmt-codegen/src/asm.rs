//! Hack Assembly Instruction Definitions
//!
//! This module defines the symbolic instruction set of the Hack machine: the
//! address form (`@value`), the compute form (`dest=comp;jump`), label
//! declarations and comments. Only the closed sets of destinations, compute
//! expressions and jump conditions the target ALU supports are representable.

use std::fmt;
use std::str::FromStr;

/// Largest value an address instruction can load (15 bits)
pub const MAX_ADDRESS: u16 = 0x7FFF;

/// Operand of an address instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Number(u16),
    Symbol(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Number(n) => write!(f, "{}", n),
            Address::Symbol(s) => write!(f, "{}", s),
        }
    }
}

impl From<u16> for Address {
    fn from(n: u16) -> Self {
        Address::Number(n)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::Symbol(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address::Symbol(s)
    }
}

/// Destination of a compute instruction
///
/// A compute instruction with no destination is written with `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    pub const ALL: [Dest; 7] = [Dest::M, Dest::D, Dest::MD, Dest::A, Dest::AM, Dest::AD, Dest::AMD];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Dest::M => "M",
            Dest::D => "D",
            Dest::MD => "MD",
            Dest::A => "A",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::AMD => "AMD",
        }
    }

    pub fn writes_a(self) -> bool {
        matches!(self, Dest::A | Dest::AM | Dest::AD | Dest::AMD)
    }

    pub fn writes_d(self) -> bool {
        matches!(self, Dest::D | Dest::MD | Dest::AD | Dest::AMD)
    }

    pub fn writes_m(self) -> bool {
        matches!(self, Dest::M | Dest::MD | Dest::AM | Dest::AMD)
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Dest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dest::ALL
            .iter()
            .copied()
            .find(|d| d.mnemonic() == s)
            .ok_or_else(|| format!("invalid destination '{}'", s))
    }
}

/// Compute expression of the Hack ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Zero,       // 0
    One,        // 1
    MinusOne,   // -1
    D,          // D
    A,          // A
    M,          // M
    NotD,       // !D
    NotA,       // !A
    NotM,       // !M
    NegD,       // -D
    NegA,       // -A
    NegM,       // -M
    DPlusOne,   // D+1
    APlusOne,   // A+1
    MPlusOne,   // M+1
    DMinusOne,  // D-1
    AMinusOne,  // A-1
    MMinusOne,  // M-1
    DPlusA,     // D+A
    DPlusM,     // D+M
    DMinusA,    // D-A
    DMinusM,    // D-M
    AMinusD,    // A-D
    MMinusD,    // M-D
    DAndA,      // D&A
    DAndM,      // D&M
    DOrA,       // D|A
    DOrM,       // D|M
}

impl Comp {
    pub const ALL: [Comp; 28] = [
        Comp::Zero, Comp::One, Comp::MinusOne,
        Comp::D, Comp::A, Comp::M,
        Comp::NotD, Comp::NotA, Comp::NotM,
        Comp::NegD, Comp::NegA, Comp::NegM,
        Comp::DPlusOne, Comp::APlusOne, Comp::MPlusOne,
        Comp::DMinusOne, Comp::AMinusOne, Comp::MMinusOne,
        Comp::DPlusA, Comp::DPlusM, Comp::DMinusA, Comp::DMinusM,
        Comp::AMinusD, Comp::MMinusD,
        Comp::DAndA, Comp::DAndM, Comp::DOrA, Comp::DOrM,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::MinusOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::NegM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
        }
    }

    /// Whether the expression reads the memory cell addressed by A
    pub fn reads_memory(self) -> bool {
        self.mnemonic().contains('M')
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Comp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comp::ALL
            .iter()
            .copied()
            .find(|c| c.mnemonic() == s)
            .ok_or_else(|| format!("invalid compute expression '{}'", s))
    }
}

/// Jump condition, tested against the computed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub const ALL: [Jump; 7] = [Jump::JGT, Jump::JEQ, Jump::JGE, Jump::JLT, Jump::JNE, Jump::JLE, Jump::JMP];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Jump::JGT => "JGT",
            Jump::JEQ => "JEQ",
            Jump::JGE => "JGE",
            Jump::JLT => "JLT",
            Jump::JNE => "JNE",
            Jump::JLE => "JLE",
            Jump::JMP => "JMP",
        }
    }

    /// Whether a jump is taken for the given computed value
    pub fn taken(self, value: i16) -> bool {
        match self {
            Jump::JGT => value > 0,
            Jump::JEQ => value == 0,
            Jump::JGE => value >= 0,
            Jump::JLT => value < 0,
            Jump::JNE => value != 0,
            Jump::JLE => value <= 0,
            Jump::JMP => true,
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Jump {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Jump::ALL
            .iter()
            .copied()
            .find(|j| j.mnemonic() == s)
            .ok_or_else(|| format!("invalid jump condition '{}'", s))
    }
}

/// Hack Assembly Instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    /// `@value`: load the address register
    At(Address),
    /// `dest=comp;jump`
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    /// `(name)`: label declaration, occupies no instruction slot
    Label(String),
    /// `// text`
    Comment(String),
}

impl AsmInst {
    pub fn at(address: impl Into<Address>) -> Self {
        AsmInst::At(address.into())
    }

    /// `dest=comp`
    pub fn assign(dest: Dest, comp: Comp) -> Self {
        AsmInst::Compute { dest: Some(dest), comp, jump: None }
    }

    /// `comp;jump`
    pub fn jump(comp: Comp, jump: Jump) -> Self {
        AsmInst::Compute { dest: None, comp, jump: Some(jump) }
    }

    pub fn label(name: impl Into<String>) -> Self {
        AsmInst::Label(name.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        AsmInst::Comment(text.into())
    }

    /// Whether this instruction occupies a slot in instruction memory
    pub fn is_executable(&self) -> bool {
        matches!(self, AsmInst::At(_) | AsmInst::Compute { .. })
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::At(address) => write!(f, "@{}", address),
            AsmInst::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            AsmInst::Label(name) => write!(f, "({})", name),
            AsmInst::Comment(text) => write!(f, "// {}", text),
        }
    }
}

impl FromStr for AsmInst {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(text) = line.strip_prefix("//") {
            return Ok(AsmInst::Comment(text.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix('@') {
            if rest.is_empty() {
                return Err("address instruction without operand".to_string());
            }
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                let n: u16 = rest
                    .parse()
                    .map_err(|_| format!("invalid numeric address '{}'", rest))?;
                if n > MAX_ADDRESS {
                    return Err(format!("address {} exceeds {}", n, MAX_ADDRESS));
                }
                return Ok(AsmInst::At(Address::Number(n)));
            }
            return Ok(AsmInst::At(Address::Symbol(rest.to_string())));
        }
        if line.starts_with('(') {
            return match line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                Some(name) if !name.is_empty() => Ok(AsmInst::Label(name.to_string())),
                _ => Err(format!("malformed label declaration '{}'", line)),
            };
        }

        let (dest, rest) = match line.split_once('=') {
            Some((dest, rest)) => (Some(dest.parse::<Dest>()?), rest),
            None => (None, line),
        };
        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp.parse::<Comp>()?, Some(jump.parse::<Jump>()?)),
            None => (rest.parse::<Comp>()?, None),
        };
        Ok(AsmInst::Compute { dest, comp, jump })
    }
}
