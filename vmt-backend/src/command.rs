//! VM command model and line parser
//!
//! A VM command line has the shape `opcode [arg1] [arg2]`. Parsing checks the
//! opcode, the argument count and the argument shape (identifiers or
//! non-negative integers); it does not check that the program makes sense.

use std::fmt;
use std::str::FromStr;
use vmt_common::TranslateError;

/// Addressable value category of `push`/`pop`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
}

impl Segment {
    pub fn name(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
            Segment::Static => "static",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Segment {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Segment::Constant),
            "local" => Ok(Segment::Local),
            "argument" => Ok(Segment::Argument),
            "this" => Ok(Segment::This),
            "that" => Ok(Segment::That),
            "temp" => Ok(Segment::Temp),
            "pointer" => Ok(Segment::Pointer),
            "static" => Ok(Segment::Static),
            _ => Err(TranslateError::unknown_segment(s)),
        }
    }
}

/// Arithmetic, logical and comparison commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithOp {
    pub fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq => "eq",
            ArithOp::Gt => "gt",
            ArithOp::Lt => "lt",
            ArithOp::And => "and",
            ArithOp::Or => "or",
            ArithOp::Not => "not",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "add" => ArithOp::Add,
            "sub" => ArithOp::Sub,
            "neg" => ArithOp::Neg,
            "eq" => ArithOp::Eq,
            "gt" => ArithOp::Gt,
            "lt" => ArithOp::Lt,
            "and" => ArithOp::And,
            "or" => ArithOp::Or,
            "not" => ArithOp::Not,
            _ => return None,
        })
    }

    pub fn is_unary(self) -> bool {
        matches!(self, ArithOp::Neg | ArithOp::Not)
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, ArithOp::Eq | ArithOp::Gt | ArithOp::Lt)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed VM command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Arithmetic { op: ArithOp },
    Label { name: String },
    Goto { label: String },
    IfGoto { label: String },
    Function { name: String, locals: u16 },
    Call { name: String, args: u16 },
    Return,
}

impl Command {
    /// Parse one comment-free, non-blank command line
    pub fn parse(line: &str) -> Result<Self, TranslateError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (&opcode, args) = words
            .split_first()
            .ok_or_else(|| TranslateError::malformed("empty command"))?;

        if let Some(op) = ArithOp::from_name(opcode) {
            expect_args(opcode, args, 0)?;
            return Ok(Command::Arithmetic { op });
        }

        match opcode {
            "push" | "pop" => {
                expect_args(opcode, args, 2)?;
                let segment: Segment = args[0].parse()?;
                let index = parse_number(opcode, args[1])?;
                if opcode == "push" {
                    Ok(Command::Push { segment, index })
                } else if segment == Segment::Constant {
                    Err(TranslateError::malformed("cannot pop into the constant segment"))
                } else {
                    Ok(Command::Pop { segment, index })
                }
            }
            "label" => {
                expect_args(opcode, args, 1)?;
                Ok(Command::Label { name: parse_symbol(opcode, args[0])? })
            }
            "goto" => {
                expect_args(opcode, args, 1)?;
                Ok(Command::Goto { label: parse_symbol(opcode, args[0])? })
            }
            "if-goto" => {
                expect_args(opcode, args, 1)?;
                Ok(Command::IfGoto { label: parse_symbol(opcode, args[0])? })
            }
            "function" => {
                expect_args(opcode, args, 2)?;
                Ok(Command::Function {
                    name: parse_symbol(opcode, args[0])?,
                    locals: parse_number(opcode, args[1])?,
                })
            }
            "call" => {
                expect_args(opcode, args, 2)?;
                Ok(Command::Call {
                    name: parse_symbol(opcode, args[0])?,
                    args: parse_number(opcode, args[1])?,
                })
            }
            "return" => {
                expect_args(opcode, args, 0)?;
                Ok(Command::Return)
            }
            _ => Err(TranslateError::malformed(format!("unknown command '{}'", opcode))),
        }
    }

    /// Net change in stack depth seen by the code that issued the command
    ///
    /// `return` tears down the whole frame, so it has no local depth change.
    pub fn stack_effect(&self) -> Option<i32> {
        match self {
            Command::Push { .. } => Some(1),
            Command::Pop { .. } => Some(-1),
            Command::Arithmetic { op } if op.is_unary() => Some(0),
            Command::Arithmetic { .. } => Some(-1),
            Command::Label { .. } | Command::Goto { .. } => Some(0),
            Command::IfGoto { .. } => Some(-1),
            Command::Function { locals, .. } => Some(i32::from(*locals)),
            Command::Call { args, .. } => Some(1 - i32::from(*args)),
            Command::Return => None,
        }
    }
}

impl FromStr for Command {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Push { segment, index } => write!(f, "push {} {}", segment, index),
            Command::Pop { segment, index } => write!(f, "pop {} {}", segment, index),
            Command::Arithmetic { op } => write!(f, "{}", op),
            Command::Label { name } => write!(f, "label {}", name),
            Command::Goto { label } => write!(f, "goto {}", label),
            Command::IfGoto { label } => write!(f, "if-goto {}", label),
            Command::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Command::Call { name, args } => write!(f, "call {} {}", name, args),
            Command::Return => write!(f, "return"),
        }
    }
}

fn expect_args(opcode: &str, args: &[&str], count: usize) -> Result<(), TranslateError> {
    if args.len() != count {
        return Err(TranslateError::malformed(format!(
            "'{}' takes {} argument{}, found {}",
            opcode,
            count,
            if count == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

fn parse_number(opcode: &str, text: &str) -> Result<u16, TranslateError> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(TranslateError::malformed(format!(
            "'{}' expects a non-negative integer, found '{}'",
            opcode, text
        )));
    }
    text.parse().map_err(|_| {
        TranslateError::malformed(format!("'{}' argument {} is too large", opcode, text))
    })
}

/// Label and function names must be valid assembler symbols
fn parse_symbol(opcode: &str, text: &str) -> Result<String, TranslateError> {
    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '$');
    let starts_with_digit = text.starts_with(|c: char| c.is_ascii_digit());
    if starts_with_digit || !text.chars().all(valid_char) {
        return Err(TranslateError::malformed(format!(
            "'{}' expects a symbol, found '{}'",
            opcode, text
        )));
    }
    Ok(text.to_string())
}

/// Comment-stripped, non-blank command lines of a VM source with their line numbers
pub fn command_lines(source: &str) -> impl Iterator<Item = (u32, &str)> {
    source.lines().enumerate().filter_map(|(i, line)| {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some((i as u32 + 1, line))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_access() {
        assert_eq!(
            Command::parse("push constant 7").unwrap(),
            Command::Push { segment: Segment::Constant, index: 7 }
        );
        assert_eq!(
            Command::parse("pop   that\t5").unwrap(),
            Command::Pop { segment: Segment::That, index: 5 }
        );
    }

    #[test]
    fn test_parse_arithmetic() {
        for name in ["add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not"] {
            let cmd = Command::parse(name).unwrap();
            assert_eq!(cmd.to_string(), name);
        }
    }

    #[test]
    fn test_parse_program_flow_and_calls() {
        assert_eq!(
            Command::parse("if-goto LOOP_START").unwrap(),
            Command::IfGoto { label: "LOOP_START".to_string() }
        );
        assert_eq!(
            Command::parse("function Main.fibonacci 2").unwrap(),
            Command::Function { name: "Main.fibonacci".to_string(), locals: 2 }
        );
        assert_eq!(
            Command::parse("call Math.multiply 2").unwrap(),
            Command::Call { name: "Math.multiply".to_string(), args: 2 }
        );
        assert_eq!(Command::parse("return").unwrap(), Command::Return);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("jump 3"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("push heap 3"),
            Err(TranslateError::UnknownSegment { ref segment, .. }) if segment == "heap"
        ));
        assert!(matches!(
            Command::parse("push constant"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("add 1"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("push constant -1"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("push constant 70000"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("pop constant 0"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("label 1ST"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("call Foo-bar 0"),
            Err(TranslateError::MalformedCommand { .. })
        ));
        assert!(matches!(
            Command::parse("return now"),
            Err(TranslateError::MalformedCommand { .. })
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let lines = [
            "push static 3",
            "pop pointer 1",
            "label WHILE_EXP0",
            "goto WHILE_END0",
            "function Sys.init 0",
            "call Sys.main 0",
            "return",
        ];
        for line in lines {
            assert_eq!(Command::parse(line).unwrap().to_string(), line);
        }
    }

    #[test]
    fn test_stack_effect() {
        let effect = |line: &str| Command::parse(line).unwrap().stack_effect();
        assert_eq!(effect("push local 0"), Some(1));
        assert_eq!(effect("pop temp 3"), Some(-1));
        assert_eq!(effect("add"), Some(-1));
        assert_eq!(effect("lt"), Some(-1));
        assert_eq!(effect("not"), Some(0));
        assert_eq!(effect("goto X"), Some(0));
        assert_eq!(effect("if-goto X"), Some(-1));
        assert_eq!(effect("function F.f 3"), Some(3));
        assert_eq!(effect("call F.f 3"), Some(-2));
        assert_eq!(effect("return"), None);
    }

    #[test]
    fn test_command_lines_strip_comments_and_blanks() {
        let source = "// header\n\npush constant 1 // one\n   \n\tadd\n";
        let lines: Vec<_> = command_lines(source).collect();
        assert_eq!(lines, vec![(3, "push constant 1"), (5, "add")]);
    }
}
