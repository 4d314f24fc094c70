//! Hack Memory Map and VM Calling Convention
//!
//! This module pins down the fixed memory layout the VM translator relies on:
//! the stack pointer and the four segment pointer cells, the temp range, the
//! scratch registers used by `pop` and `return`, and the shape of a call frame.
//!
//! ```text
//! RAM[0]      SP    first free stack slot
//! RAM[1]      LCL   base of the current function's locals
//! RAM[2]      ARG   base of the current function's arguments
//! RAM[3]      THIS  pointer 0
//! RAM[4]      THAT  pointer 1
//! RAM[5..=12]       temp 0..7
//! RAM[13..=15]      scratch (R13, R14, R15)
//! RAM[16..256]      static variables
//! RAM[256..]        working stack
//! ```

use std::fmt;

/// Stack pointer cell
pub const SP: &str = "SP";

/// First word of the temp segment
pub const TEMP_BASE: u16 = 5;

/// Number of temp words
pub const TEMP_SIZE: u16 = 8;

/// Scratch cell that holds a computed `pop` target address
pub const POP_TARGET: &str = "R13";

/// Scratch cell that holds the callee frame base during `return`
pub const FRAME_BASE: &str = "R14";

/// Scratch cell that holds the return address during `return`
pub const RETURN_ADDRESS: &str = "R15";

/// Default origin of the working stack
pub const STACK_BASE: u16 = 256;

/// Words a call saves below the callee's locals: return address + four pointers
pub const FRAME_SIZE: u16 = 5;

/// Function the bootstrap code calls unless configured otherwise
pub const DEFAULT_ENTRY: &str = "Sys.init";

/// The four pointer cells a call saves and a return restores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentPointer {
    Local,
    Argument,
    This,
    That,
}

impl SegmentPointer {
    /// Order in which `call` pushes the caller's pointers
    pub const SAVE_ORDER: [SegmentPointer; 4] = [
        SegmentPointer::Local,
        SegmentPointer::Argument,
        SegmentPointer::This,
        SegmentPointer::That,
    ];

    /// Order in which `return` restores them (reverse of `SAVE_ORDER`)
    pub const RESTORE_ORDER: [SegmentPointer; 4] = [
        SegmentPointer::That,
        SegmentPointer::This,
        SegmentPointer::Argument,
        SegmentPointer::Local,
    ];

    /// Predefined assembler symbol for the cell
    pub fn symbol(self) -> &'static str {
        match self {
            SegmentPointer::Local => "LCL",
            SegmentPointer::Argument => "ARG",
            SegmentPointer::This => "THIS",
            SegmentPointer::That => "THAT",
        }
    }

    /// RAM address of the cell
    pub fn cell(self) -> u16 {
        match self {
            SegmentPointer::Local => 1,
            SegmentPointer::Argument => 2,
            SegmentPointer::This => 3,
            SegmentPointer::That => 4,
        }
    }

    /// Distance below the callee's frame base at which `call` saved this pointer
    pub fn frame_offset(self) -> u16 {
        match self {
            SegmentPointer::Local => 4,
            SegmentPointer::Argument => 3,
            SegmentPointer::This => 2,
            SegmentPointer::That => 1,
        }
    }
}

impl fmt::Display for SegmentPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Predefined symbols every Hack assembler resolves
pub const PREDEFINED_SYMBOLS: [(&str, u16); 23] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

/// First RAM address handed out to assembler variables
pub const FIRST_VARIABLE: u16 = 16;
