//! The canonical opcode table: the single source of truth the assembler and
//! the interpreter both consult, so the two can never disagree about what a
//! mnemonic encodes to or how many bytes an instruction occupies.

/// Width in bytes of the opcode slot at the front of every instruction.
pub const OPCODE_SIZE: usize = 2;

/// The shape of an instruction's in-stream operand, used to compute both its
/// encoded size and its arity for the assembler's argument-count check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    None,
    U8,
    U64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Opcode {
    Jmp = 0,
    Jmps = 1,
    JmpTrue = 2,
    CmpU8 = 3,
    Spi = 4,
    Spd = 5,
    PushU8 = 6,
    PushU64 = 7,
    PopU8 = 8,
    SetU8 = 9,
    CplU8 = 10,
    CpgU8 = 11,
    Halt = 12,
}

impl Opcode {
    pub const ALL: [Opcode; 13] = [
        Opcode::Jmp,
        Opcode::Jmps,
        Opcode::JmpTrue,
        Opcode::CmpU8,
        Opcode::Spi,
        Opcode::Spd,
        Opcode::PushU8,
        Opcode::PushU64,
        Opcode::PopU8,
        Opcode::SetU8,
        Opcode::CplU8,
        Opcode::CpgU8,
        Opcode::Halt,
    ];

    /// Decodes the numeric opcode read from the instruction stream. Returns
    /// `None` for any value outside the 13-entry table (§7 unknown-opcode
    /// fault).
    pub fn from_u16(value: u16) -> Option<Opcode> {
        Some(match value {
            0 => Opcode::Jmp,
            1 => Opcode::Jmps,
            2 => Opcode::JmpTrue,
            3 => Opcode::CmpU8,
            4 => Opcode::Spi,
            5 => Opcode::Spd,
            6 => Opcode::PushU8,
            7 => Opcode::PushU64,
            8 => Opcode::PopU8,
            9 => Opcode::SetU8,
            10 => Opcode::CplU8,
            11 => Opcode::CpgU8,
            12 => Opcode::Halt,
            _ => return None,
        })
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Jmp => "jmp",
            Opcode::Jmps => "jmps",
            Opcode::JmpTrue => "jmp_true",
            Opcode::CmpU8 => "cmp_u8",
            Opcode::Spi => "spi",
            Opcode::Spd => "spd",
            Opcode::PushU8 => "push_u8",
            Opcode::PushU64 => "push_u64",
            Opcode::PopU8 => "pop_u8",
            Opcode::SetU8 => "set_u8",
            Opcode::CplU8 => "cpl_u8",
            Opcode::CpgU8 => "cpg_u8",
            Opcode::Halt => "halt",
        }
    }

    pub fn from_mnemonic(text: &str) -> Option<Opcode> {
        Opcode::ALL.into_iter().find(|op| op.mnemonic() == text)
    }

    pub fn operand_shape(self) -> OperandShape {
        match self {
            Opcode::Jmps | Opcode::CmpU8 | Opcode::PopU8 | Opcode::Halt => OperandShape::None,
            Opcode::PushU8 => OperandShape::U8,
            Opcode::Jmp
            | Opcode::JmpTrue
            | Opcode::Spi
            | Opcode::Spd
            | Opcode::PushU64
            | Opcode::SetU8
            | Opcode::CplU8
            | Opcode::CpgU8 => OperandShape::U64,
        }
    }

    /// Number of source-level arguments this mnemonic takes.
    pub fn arity(self) -> usize {
        match self.operand_shape() {
            OperandShape::None => 0,
            OperandShape::U8 | OperandShape::U64 => 1,
        }
    }

    /// Whether a `:label` reference is a legal operand for this mnemonic. A
    /// label always resolves to an 8-byte absolute address, so it only makes
    /// sense where the operand shape is `U64`.
    pub fn accepts_label_operand(self) -> bool {
        self.operand_shape() == OperandShape::U64
    }

    /// Total encoded size in bytes, including the opcode slot.
    pub fn instruction_size(self) -> usize {
        OPCODE_SIZE
            + match self.operand_shape() {
                OperandShape::None => 0,
                OperandShape::U8 => 1,
                OperandShape::U64 => 8,
            }
    }
}
