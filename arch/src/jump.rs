use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Jump selector, bits 2-0 of a compute instruction.
/// Bit 2 = jump if negative, bit 1 = if zero, bit 0 = if positive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Jump {
    #[strum(serialize = "null")]
    Null = 0b000,
    JGT = 0b001,
    JEQ = 0b010,
    JGE = 0b011,
    JLT = 0b100,
    JNE = 0b101,
    JLE = 0b110,
    JMP = 0b111,
}

impl Jump {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}
