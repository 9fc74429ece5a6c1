use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Destination selector, bits 5-3 of a compute instruction.
/// Bit 2 = A, bit 1 = D, bit 0 = M.
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
pub enum Dest {
    #[strum(serialize = "null")]
    Null = 0b000,
    M = 0b001,
    D = 0b010,
    MD = 0b011,
    A = 0b100,
    AM = 0b101,
    AD = 0b110,
    AMD = 0b111,
}

impl Dest {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }
}
