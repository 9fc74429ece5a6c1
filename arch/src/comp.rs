use bimap::BiMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;
use std::fmt::Display;
use strum::EnumIter;

/// ALU operation, bits 12-6 of a compute instruction.
/// The top bit is the `a` selector: 0 reads A, 1 reads M.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, EnumIter,
)]
#[repr(u8)]
pub enum Comp {
    // a = 0
    Zero = 0b0_101010,
    One = 0b0_111111,
    NegOne = 0b0_111010,
    D = 0b0_001100,
    A = 0b0_110000,
    NotD = 0b0_001101,
    NotA = 0b0_110001,
    NegD = 0b0_001111,
    NegA = 0b0_110011,
    DInc = 0b0_011111,
    AInc = 0b0_110111,
    DDec = 0b0_001110,
    ADec = 0b0_110010,
    DAddA = 0b0_000010,
    DSubA = 0b0_010011,
    ASubD = 0b0_000111,
    DAndA = 0b0_000000,
    DOrA = 0b0_010101,
    // a = 1
    M = 0b1_110000,
    NotM = 0b1_110001,
    NegM = 0b1_110011,
    MInc = 0b1_110111,
    MDec = 0b1_110010,
    DAddM = 0b1_000010,
    DSubM = 0b1_010011,
    MSubD = 0b1_000111,
    DAndM = 0b1_000000,
    DOrM = 0b1_010101,
}

static COMP_STR: Lazy<BiMap<Comp, &'static str>> = Lazy::new(|| {
    let mut map: BiMap<Comp, &'static str> = BiMap::new();
    map.insert(Comp::Zero, "0");
    map.insert(Comp::One, "1");
    map.insert(Comp::NegOne, "-1");
    map.insert(Comp::D, "D");
    map.insert(Comp::A, "A");
    map.insert(Comp::NotD, "!D");
    map.insert(Comp::NotA, "!A");
    map.insert(Comp::NegD, "-D");
    map.insert(Comp::NegA, "-A");
    map.insert(Comp::DInc, "D+1");
    map.insert(Comp::AInc, "A+1");
    map.insert(Comp::DDec, "D-1");
    map.insert(Comp::ADec, "A-1");
    map.insert(Comp::DAddA, "D+A");
    map.insert(Comp::DSubA, "D-A");
    map.insert(Comp::ASubD, "A-D");
    map.insert(Comp::DAndA, "D&A");
    map.insert(Comp::DOrA, "D|A");
    map.insert(Comp::M, "M");
    map.insert(Comp::NotM, "!M");
    map.insert(Comp::NegM, "-M");
    map.insert(Comp::MInc, "M+1");
    map.insert(Comp::MDec, "M-1");
    map.insert(Comp::DAddM, "D+M");
    map.insert(Comp::DSubM, "D-M");
    map.insert(Comp::MSubD, "M-D");
    map.insert(Comp::DAndM, "D&M");
    map.insert(Comp::DOrM, "D|M");
    map
});

impl Comp {
    pub fn parse(s: &str) -> Option<Self> {
        COMP_STR.get_by_right(s).copied()
    }

    pub fn mnemonic(&self) -> &'static str {
        // Every variant is in COMP_STR.
        COMP_STR.get_by_left(self).copied().unwrap_or("?")
    }

    /// `a` selector plus the six ALU control bits.
    pub fn bits(self) -> u16 {
        u8::from(self) as u16
    }

    pub fn reads_memory(&self) -> bool {
        self.bits() & 0b1_000000 != 0
    }
}

impl Display for Comp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
