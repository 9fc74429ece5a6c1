use crate::{comp::Comp, dest::Dest, jump::Jump};

use color_print::cformat;

/// 15-bit address operand. Only `Addr::new` builds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(u16);

impl Addr {
    pub fn new(value: u16) -> Option<Addr> {
        if value <= Inst::ADDR_MAX {
            Some(Addr(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inst {
    /// `@value`: load a 15-bit value into A.
    A(Addr),
    /// `dest=comp;jump`
    C { dest: Dest, comp: Comp, jump: Jump },
}

impl Inst {
    pub const ADDR_MAX: u16 = 0x7FFF;

    const C_PREFIX: u16 = 0b111 << 13;

    /// Address instruction, `None` when the value does not fit in 15 bits.
    pub fn address(value: u16) -> Option<Inst> {
        Addr::new(value).map(Inst::A)
    }

    pub fn compute(dest: Dest, comp: Comp, jump: Jump) -> Inst {
        Inst::C { dest, comp, jump }
    }
}

impl Inst {
    pub fn to_bin(&self) -> u16 {
        match self {
            Inst::A(addr) => addr.value(),
            Inst::C { dest, comp, jump } => {
                Self::C_PREFIX | comp.bits() << 6 | dest.bits() << 3 | jump.bits()
            }
        }
    }

    pub fn from_bin(bin: u16) -> Option<Inst> {
        if bin & 0x8000 == 0 {
            return Some(Inst::A(Addr(bin)));
        }
        if bin & Self::C_PREFIX != Self::C_PREFIX {
            return None;
        }
        let comp = Comp::try_from(((bin >> 6) & 0b111_1111) as u8).ok()?;
        let dest = Dest::try_from(((bin >> 3) & 0b111) as u8).ok()?;
        let jump = Jump::try_from((bin & 0b111) as u8).ok()?;
        Some(Inst::C { dest, comp, jump })
    }

    /// 16 characters of `0`/`1`, most significant bit first.
    pub fn to_word(&self) -> String {
        format!("{:016b}", self.to_bin())
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        match self {
            Inst::A(addr) => cformat!("<r>@</><y>0x{:0>4X}</>", addr.value()),
            Inst::C { dest, comp, jump } => {
                let dest = match dest {
                    Dest::Null => "".to_string(),
                    _ => format!("{}=", dest),
                };
                let jump = match jump {
                    Jump::Null => "".to_string(),
                    _ => format!(";{}", jump),
                };
                cformat!("<b>{}</><r>{}</><g>{}</>", dest, comp, jump)
            }
        }
    }
}
