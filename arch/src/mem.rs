//! Fixed memory map of the platform.

pub const SCREEN: u16 = 0x4000;
pub const KBD: u16 = 0x6000;

/// Instruction ROM capacity in words; every ROM address fits in 15 bits.
pub const ROM_SIZE: usize = 0x8000;

/// First RAM address handed out to variables; 0-15 belong to R0..R15.
pub const VAR_BASE: u16 = 16;

/// Predefined symbols, in the order they are seeded.
pub const RESERVED: [(&str, u16); 23] = [
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
    ("SCREEN", SCREEN),
    ("KBD", KBD),
];

pub fn reserved(name: &str) -> Option<u16> {
    RESERVED
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, addr)| *addr)
}

#[test]
fn test() {
    assert_eq!(reserved("SP"), Some(0));
    assert_eq!(reserved("R15"), Some(15));
    assert_eq!(reserved("SCREEN"), Some(16384));
    assert_eq!(reserved("KBD"), Some(24576));
    assert_eq!(reserved("R16"), None);
    assert_eq!(reserved("sp"), None);
}
