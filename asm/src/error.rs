use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Grammar
    #[error("Syntax Error: cannot parse `{0}`")]
    SyntaxError(String),

    #[error("Malformed directive: `{0}` (expected `.EQU <name> <value>`)")]
    MalformedDirective(String),

    #[error("Text after the closing parenthesis of label: `{0}`")]
    TrailingText(String),

    // Literal
    #[error("Missing value for address field")]
    MissingOperand,

    #[error("Cannot parse `{0}` as a base-{1} literal")]
    InvalidLiteral(String, u32),

    #[error("Literal `{0}` does not fit in 16 bits")]
    LiteralOverflow(String),

    #[error("Value `{0}` is negative; only non-negative integers are allowed")]
    NegativeValue(String),

    #[error("Address {0} is over 15 bits long; addresses are non-negative 15-bit integers")]
    AddressOverflow(u16),

    // Symbol
    #[error("Illegal symbol name: `{0}`")]
    InvalidSymbol(String),

    #[error("`{0}` is a reserved symbol and cannot be redefined")]
    ReservedSymbol(String),

    #[error("`{name}` redefines a symbol bound to {prev} (line {line}) as {addr}")]
    Redefined {
        name: String,
        prev: u16,
        addr: u16,
        line: usize,
    },

    #[error("Undefined symbol: `{0}`")]
    UndefinedSymbol(String),

    #[error("No RAM left to allocate variable `{0}`")]
    RamExhausted(String),

    #[error("Program exceeds the {0}-word instruction ROM")]
    RomExhausted(usize),

    // Field
    #[error("Unknown dest mnemonic: `{0}`")]
    UnknownDest(String),

    #[error("Unknown comp mnemonic: `{0}`")]
    UnknownComp(String),

    #[error("Unknown jump mnemonic: `{0}`")]
    UnknownJump(String),

    // IO
    #[error("Failed to read file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to serialize symbol table")]
    Export(#[from] serde_yaml::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warn {
    #[error("`{name}` redefines a symbol from line {line} with the same address {addr}; this was likely unintended")]
    Redefined { name: String, addr: u16, line: usize },
}
