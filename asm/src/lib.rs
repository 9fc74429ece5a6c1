pub mod assembler;
pub mod error;
pub mod listing;
pub mod msg;
pub mod parser;
pub mod report;
pub mod symbol;

pub use assembler::{assemble, Program, Word};
pub use error::{Error, Warn};
pub use msg::{Console, Diagnostics, Msgs};
pub use report::SymbolMap;
pub use symbol::{Class, SymbolTable};
