use arch::mem::RESERVED;
use indexmap::IndexMap;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Predefined by the platform.
    Reserved,
    /// ROM address of an instruction.
    Label,
    /// RAM slot allocated on first use.
    Variable,
    /// `.EQU` value.
    Constant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub addr: u16,
    pub class: Class,
    /// Defining source line; 0 for reserved symbols.
    pub line: usize,
}

/// Outcome of a successful `bind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bind {
    New,
    /// Already bound to the same address at `line`; the first binding is kept.
    Same { line: usize },
}

#[derive(Debug, Clone)]
pub struct SymbolTable(IndexMap<String, Entry>);

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = IndexMap::new();
        for (name, addr) in RESERVED {
            table.insert(
                name.to_string(),
                Entry {
                    addr,
                    class: Class::Reserved,
                    line: 0,
                },
            );
        }
        SymbolTable(table)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.0.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<u16, Error> {
        self.0
            .get(name)
            .map(|entry| entry.addr)
            .ok_or_else(|| Error::UndefinedSymbol(name.to_string()))
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(Entry { class: Class::Reserved, .. }))
    }

    /// Never overwrites: a conflicting address is rejected and the first
    /// binding stays.
    pub fn bind(&mut self, name: &str, addr: u16, class: Class, line: usize) -> Result<Bind, Error> {
        match self.0.get(name) {
            None => {
                self.0.insert(name.to_string(), Entry { addr, class, line });
                Ok(Bind::New)
            }
            Some(prev) if prev.addr == addr => Ok(Bind::Same { line: prev.line }),
            Some(prev) => Err(Error::Redefined {
                name: name.to_string(),
                prev: prev.addr,
                addr,
                line: prev.line,
            }),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn of_class(&self, class: Class) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries().filter(move |(_, entry)| entry.class == class)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
