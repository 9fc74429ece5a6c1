use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Error;
use crate::symbol::{Class, SymbolTable};

#[derive(Debug, Serialize)]
pub struct SymbolMap {
    pub ram: IndexMap<String, SymbolEntry>,
    pub rom: IndexMap<String, SymbolEntry>,
    pub equ: IndexMap<String, SymbolEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub addr: u16,
    pub line: usize,
}

impl SymbolMap {
    pub fn generate(symbols: &SymbolTable) -> Self {
        let mut map = SymbolMap {
            ram: IndexMap::new(),
            rom: IndexMap::new(),
            equ: IndexMap::new(),
        };
        for (name, entry) in symbols.entries() {
            let table = match entry.class {
                Class::Reserved | Class::Variable => &mut map.ram,
                Class::Label => &mut map.rom,
                Class::Constant => &mut map.equ,
            };
            table.insert(
                name.to_string(),
                SymbolEntry {
                    addr: entry.addr,
                    line: entry.line,
                },
            );
        }
        map
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_text(&self) -> String {
        let sections = [
            ("RAM Symbol Table", &self.ram),
            ("ROM Symbol Table", &self.rom),
            ("EQU Symbol Table", &self.equ),
        ];
        let mut out = String::new();
        for (idx, (title, table)) in sections.iter().enumerate() {
            if idx > 0 {
                out.push_str(&format!("\n{}\n\n", "*".repeat(72)));
            }
            out.push_str(&format!("{}\n{}\n", title, "-".repeat(10)));
            out.push_str(&format!("{:<32}{:<12}{}\n", "Entry", "Address", "Line"));
            out.push_str(&format!("{}\n", "-".repeat(52)));
            for (name, entry) in table.iter() {
                out.push_str(&format!("{:<32}{:<12}{}\n", name, entry.addr, entry.line));
            }
        }
        out
    }
}
