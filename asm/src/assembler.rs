use arch::{
    mem::{ROM_SIZE, VAR_BASE},
    Inst,
};

use crate::error::{Error, Warn};
use crate::msg::Diagnostics;
use crate::parser::{parse_source, Cmd, Line, Operand};
use crate::symbol::{Bind, Class, SymbolTable};

/// One emitted instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Source line number (1-based).
    pub line: usize,
    /// ROM address.
    pub pc: u16,
    pub inst: Inst,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub lines: Vec<Line>,
    pub words: Vec<Word>,
    pub symbols: SymbolTable,
    /// Number of instruction slots counted by the first pass. May exceed
    /// `ROM_SIZE`, in which case the overflowing lines were reported.
    pub rom_size: usize,
}

impl Program {
    /// The `.hack` text: one 16-character word per line.
    pub fn to_hack(&self) -> String {
        self.words
            .iter()
            .map(|word| format!("{}\n", word.inst.to_word()))
            .collect()
    }
}

pub fn assemble<D: Diagnostics>(source: &str, diag: &mut D) -> Program {
    let lines = parse_source(source);
    let mut symbols = SymbolTable::new();
    let rom_size = first_pass(&lines, &mut symbols, diag);
    let words = second_pass(&lines, &mut symbols, diag);
    Program {
        lines,
        words,
        symbols,
        rom_size,
    }
}

// ----------------------------------------------------------------------------
// Pass 1: bind labels and constants

pub fn first_pass<D: Diagnostics>(
    lines: &[Line],
    symbols: &mut SymbolTable,
    diag: &mut D,
) -> usize {
    lines.iter().fold(0usize, |pc, line| match &line.cmd {
        Cmd::Address(_) | Cmd::Compute(_) => pc + 1,
        Cmd::Label(label) => {
            let bound = label.name().and_then(|name| {
                let addr = rom_addr(pc)?;
                define(symbols, name, addr, Class::Label, line.no())
            });
            report(diag, line.no(), bound);
            pc
        }
        Cmd::Constant(directive) => {
            let bound = directive.fields().and_then(|(name, value)| {
                let value = match value {
                    Operand::Literal(v) => v,
                    Operand::Symbol(s) => symbols.lookup(&s)?,
                };
                define(symbols, name, value, Class::Constant, line.no())
            });
            report(diag, line.no(), bound);
            pc
        }
        Cmd::Comment | Cmd::Blank | Cmd::Unrecognized(_) => pc,
    })
}

fn rom_addr(pc: usize) -> Result<u16, Error> {
    u16::try_from(pc)
        .ok()
        .filter(|_| pc < ROM_SIZE)
        .ok_or(Error::RomExhausted(ROM_SIZE))
}

fn define(
    symbols: &mut SymbolTable,
    name: &str,
    addr: u16,
    class: Class,
    line: usize,
) -> Result<Option<Warn>, Error> {
    if symbols.is_reserved(name) {
        return Err(Error::ReservedSymbol(name.to_string()));
    }
    match symbols.bind(name, addr, class, line)? {
        Bind::New => Ok(None),
        Bind::Same { line } => Ok(Some(Warn::Redefined {
            name: name.to_string(),
            addr,
            line,
        })),
    }
}

fn report<D: Diagnostics>(diag: &mut D, line: usize, result: Result<Option<Warn>, Error>) {
    match result {
        Ok(None) => {}
        Ok(Some(warn)) => diag.warn(line, warn.to_string()),
        Err(err) => diag.error(line, err.to_string()),
    }
}

// ----------------------------------------------------------------------------
// Pass 2: resolve and encode

pub fn second_pass<D: Diagnostics>(
    lines: &[Line],
    symbols: &mut SymbolTable,
    diag: &mut D,
) -> Vec<Word> {
    let mut words = vec![];
    let mut pc: usize = 0;
    let mut var: u16 = VAR_BASE;

    for line in lines {
        // Slots are counted whether or not the line encodes, so label
        // addresses from the first pass stay valid. Past the end of ROM
        // nothing is resolved, so no variable is allocated.
        let encoded = match &line.cmd {
            Cmd::Address(operand) => next_slot(&mut pc).and_then(|slot| {
                let inst = resolve(operand, symbols, &mut var, line.no())?;
                Ok((slot, inst))
            }),
            Cmd::Compute(compute) => {
                next_slot(&mut pc).and_then(|slot| Ok((slot, compute.to_inst()?)))
            }
            Cmd::Unrecognized(text) => Err(Error::SyntaxError(text.clone())),
            Cmd::Label(_) | Cmd::Constant(_) | Cmd::Comment | Cmd::Blank => continue,
        };
        match encoded {
            Ok((slot, inst)) => words.push(Word {
                line: line.no(),
                pc: slot,
                inst,
            }),
            Err(err) => diag.error(line.no(), err.to_string()),
        }
    }
    words
}

fn next_slot(pc: &mut usize) -> Result<u16, Error> {
    let slot = rom_addr(*pc);
    *pc += 1;
    slot
}

fn resolve(operand: &str, symbols: &mut SymbolTable, var: &mut u16, line: usize) -> Result<Inst, Error> {
    let value = match Operand::parse(operand)? {
        Operand::Literal(v) => v,
        Operand::Symbol(name) => match symbols.get(&name) {
            Some(entry) => entry.addr,
            None => {
                if *var > Inst::ADDR_MAX {
                    return Err(Error::RamExhausted(name));
                }
                let addr = *var;
                symbols.bind(&name, addr, Class::Variable, line)?;
                *var += 1;
                addr
            }
        },
    };
    Inst::address(value).ok_or(Error::AddressOverflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::Msgs;

    fn run(source: &str) -> (Program, Msgs) {
        let mut msgs = Msgs::new();
        let program = assemble(source, &mut msgs);
        (program, msgs)
    }

    #[test]
    fn first_pass_counts_instructions() {
        let lines = parse_source("// c\n@1\n(A)\nD=M\n.EQU K 3\n0;JMP\n\nxyz\n");
        let mut symbols = SymbolTable::new();
        let mut msgs = Msgs::new();
        let rom = first_pass(&lines, &mut symbols, &mut msgs);
        assert_eq!(rom, 3);
        assert_eq!(symbols.lookup("A").unwrap(), 1);
        assert_eq!(symbols.lookup("K").unwrap(), 3);
        // grammar errors surface in the second pass only
        assert!(!msgs.has_error());
    }

    #[test]
    fn label_points_at_next_instruction() {
        let (program, msgs) = run("@0\nD=A\n(END)\n@END\n0;JMP\n");
        assert!(!msgs.has_error());
        assert_eq!(program.symbols.lookup("END").unwrap(), 2);
        assert_eq!(program.words[2].inst, Inst::address(2).unwrap());
        assert_eq!(program.words[2].pc, 2);
    }

    #[test]
    fn forward_reference() {
        let (program, msgs) = run("@SKIP\n0;JMP\nD=0\n(SKIP)\nD=1\n");
        assert!(!msgs.has_error());
        assert_eq!(program.words[0].inst, Inst::address(3).unwrap());
    }

    #[test]
    fn variables_start_at_16() {
        let (program, msgs) = run("@i\nM=1\n@j\nM=0\n@i\nD=M\n");
        assert!(!msgs.has_error());
        assert_eq!(program.symbols.lookup("i").unwrap(), 16);
        assert_eq!(program.symbols.lookup("j").unwrap(), 17);
        assert_eq!(program.words[4].inst, Inst::address(16).unwrap());
        assert_eq!(program.symbols.get("j").unwrap().line, 3);
    }

    #[test]
    fn constants_resolve() {
        let (program, msgs) = run(".EQU MAX 0x20\n.EQU TOP MAX\n@MAX\n@TOP\n");
        assert!(!msgs.has_error());
        assert_eq!(program.words[0].inst, Inst::address(32).unwrap());
        assert_eq!(program.words[1].inst, Inst::address(32).unwrap());
        assert_eq!(program.rom_size, 2);
    }

    #[test]
    fn constant_referencing_unknown_symbol() {
        let (program, msgs) = run(".EQU TOP NOPE\n@TOP\n");
        assert_eq!(msgs.errors().count(), 1);
        assert_eq!(msgs.errors().next().unwrap().line, 1);
        // TOP falls back to a variable
        assert_eq!(program.symbols.lookup("TOP").unwrap(), 16);
    }

    #[test]
    fn reserved_names_cannot_be_defined() {
        let (program, msgs) = run("(SP)\n.EQU KBD 1\n@SP\n");
        assert_eq!(msgs.errors().count(), 2);
        assert_eq!(program.symbols.lookup("SP").unwrap(), 0);
        assert_eq!(program.symbols.lookup("KBD").unwrap(), 24576);
        assert_eq!(program.words[0].inst, Inst::address(0).unwrap());
    }

    #[test]
    fn bad_lines_emit_nothing_but_keep_slots() {
        let (program, msgs) = run("@1\nD=Q\n(X)\n@X\n");
        assert_eq!(msgs.errors().count(), 1);
        assert_eq!(msgs.errors().next().unwrap().line, 2);
        assert_eq!(program.words.len(), 2);
        assert_eq!(program.words[1].inst, Inst::address(2).unwrap());
        assert_eq!(program.words[1].pc, 2);
    }

    #[test]
    fn rom_fills_exactly() {
        let source = "D=0\n".repeat(ROM_SIZE - 1) + "(LAST)\n@LAST\n";
        let (program, msgs) = run(&source);
        assert!(!msgs.has_error());
        assert_eq!(program.rom_size, ROM_SIZE);
        assert_eq!(program.symbols.lookup("LAST").unwrap(), 0x7FFF);
        assert_eq!(program.words.last().unwrap().pc, 0x7FFF);
    }

    #[test]
    fn rom_overflow_is_reported_not_wrapped() {
        let source = "D=0\n".repeat(2 * ROM_SIZE) + "(END)\n@END\n";
        let (program, msgs) = run(&source);
        let end = 2 * ROM_SIZE + 1;

        // END would sit at 65536, which used to wrap to 0
        assert!(!program.symbols.contains("END"));
        assert_eq!(program.rom_size, 2 * ROM_SIZE + 1);
        assert_eq!(program.words.len(), ROM_SIZE);
        assert!(program.words.iter().all(|w| w.inst == Inst::compute(
            arch::Dest::D,
            arch::Comp::Zero,
            arch::Jump::Null
        )));

        // one error per instruction past the ROM, plus the label
        assert_eq!(msgs.errors().count(), ROM_SIZE + 2);
        let lines: Vec<usize> = msgs.errors().map(|m| m.line).collect();
        assert_eq!(lines[0], end);
        assert_eq!(lines[1], ROM_SIZE + 1);
        assert_eq!(lines.last(), Some(&(end + 1)));
        assert!(msgs.errors().all(|m| m.text == Error::RomExhausted(ROM_SIZE).to_string()));
        // `@END` past the ROM does not allocate a variable either
        assert_eq!(program.symbols.of_class(Class::Variable).count(), 0);
    }

    #[test]
    fn address_overflow() {
        let (program, msgs) = run("@32767\n@32768\n.EQU BIG 0xFFFF\n@BIG\n");
        assert_eq!(msgs.errors().count(), 2);
        assert_eq!(program.words.len(), 1);
        assert_eq!(program.words[0].inst, Inst::address(32767).unwrap());
    }
}
