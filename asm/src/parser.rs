use arch::{Comp, Dest, Inst, Jump};
use std::num::IntErrorKind;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

#[derive(Debug, Clone)]
pub struct Line {
    idx: usize,
    raw: String,
    pub cmd: Cmd,
}

impl Line {
    pub fn new(idx: usize, raw: &str) -> Self {
        Line {
            idx,
            raw: raw.to_string(),
            cmd: Cmd::parse(raw),
        }
    }

    /// 1-based line number.
    pub fn no(&self) -> usize {
        self.idx + 1
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> Kind {
        self.cmd.kind()
    }
}

pub fn parse_source(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::new(idx, raw))
        .collect()
}

// ----------------------------------------------------------------------------
// Command

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `dest=comp`, optionally followed by `;jump`
    ValueOnly,
    /// `comp;jump`
    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Address,
    Compute(Form),
    Label,
    Constant,
    Comment,
    Blank,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    Blank,
    Comment,
    /// Body of a `.EQU` directive.
    Constant(Directive),
    /// Operand text after `@`.
    Address(String),
    Compute(Compute),
    Label(Label),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compute {
    pub form: Form,
    pub dest: Option<String>,
    pub comp: String,
    pub jump: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub symbol: String,
    pub trailing: String,
}

const DIRECTIVE: &str = ".EQU";

impl Cmd {
    pub fn parse(raw: &str) -> Cmd {
        if raw.trim().is_empty() {
            return Cmd::Blank;
        }

        // The directive is whitespace-delimited, so check it before squeezing.
        if let Some(body) = directive_body(raw) {
            return Cmd::Constant(Directive(strip_comment(body).trim().to_string()));
        }

        let code: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if code.starts_with("//") {
            return Cmd::Comment;
        }
        if let Some(operand) = code.strip_prefix('@') {
            return Cmd::Address(strip_comment(operand).to_string());
        }

        let code = strip_comment(&code);
        let eq = code.find('=');
        let semi = code.find(';');
        match (eq, semi) {
            (Some(eq), semi) if semi.map_or(true, |semi| eq < semi) => {
                let dest = &code[..eq];
                let (comp, jump) = match code[eq + 1..].split_once(';') {
                    Some((comp, jump)) => (comp, Some(jump.to_string())),
                    None => (&code[eq + 1..], None),
                };
                return Cmd::Compute(Compute {
                    form: Form::ValueOnly,
                    dest: Some(dest.to_string()),
                    comp: comp.to_string(),
                    jump,
                });
            }
            (_, Some(semi)) => {
                return Cmd::Compute(Compute {
                    form: Form::Conditional,
                    dest: None,
                    comp: code[..semi].to_string(),
                    jump: Some(code[semi + 1..].to_string()),
                });
            }
            _ => {}
        }

        if let Some(inner) = code.strip_prefix('(') {
            if let Some((symbol, trailing)) = inner.split_once(')') {
                return Cmd::Label(Label {
                    symbol: symbol.to_string(),
                    trailing: trailing.to_string(),
                });
            }
        }

        Cmd::Unrecognized(raw.trim().to_string())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Cmd::Blank => Kind::Blank,
            Cmd::Comment => Kind::Comment,
            Cmd::Constant(_) => Kind::Constant,
            Cmd::Address(_) => Kind::Address,
            Cmd::Compute(compute) => Kind::Compute(compute.form),
            Cmd::Label(_) => Kind::Label,
            Cmd::Unrecognized(_) => Kind::Unrecognized,
        }
    }
}

fn directive_body(raw: &str) -> Option<&str> {
    let rest = raw.trim_start().strip_prefix(DIRECTIVE)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn strip_comment(s: &str) -> &str {
    match s.split_once("//") {
        Some((code, _)) => code,
        None => s,
    }
}

// ----------------------------------------------------------------------------
// Field extraction

impl Compute {
    pub fn fields(&self) -> Result<(Dest, Comp, Jump), Error> {
        let dest = match &self.dest {
            Some(s) => Dest::parse(s).ok_or_else(|| Error::UnknownDest(s.clone()))?,
            None => Dest::Null,
        };
        let comp = Comp::parse(&self.comp).ok_or_else(|| Error::UnknownComp(self.comp.clone()))?;
        let jump = match &self.jump {
            Some(s) => Jump::parse(s).ok_or_else(|| Error::UnknownJump(s.clone()))?,
            None => Jump::Null,
        };
        Ok((dest, comp, jump))
    }

    pub fn to_inst(&self) -> Result<Inst, Error> {
        let (dest, comp, jump) = self.fields()?;
        Ok(Inst::compute(dest, comp, jump))
    }
}

impl Label {
    pub fn name(&self) -> Result<&str, Error> {
        if !self.trailing.is_empty() {
            return Err(Error::TrailingText(self.trailing.clone()));
        }
        if !is_symbol(&self.symbol) {
            return Err(Error::InvalidSymbol(self.symbol.clone()));
        }
        Ok(&self.symbol)
    }
}

impl Directive {
    /// `(name, value)` of `.EQU <name> <value>`.
    pub fn fields(&self) -> Result<(&str, Operand), Error> {
        let malformed = || Error::MalformedDirective(format!("{} {}", DIRECTIVE, self.0));
        let (name, value) = self
            .0
            .split_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        let value = value.trim();
        if value.is_empty() || value.contains(char::is_whitespace) {
            return Err(malformed());
        }
        if !is_symbol(name) {
            return Err(Error::InvalidSymbol(name.to_string()));
        }
        Ok((name, Operand::parse(value)?))
    }
}

// ----------------------------------------------------------------------------
// Operand

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(u16),
    Symbol(String),
}

impl Operand {
    pub fn parse(s: &str) -> Result<Operand, Error> {
        if s.is_empty() {
            return Err(Error::MissingOperand);
        }
        if let Some(lit) = parse_with_prefix(s) {
            return lit.map(Operand::Literal);
        }
        if is_symbol(s) {
            Ok(Operand::Symbol(s.to_string()))
        } else {
            Err(Error::InvalidSymbol(s.to_string()))
        }
    }
}

/// `None` when `s` is not shaped like a number at all.
fn parse_with_prefix(s: &str) -> Option<Result<u16, Error>> {
    if s.starts_with('-') {
        return Some(Err(Error::NegativeValue(s.to_string())));
    }
    let (radix, digits) = match s.get(..2) {
        Some("0b" | "0B") => (2, &s[2..]),
        Some("0x" | "0X") => (16, &s[2..]),
        _ if s.starts_with(|c: char| c.is_ascii_digit()) => (10, s),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(Err(Error::InvalidLiteral(s.to_string(), radix)));
    }
    Some(u16::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => Error::LiteralOverflow(s.to_string()),
        _ => Error::InvalidLiteral(s.to_string(), radix),
    }))
}

pub fn is_symbol(s: &str) -> bool {
    match s.chars().next() {
        Some(head) if !head.is_ascii_digit() => s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> Kind {
        Cmd::parse(raw).kind()
    }

    #[test]
    fn classify() {
        assert_eq!(kind(""), Kind::Blank);
        assert_eq!(kind("   \t"), Kind::Blank);
        assert_eq!(kind("// just a comment"), Kind::Comment);
        assert_eq!(kind("   //indented"), Kind::Comment);
        assert_eq!(kind("@21"), Kind::Address);
        assert_eq!(kind("  @ LOOP // back"), Kind::Address);
        assert_eq!(kind("D=M"), Kind::Compute(Form::ValueOnly));
        assert_eq!(kind("AM = M + 1"), Kind::Compute(Form::ValueOnly));
        assert_eq!(kind("D=M;JGT"), Kind::Compute(Form::ValueOnly));
        assert_eq!(kind("0;JMP"), Kind::Compute(Form::Conditional));
        assert_eq!(kind("D;JGT // if positive"), Kind::Compute(Form::Conditional));
        assert_eq!(kind("(LOOP)"), Kind::Label);
        assert_eq!(kind("(LOOP) extra"), Kind::Label);
        assert_eq!(kind(".EQU MAX 100"), Kind::Constant);
        assert_eq!(kind("  .EQU MAX"), Kind::Constant);
        assert_eq!(kind("(LOOP"), Kind::Unrecognized);
        assert_eq!(kind("hello"), Kind::Unrecognized);
        assert_eq!(kind(".EQUALS 1"), Kind::Unrecognized);
    }

    #[test]
    fn comment_wins_over_compute() {
        assert_eq!(kind("// D=M;JMP"), Kind::Comment);
    }

    #[test]
    fn inline_comments_are_stripped() {
        assert_eq!(Cmd::parse("@i // counter"), Cmd::Address("i".to_string()));
        assert_eq!(
            Cmd::parse("(END) // done"),
            Cmd::Label(Label {
                symbol: "END".to_string(),
                trailing: "".to_string()
            })
        );
        assert_eq!(
            Cmd::parse(".EQU SIZE 0x10 // words"),
            Cmd::Constant(Directive("SIZE 0x10".to_string()))
        );
        match Cmd::parse("M=D // store;JMP") {
            Cmd::Compute(c) => {
                assert_eq!(c.comp, "D");
                assert_eq!(c.jump, None);
            }
            cmd => panic!("{:?}", cmd),
        }
    }

    #[test]
    fn compute_fields() {
        let fields = |raw: &str| match Cmd::parse(raw) {
            Cmd::Compute(c) => c.fields(),
            cmd => panic!("{:?}", cmd),
        };
        assert_eq!(fields("D=A").unwrap(), (Dest::D, Comp::A, Jump::Null));
        assert_eq!(fields("D = D + A").unwrap(), (Dest::D, Comp::DAddA, Jump::Null));
        assert_eq!(fields("0;JMP").unwrap(), (Dest::Null, Comp::Zero, Jump::JMP));
        assert_eq!(fields("AM=M-1;JNE").unwrap(), (Dest::AM, Comp::MDec, Jump::JNE));
        assert!(matches!(fields("X=D"), Err(Error::UnknownDest(s)) if s == "X"));
        assert!(matches!(fields("D=D+2"), Err(Error::UnknownComp(s)) if s == "D+2"));
        assert!(matches!(fields("D;JUMP"), Err(Error::UnknownJump(s)) if s == "JUMP"));
        assert!(matches!(fields("D;"), Err(Error::UnknownJump(s)) if s.is_empty()));
        assert!(matches!(fields("=D"), Err(Error::UnknownDest(s)) if s.is_empty()));
    }

    #[test]
    fn operands() {
        assert_eq!(Operand::parse("42").unwrap(), Operand::Literal(42));
        assert_eq!(Operand::parse("0b101").unwrap(), Operand::Literal(5));
        assert_eq!(Operand::parse("0B11").unwrap(), Operand::Literal(3));
        assert_eq!(Operand::parse("0x7FFF").unwrap(), Operand::Literal(0x7FFF));
        assert_eq!(Operand::parse("0Xff").unwrap(), Operand::Literal(255));
        assert_eq!(
            Operand::parse("foo$bar").unwrap(),
            Operand::Symbol("foo$bar".to_string())
        );
        assert_eq!(
            Operand::parse("Main.loop:1_x").unwrap(),
            Operand::Symbol("Main.loop:1_x".to_string())
        );
        assert!(matches!(Operand::parse(""), Err(Error::MissingOperand)));
        assert!(matches!(Operand::parse("0b102"), Err(Error::InvalidLiteral(_, 2))));
        assert!(matches!(Operand::parse("0xG1"), Err(Error::InvalidLiteral(_, 16))));
        assert!(matches!(Operand::parse("0x"), Err(Error::InvalidLiteral(_, 16))));
        assert!(matches!(Operand::parse("0x+1"), Err(Error::InvalidLiteral(_, 16))));
        assert!(matches!(Operand::parse("12ab"), Err(Error::InvalidLiteral(_, 10))));
        assert!(matches!(Operand::parse("-5"), Err(Error::NegativeValue(_))));
        assert!(matches!(Operand::parse("70000"), Err(Error::LiteralOverflow(_))));
        assert!(matches!(Operand::parse("a-b"), Err(Error::InvalidSymbol(_))));
    }

    #[test]
    fn labels() {
        let label = |raw: &str| match Cmd::parse(raw) {
            Cmd::Label(l) => l,
            cmd => panic!("{:?}", cmd),
        };
        assert_eq!(label("(LOOP)").name().unwrap(), "LOOP");
        assert_eq!(label("  ( END )  // c").name().unwrap(), "END");
        assert!(matches!(label("(LOOP)x").name(), Err(Error::TrailingText(s)) if s == "x"));
        assert!(matches!(label("(1ST)").name(), Err(Error::InvalidSymbol(_))));
        assert!(matches!(label("()").name(), Err(Error::InvalidSymbol(_))));
    }

    #[test]
    fn directives() {
        let directive = |raw: &str| match Cmd::parse(raw) {
            Cmd::Constant(d) => d,
            cmd => panic!("{:?}", cmd),
        };
        let d = directive(".EQU MAX 0x100");
        assert_eq!(d.fields().unwrap(), ("MAX", Operand::Literal(256)));
        let d = directive(".EQU\tALIAS   MAX");
        assert_eq!(
            d.fields().unwrap(),
            ("ALIAS", Operand::Symbol("MAX".to_string()))
        );
        assert!(matches!(directive(".EQU MAX").fields(), Err(Error::MalformedDirective(_))));
        assert!(matches!(directive(".EQU").fields(), Err(Error::MalformedDirective(_))));
        assert!(matches!(directive(".EQU A 1 2").fields(), Err(Error::MalformedDirective(_))));
        assert!(matches!(directive(".EQU 9A 1").fields(), Err(Error::InvalidSymbol(_))));
        assert!(matches!(directive(".EQU A 0b2").fields(), Err(Error::InvalidLiteral(_, 2))));
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let lines = parse_source("@1\n\n(X)\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].no(), 1);
        assert_eq!(lines[2].no(), 3);
        assert_eq!(lines[2].raw(), "(X)");
        assert_eq!(lines[1].kind(), Kind::Blank);
    }
}
