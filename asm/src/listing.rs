use color_print::cformat;

use crate::assembler::Program;
use crate::parser::Cmd;

const GUTTER: usize = 13;

impl Program {
    /// Annotated listing: ROM address and word next to every source line.
    pub fn listing(&self, path: &str) -> String {
        let mut out = format!(
            "{}+------[{}]{}\n",
            "-".repeat(GUTTER),
            path,
            "-".repeat(45usize.saturating_sub(path.len()))
        );

        let pad = " ".repeat(GUTTER);
        // words are emitted in line order, so one cursor walks both
        let mut words = self.words.iter().peekable();
        for line in &self.lines {
            let no = line.no();
            let word = words.next_if(|word| word.line == no);
            let body = match &line.cmd {
                Cmd::Address(_) | Cmd::Compute(_) => match word {
                    Some(word) => format!(
                        "[{:04X}] {:04X} | {:>4}:   {}",
                        word.pc,
                        word.inst.to_bin(),
                        no,
                        word.inst.cformat()
                    ),
                    None => cformat!(
                        "[????] <r,s>!!!!</> | {:>4}:   {}",
                        no,
                        line.raw().trim()
                    ),
                },
                Cmd::Label(label) => cformat!("{}| {:>4}: <g>({})</>", pad, no, label.symbol),
                Cmd::Constant(directive) => cformat!("{}| {:>4}: <c>.EQU {}</>", pad, no, directive.0),
                Cmd::Unrecognized(text) => cformat!("{}| {:>4}: <r,u>{}</>", pad, no, text),
                Cmd::Comment | Cmd::Blank => {
                    format!("{}| {:>4}: {}", pad, no, line.raw().trim())
                }
            };
            out.push_str(&body);
            out.push('\n');
        }
        out.push_str(&format!("{}+{}\n", "-".repeat(GUTTER), "-".repeat(53)));
        out
    }
}
