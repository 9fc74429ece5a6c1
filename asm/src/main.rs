use color_print::cprintln;
use std::path::Path;
use xhasm::{assemble, Console, Error, SymbolMap};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Output file [default: input with a .hack extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump annotated listing
    #[clap(short, long)]
    dump: bool,

    /// Export the symbol tables (.yaml/.yml for YAML, text otherwise)
    #[clap(short, long)]
    symbols: Option<String>,

    /// Also write errors and warnings to this file
    #[clap(long)]
    error_log: Option<String>,

    /// Do not print progress or diagnostics to the console
    #[clap(short, long)]
    quiet: bool,
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            cprintln!("<red,bold>error</>: {}", err);
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` when any line had an error.
fn run(args: &Args) -> Result<bool, Error> {
    macro_rules! step {
        ($($arg:tt)*) => {
            if !args.quiet {
                println!($($arg)*);
            }
        };
    }

    step!("XHAL Assembler");

    step!("1. Read Source");
    step!("  < {}", args.input);
    let source = std::fs::read_to_string(&args.input)
        .map_err(|e| Error::FileOpen(args.input.clone(), e))?;

    let mut console = Console::new(&args.input, &source).quiet(args.quiet);
    if let Some(path) = &args.error_log {
        console = console.log_to(path)?;
    }

    step!("2. Bind Labels & Encode");
    let program = assemble(&source, &mut console);
    step!(
        "  - {} instructions, {} symbols",
        program.rom_size,
        program.symbols.len()
    );

    let output = match &args.output {
        Some(path) => path.clone(),
        None => Path::new(&args.input)
            .with_extension("hack")
            .to_string_lossy()
            .into_owned(),
    };
    step!("3. Write Binary");
    step!("  > {}", output);
    std::fs::write(&output, program.to_hack()).map_err(|e| Error::FileWrite(output.clone(), e))?;

    if let Some(path) = &args.symbols {
        step!("4. Export Symbols");
        step!("  > {}", path);
        let map = SymbolMap::generate(&program.symbols);
        let text = match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => map.to_yaml()?,
            _ => map.to_text(),
        };
        std::fs::write(path, text).map_err(|e| Error::FileWrite(path.clone(), e))?;
    }

    if args.dump {
        print!("{}", program.listing(&args.input));
    }

    let (errors, warnings) = (console.errors(), console.warnings());
    console.finish()?;
    if !args.quiet {
        match errors {
            0 => cprintln!("<green,bold>done</>: {} warning(s)", warnings),
            _ => cprintln!("<red,bold>failed</>: {} error(s), {} warning(s)", errors, warnings),
        }
    }
    Ok(errors == 0)
}
