// sesac: SesaScript to C compiler

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sesascript::parser::ast::Root;
use sesascript::{emitter, parse, tokenize, CompileOptions};

/// Compile a SesaScript program to C
#[derive(Parser, Debug)]
#[command(name = "sesac")]
#[command(about = "Compile SesaScript source to C", long_about = None)]
struct Args {
    /// Source file, or `-` for standard input
    #[arg(value_name = "INPUT")]
    input: String,

    /// Write the C output here instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Print the parsed tree and exit
    #[arg(long)]
    ast: bool,

    /// Module name; built-ins are only available to `main`
    #[arg(long, default_value = "main")]
    module: String,

    /// Spaces per indentation level in the generated C
    #[arg(long, default_value_t = emitter::DEFAULT_INDENT_WIDTH)]
    indent: usize,

    /// Suppress status lines
    #[arg(short, long)]
    quiet: bool,
}

fn read_source(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read standard input")?;
        return Ok(source);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read '{}'", input))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let status = |message: String| {
        if !args.quiet {
            eprintln!("{}", message);
        }
    };

    let source = read_source(&args.input)?;

    if args.tokens {
        for token in tokenize(&source) {
            println!(
                "{}:{}\t{}",
                token.location.line, token.location.column, token
            );
        }
        return Ok(());
    }

    let options = CompileOptions {
        module_name: args.module.clone(),
        indent_width: args.indent,
    };

    status(format!("Parsing {}...", args.input));
    let root: Root = match parse(&source, &options) {
        Ok(Some(root)) => root,
        Ok(None) => {
            eprintln!("Parser error: {} is not a valid program", args.input);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };
    status(format!(
        "Parsed successfully. Found {} statements.",
        root.statements().len()
    ));

    if args.ast {
        println!("{:#?}", root);
        return Ok(());
    }

    let code = match emitter::emit_program(&root, options.indent_width) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &code)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            status(format!("Wrote {}", path.display()));
        }
        None => print!("{}", code),
    }

    Ok(())
}
