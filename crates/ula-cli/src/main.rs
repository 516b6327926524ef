// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ula CLI - drives the compile pipeline from source file to listing.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use colored::Colorize;

use ula_diagnostics::{DiagnosticFormatter, Severity, ToDiagnostic};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: ula lex <file.ula>");
                process::exit(1);
            }
            cmd_lex(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: ula parse <file.ula>");
                process::exit(1);
            }
            cmd_parse(&args[2]);
        }
        "check" | "typecheck" => {
            if args.len() < 3 {
                eprintln!("Usage: ula check <file.ula>");
                process::exit(1);
            }
            cmd_check(&args[2]);
        }
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: ula build <file.ula> [-o <out.asm>] [--sna]");
                process::exit(1);
            }
            let opts = parse_build_opts(&args[3..]);
            cmd_build(&args[2], opts);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("ula 0.1.0");
        }
        other => {
            // Treat as filename
            if other.ends_with(".ula") {
                cmd_build(other, BuildOpts::default());
            } else {
                eprintln!("Unknown command: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Ula 0.1.0 - a small language that compiles to Z80 assembly");
    println!();
    println!("Usage: ula <command> [args]");
    println!();
    println!("Commands:");
    println!("  lex <file>       Tokenize a file and print the token stream");
    println!("  parse <file>     Parse a file and print the AST");
    println!("  check <file>     Type check a file and print signatures");
    println!("  build <file> [-o <out.asm>] [--sna]");
    println!("                   Compile to a sjasmplus listing");
    println!("  help             Show this help");
    println!("  version          Show version");
    println!();
    println!("Running `ula <file.ula>` builds it with default options.");
}

#[derive(Default)]
struct BuildOpts {
    out_path: Option<PathBuf>,
    sna: bool,
}

fn parse_build_opts(rest: &[String]) -> BuildOpts {
    let mut opts = BuildOpts::default();
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" => match iter.next() {
                Some(p) => opts.out_path = Some(PathBuf::from(p)),
                None => {
                    eprintln!("Usage: ula build <file.ula> [-o <out.asm>] [--sna]");
                    process::exit(1);
                }
            },
            "--sna" => opts.sna = true,
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
    }
    opts
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} reading {}: {}", "error".red().bold(), path, e);
            process::exit(1);
        }
    }
}

/// Render a stage error through the diagnostic formatter and exit.
///
/// Internal errors (compiler bugs) exit with 2 so scripts can tell them
/// apart from errors in the program being compiled.
fn fail(path: &str, source: &str, err: &dyn ToDiagnostic) -> ! {
    let diagnostic = err.to_diagnostic();
    let rendered = DiagnosticFormatter::new(source)
        .with_file_name(path)
        .format(&diagnostic);
    eprint!("{}", rendered);
    let code = match diagnostic.severity {
        Severity::Internal => 2,
        Severity::Error => 1,
    };
    process::exit(code)
}

fn cmd_lex(path: &str) {
    let source = read_source(path);

    let tokens = match ula_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => fail(path, &source, &err),
    };

    println!("=== Tokens ({}) ===\n", tokens.len());
    for tok in &tokens {
        println!("{:4}:{:<3} {:?}", tok.span.start, tok.span.end, tok.kind);
    }
    println!("\n=== Lex OK: {} tokens ===", tokens.len());
}

fn cmd_parse(path: &str) {
    let source = read_source(path);

    let tokens = match ula_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => fail(path, &source, &err),
    };

    let program = match ula_parser::Parser::new(tokens).parse() {
        Ok(program) => program,
        Err(err) => fail(path, &source, &err),
    };

    println!("=== AST ({} functions) ===\n", program.funcs.len());
    for (i, func) in program.funcs.iter().enumerate() {
        println!("--- Function {} ---", i + 1);
        println!("{:#?}", func);
        println!();
    }
    println!("=== Parse OK ===");
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    let tokens = match ula_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => fail(path, &source, &err),
    };

    let program = match ula_parser::Parser::new(tokens).parse() {
        Ok(program) => program,
        Err(err) => fail(path, &source, &err),
    };

    let typed = match ula_types::typecheck(&program) {
        Ok(typed) => typed,
        Err(err) => fail(path, &source, &err),
    };

    let mut names: Vec<&String> = typed.signatures.keys().collect();
    names.sort();

    println!("=== Signatures ({}) ===\n", names.len());
    for name in names {
        let sig = &typed.signatures[name];
        let params = sig
            .params
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let frame = typed.frames.get(name).copied().unwrap_or_default();
        println!(
            "  def {}({}) -> {}   [{} params, {} locals]",
            name, params, sig.ret, frame.param_count, frame.local_count
        );
    }
    println!("\n{}", "=== Check OK ===".green());
}

fn cmd_build(path: &str, opts: BuildOpts) {
    let source = read_source(path);

    let tokens = match ula_lexer::Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => fail(path, &source, &err),
    };

    let program = match ula_parser::Parser::new(tokens).parse() {
        Ok(program) => program,
        Err(err) => fail(path, &source, &err),
    };

    let typed = match ula_types::typecheck(&program) {
        Ok(typed) => typed,
        Err(err) => fail(path, &source, &err),
    };

    let listing = match ula_codegen::generate(&program, &typed) {
        Ok(listing) => listing,
        Err(err) => fail(path, &source, &err),
    };

    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("out");
    let output = if opts.sna {
        ula_codegen::wrap_snapshot(&listing, stem)
    } else {
        listing
    };

    let out_path = opts
        .out_path
        .unwrap_or_else(|| Path::new(path).with_extension("asm"));
    if let Err(e) = fs::write(&out_path, output) {
        eprintln!(
            "{} writing {}: {}",
            "error".red().bold(),
            out_path.display(),
            e
        );
        process::exit(1);
    }
    println!("{}", out_path.display());
}
