use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};
use std::time::Instant;

use clap::Parser as CliParser;

use ecemc::errors::reporter::Reporter;
use ecemc::generator::generator::CodeGenerator;
use ecemc::lexer::lexer::tokenize;
use ecemc::parser::parser::Parser;
use ecemc::registry::registry::Registries;
use ecemc::FILE_EXTENSION;

#[derive(CliParser)]
#[command(version, about = "Compiles ecem source files to C++")]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Output file for the generated code
    #[arg(short, long, default_value = "out.cpp")]
    out: PathBuf,

    /// Only tokenize the input file
    #[arg(long)]
    no_parse: bool,

    /// Generate code without invoking the C++ compiler
    #[arg(long)]
    no_compile: bool,

    /// Compile the generated code without linking
    #[arg(short, long)]
    compile: bool,

    /// Run the produced binary
    #[arg(long)]
    run: bool,

    /// Optimize the produced binary
    #[arg(long)]
    production: bool,

    /// Print pipeline timings
    #[arg(short = 'V', long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let (source, path) = match read_source(&cli.file) {
        Ok(read) => read,
        Err(err) => {
            eprintln!("[panic]: Could not read file {}: {}", cli.file.display(), err);
            process::exit(1);
        }
    };
    let file_name = path.display().to_string();
    let reporter = Reporter::new(&source, file_name);

    let start = Instant::now();

    if cli.no_parse {
        match tokenize(&source) {
            Ok(tokens) => {
                for token in &tokens {
                    println!("{}", token);
                }
            }
            Err(error) => {
                reporter.print_error(&error);
                process::exit(1);
            }
        }
        if cli.verbose {
            println!("Tokenized in {:?}", start.elapsed());
        }
        return;
    }

    let registries = Registries::standard();

    let mut parser = match Parser::new(&source, &registries) {
        Ok(parser) => parser,
        Err(error) => {
            reporter.print_error(&error);
            process::exit(1);
        }
    };

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(error) => {
            reporter.print_error(&error);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!("Parsed in {:?}", start.elapsed());
    }

    for warning in parser.warnings() {
        reporter.print_warning(warning);
    }

    let generate_start = Instant::now();
    let code = CodeGenerator::new().generate(&program);
    if cli.verbose {
        println!("Generated in {:?}", generate_start.elapsed());
    }

    if let Err(err) = fs::write(&cli.out, &code) {
        eprintln!("[panic]: Could not write {}: {}", cli.out.display(), err);
        process::exit(1);
    }

    if cli.no_compile {
        if cli.verbose {
            println!("Total time: {:?}", start.elapsed());
        }
        return;
    }

    let binary = cli.out.with_extension("");
    let compile_start = Instant::now();

    let mut command = Command::new("c++");
    command.arg("-std=c++17");
    if cli.production {
        command.arg("-O2");
    }
    if cli.compile {
        command.arg("-c");
    }
    command.arg(&cli.out).arg("-o").arg(&binary);

    let output = match command.output() {
        Ok(output) => output,
        Err(err) => {
            eprintln!("[panic]: Failed to invoke c++: {}", err);
            process::exit(1);
        }
    };

    if !output.status.success() {
        eprintln!("[panic]: C++ compilation failed:");
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
        process::exit(1);
    }

    if cli.verbose {
        println!("Compiled in {:?}", compile_start.elapsed());
        println!("Total time: {:?}", start.elapsed());
    }

    if cli.run && !cli.compile {
        let status = Command::new(absolute(&binary)).status();
        match status {
            Ok(status) => process::exit(status.code().unwrap_or(0)),
            Err(err) => {
                eprintln!("[panic]: Failed to run {}: {}", binary.display(), err);
                process::exit(1);
            }
        }
    }
}

/// Reads the source file, retrying once with the language's extension
/// appended when the bare path does not exist.
fn read_source(path: &Path) -> std::io::Result<(String, PathBuf)> {
    match fs::read_to_string(path) {
        Ok(source) => Ok((source, path.to_path_buf())),
        Err(err) => {
            let name = path.to_string_lossy();
            if !name.ends_with(FILE_EXTENSION) {
                let retry = PathBuf::from(format!("{}{}", name, FILE_EXTENSION));
                if let Ok(source) = fs::read_to_string(&retry) {
                    return Ok((source, retry));
                }
            }
            Err(err)
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(".").join(path)
    }
}
