use std::{fs, process};

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use threepass::{
    Compiler,
    bytecode::disasm::print_program,
    frontend::token_dumper::TokenDumper,
    runtime::{Vm, VmConfig},
};

#[derive(Parser, Debug)]
#[command(name = "threepass")]
#[command(about = "Compile an arithmetic expression to stack-machine code and run it")]
struct Args {
    /// Program text such as "[ x y ] x * y + 1", or @path to read it from a file
    source: String,

    /// Argument values, one per declared parameter
    #[arg(allow_negative_numbers = true)]
    args: Vec<i64>,

    /// Print tokens and exit
    #[arg(long)]
    tokens: bool,

    /// Print the tree before folding and exit
    #[arg(long)]
    ast: bool,

    /// Print the tree after folding and exit
    #[arg(long)]
    folded: bool,

    /// Print the instruction listing and exit
    #[arg(long)]
    asm: bool,

    /// Skip constant folding
    #[arg(long = "no-fold")]
    no_fold: bool,

    /// Disable ANSI colors in token output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Maximum operand stack size
    #[arg(long = "max-stack", default_value_t = VmConfig::default().max_stack_size)]
    max_stack: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = Args::parse();

    let source = match args.source.strip_prefix('@') {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                error!("Failed to read '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => args.source.clone(),
    };

    if args.tokens {
        dump_tokens(&source, args.no_color);
        return;
    }

    let mut compiler = Compiler::new();
    if args.no_fold {
        compiler = compiler.without_folding();
    }

    let ast = match compiler.pass1(&source) {
        Ok(ast) => ast,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if args.ast {
        println!("{}", ast);
        return;
    }

    let ast = if args.no_fold {
        ast
    } else {
        match compiler.pass2(ast) {
            Ok(folded) => folded,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    };

    if args.folded {
        println!("{}", ast);
        return;
    }

    let program = compiler.pass3(&ast);

    if args.asm {
        print_program(&program);
        return;
    }

    let vm = Vm::with_config(VmConfig {
        max_stack_size: args.max_stack,
        ..VmConfig::default()
    });

    match vm.run(&program, &args.args) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

fn dump_tokens(source: &str, no_color: bool) {
    match threepass::tokenize(source) {
        Ok(tokens) => {
            let mut dumper = TokenDumper::new().pretty();
            if no_color {
                dumper = dumper.no_color();
            }
            dumper.dump(&tokens);
        }
        Err(e) => {
            error!("Lexer error: {}", e);
            process::exit(1);
        }
    }
}
