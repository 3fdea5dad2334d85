use clap::Parser;
use std::io;
use std::path::Path;
use std::process;
use thiserror::Error;
use tml::{
    Grammar, Program, ProgramLoader, ProgramManager, Step, TuringMachine, TuringMachineError,
    PROGRAMS,
};

/// Parse and run a Turing machine program against an input tape.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tml-cli -p programs/flip.tm 0110
  tml-cli -b binary-increment 1011
  cat programs/flip.tm | tml-cli 0110")]
struct Cli {
    /// The program file to execute. When omitted, the program is read from piped stdin.
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<String>,

    /// Run a bundled program by name instead of a file
    #[clap(short, long)]
    builtin: Option<String>,

    /// The initial contents of the tape
    #[clap(default_value = "")]
    input: String,

    /// List the bundled programs and exit
    #[clap(long)]
    list: bool,

    /// Token accepted as "no shift" (repeatable, replaces the default N and S)
    #[clap(long = "stay-token", value_name = "TOKEN")]
    stay_tokens: Vec<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Give up after this many steps
    #[clap(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Print the transition table as JSON before running
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum Failure {
    #[error(transparent)]
    Machine(#[from] TuringMachineError),
    #[error("Gave up after {0} steps without halting")]
    StepLimit(usize),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Failure::Machine(TuringMachineError::Rejected(_)) => 2,
            Failure::Machine(_) => 1,
            Failure::StepLimit(_) => 3,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for info in PROGRAMS.iter() {
            println!("{:<20} {}", info.name, info.description);
        }
        return;
    }

    if let Err(failure) = execute(&cli) {
        eprintln!("{failure}");
        process::exit(failure.exit_code());
    }
}

fn execute(cli: &Cli) -> Result<(), Failure> {
    let mut grammar = Grammar::default();
    if !cli.stay_tokens.is_empty() {
        grammar = grammar.with_stay_tokens(cli.stay_tokens.iter().cloned());
    }
    let loader = ProgramLoader::with_grammar(grammar);

    println!("Parsing code...");
    let program = load_program(cli, &loader)?;
    println!("Done!");

    for warning in program.warnings() {
        eprintln!("Warning: {warning}");
    }
    println!("States:  {}", program.state_count());
    println!("Symbols: {}", program.symbol_count());

    if cli.json {
        let json = serde_json::to_string_pretty(&program).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to serialize program: {e}"))
        })?;
        println!("{json}");
    }

    println!("Running program...");
    let mut machine = TuringMachine::new(&program, &cli.input);
    let output = drive(&mut machine, cli)?;
    println!("Done!");
    println!("Output:");
    println!("{output}");

    Ok(())
}

/// Loads the program from a file, a bundled program, or piped stdin.
fn load_program(cli: &Cli, loader: &ProgramLoader) -> Result<Program, TuringMachineError> {
    if let Some(path) = &cli.program {
        loader.load_program(Path::new(path))
    } else if let Some(name) = &cli.builtin {
        ProgramManager::get_program_by_name_with(name, loader.grammar())
    } else if atty::isnt(atty::Stream::Stdin) {
        loader.load_program_from_reader(io::stdin().lock())
    } else {
        Err(TuringMachineError::FileError(
            "No program given. Use --program, --builtin, or pipe a program via stdin".into(),
        ))
    }
}

/// Steps the machine to completion, tracing and enforcing the step budget if requested.
fn drive(machine: &mut TuringMachine, cli: &Cli) -> Result<String, Failure> {
    if cli.debug {
        print_state(machine);
    }

    loop {
        if let Some(limit) = cli.max_steps {
            if machine.step_count() >= limit && !machine.is_halted() {
                return Err(Failure::StepLimit(limit));
            }
        }

        match machine.step() {
            Step::Continue => {
                if cli.debug {
                    print_state(machine);
                }
            }
            Step::Halt => return Ok(machine.output()),
            Step::Reject(rejection) => return Err(TuringMachineError::from(rejection).into()),
        }
    }
}

fn print_state(machine: &TuringMachine) {
    println!(
        "Step: {}, State: {}, Head: {}, Tape: {}",
        machine.step_count(),
        machine.state(),
        machine.head(),
        render_with_head(machine)
    );
}

/// Renders the visited tape with the cell under the head in brackets.
fn render_with_head(machine: &TuringMachine) -> String {
    let tape = machine.tape();
    let head = machine.head();
    let (min, max) = tape
        .bounds()
        .map_or((head, head), |(min, max)| (min.min(head), max.max(head)));

    (min..=max)
        .map(|position| {
            let symbol = tape.peek(position);
            if position == head {
                format!("[{symbol}]")
            } else {
                symbol.to_string()
            }
        })
        .collect()
}
