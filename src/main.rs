use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ngb::input::StdinInput;
use ngb::output::StdoutOutput;
use ngb::{InstructionSet, NgbInterpreter, VmError};

/// how much of the data stack gets printed after a run
const STACK_DUMP_DEPTH: usize = 100;

/// Run an ngb image until it halts, then print what is left on the stack
#[derive(Parser, Debug)]
#[command(name = "ngb", version)]
struct Args {
    /// image file to load
    #[arg(default_value = "ngbImage")]
    image: PathBuf,

    /// print runtime statistics after the run
    #[arg(long)]
    stats: bool,

    /// log more to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    ngb::logging::init(args.verbose);

    let mut input = StdinInput::new();
    let mut output = StdoutOutput::new();
    let mut interpreter = NgbInterpreter::new(&mut input, &mut output, InstructionSet::Base);

    match run(&mut interpreter, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ngb: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(interpreter: &mut NgbInterpreter, args: &Args) -> Result<(), VmError> {
    interpreter.load_image(&args.image)?;
    let result = interpreter.run();
    if args.stats {
        print!("{}", interpreter.stats());
    }
    result?;

    for (i, v) in interpreter.stack_tail(STACK_DUMP_DEPTH) {
        print!("{:>8}: {} ", i, v);
    }
    println!();
    Ok(())
}
