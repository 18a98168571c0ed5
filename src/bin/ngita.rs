use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ngb::input::RawTermInput;
use ngb::output::TermOutput;
use ngb::{Cell, InstructionSet, NgbInterpreter, Statistics, VmError};

/// Run an image interactively: the terminal is put in raw mode for the
/// length of the run, and PUTC/GETC talk to it a key at a time
#[derive(Parser, Debug)]
#[command(name = "ngita", version)]
struct Args {
    /// image file to load
    #[arg(default_value = "ngaImage")]
    image: PathBuf,

    /// print runtime statistics after the run
    #[arg(long)]
    stats: bool,

    /// log more to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// what's left once the terminal is back to normal
struct Finished {
    result: Result<(), VmError>,
    stack: Vec<Cell>,
    stats: Statistics,
}

fn main() -> ExitCode {
    let args = Args::parse();
    ngb::logging::init(args.verbose);

    // raw mode is released inside run(), before anything below prints
    let finished = match run(&args) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ngita: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.stats {
        print!("{}", finished.stats);
    }
    if let Err(e) = finished.result {
        eprintln!("ngita: {}", e);
        return ExitCode::FAILURE;
    }

    println!("{}", stack_line(&finished.stack));
    ExitCode::SUCCESS
}

/// bottom to top, each value followed by a space
fn stack_line(stack: &[Cell]) -> String {
    stack.iter().map(|v| format!("{} ", v)).collect()
}

fn run(args: &Args) -> Result<Finished, VmError> {
    let mut input = RawTermInput::new()?;
    let mut output = TermOutput::new();
    let mut interpreter = NgbInterpreter::new(&mut input, &mut output, InstructionSet::Interactive);
    interpreter.load_image(&args.image)?;

    let result = interpreter.run();
    Ok(Finished {
        result,
        stack: interpreter.stack().to_vec(),
        stats: interpreter.stats().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_line_trailing_space() {
        assert_eq!(stack_line(&[5, -7, 0]), "5 -7 0 ");
        assert_eq!(stack_line(&[]), "");
    }
}
