// intcode: Intcode virtual machine with a time-travel debugger

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use intcode::interpreter::engine::{Computer, RunState};
use intcode::interpreter::history::History;
use intcode::logger::setup_logger;
use intcode::memory::Word;
use intcode::program::Program;
use intcode::ui::App;

/// Default cap on snapshot memory (1 GiB)
const DEFAULT_SNAPSHOT_LIMIT: usize = 1024 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(version, about = "Run and step through Intcode programs")]
struct Args {
    /// Program file: comma separated integers, `#` starts a comment
    program: PathBuf,

    /// Values queued as input before execution, e.g. `-i 5` or `-i 1,-2,3`
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    input: Vec<Word>,

    /// Run to completion and print outputs instead of opening the debugger
    #[arg(long)]
    headless: bool,

    /// Maximum bytes of snapshot history kept by the debugger
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
    snapshot_limit: usize,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logger();

    let program = match Program::load(&args.program) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {}: {}", args.program.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };
    eprintln!("Loaded {} ({} words)", args.program.display(), program.len());

    let mut computer = Computer::new(program);
    computer.extend_input(args.input.iter().copied());

    if args.headless {
        return Ok(run_headless(computer));
    }

    let mut history = History::new(computer, args.snapshot_limit)?;
    eprintln!("Executing program...");
    match history.record() {
        Ok(state) => {
            eprintln!("Execution stopped: machine {}.", state);
            eprintln!("Total snapshots: {}", history.total_snapshots());
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            eprintln!("Entering TUI with partial execution history...");
        }
    }
    history.rewind_to_start();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(history);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// Run without the debugger, printing one output value per line
fn run_headless(mut computer: Computer) -> ExitCode {
    let result = computer.run();
    for value in computer.drain_output() {
        println!("{}", value);
    }

    match result {
        Ok(RunState::Halted) => ExitCode::SUCCESS,
        Ok(state) => {
            eprintln!(
                "Machine stopped at pc {}: {}. Supply more values with --input.",
                computer.pc(),
                state
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            ExitCode::FAILURE
        }
    }
}
