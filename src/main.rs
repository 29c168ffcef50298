// lazycore: lazy functional Core evaluator with time-travel state viewer

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{backend::CrosstermBackend, Terminal};

use lazycore::interpreter::constants::{DEFAULT_GC_INTERVAL, DEFAULT_MAX_STEPS};
use lazycore::interpreter::engine::{EngineConfig, Interpreter, Machine};
use lazycore::interpreter::errors::EvalError;
use lazycore::interpreter::gmachine::{self, GMachine};
use lazycore::interpreter::ti::{self, TemplateMachine};
use lazycore::language::Program;
use lazycore::parser::parse;
use lazycore::ui::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Template instantiation graph reducer
    Ti,
    /// G-machine
    Gm,
    /// Run both and compare the results
    Both,
}

#[derive(ClapParser)]
#[command(name = "lazycore")]
#[command(about = "Evaluate Core programs by graph reduction")]
struct Cli {
    /// Path to the Core program
    file: PathBuf,

    /// Evaluation engine
    #[arg(long, value_enum, default_value_t = Engine::Ti)]
    engine: Engine,

    /// Browse the recorded run in the terminal UI
    #[arg(long)]
    tui: bool,

    /// Give up after this many machine steps
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Collect garbage every N steps, 0 for the default interval
    /// (template instantiation only)
    #[arg(long, value_name = "N")]
    gc_every: Option<usize>,

    /// Print the final TI state as a Graphviz graph
    #[arg(long)]
    dot: bool,

    /// Print the parsed program before running it
    #[arg(long)]
    print_program: bool,

    /// Print every intermediate state
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let program = match parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.print_program {
        println!("{}", program);
    }

    let result = match cli.engine {
        Engine::Ti => run_ti(&cli, &program, &source).map(|_| ()),
        Engine::Gm => run_gm(&cli, &program, &source).map(|_| ()),
        Engine::Both => run_ti(&cli, &program, &source).and_then(|ti_result| {
            let gm_result = run_gm(&cli, &program, &source)?;
            compare(ti_result, gm_result)
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn config(cli: &Cli, gc_interval: Option<usize>) -> EngineConfig {
    EngineConfig {
        max_steps: cli.max_steps,
        gc_interval,
        record_history: cli.tui || cli.trace,
        ..EngineConfig::default()
    }
}

/// Evaluate with the graph reducer; returns the final number when there is one
fn run_ti(cli: &Cli, program: &Program, source: &str) -> Result<Option<i64>, String> {
    let state = ti::compile(program).map_err(|e| format!("Compile error: {}", e))?;
    let gc_interval = cli.gc_every.map(|n| if n == 0 { DEFAULT_GC_INTERVAL } else { n });
    let mut interpreter = Interpreter::<TemplateMachine>::new(state, config(cli, gc_interval));
    let outcome = interpreter.run();

    if cli.trace {
        for state in interpreter.history() {
            println!("{}\n", ti::printer::show_state(state));
        }
    } else if !cli.tui {
        println!("{}", ti::printer::show_state(interpreter.state()));
    }
    if cli.dot {
        println!("{}", ti::printer::to_dot(interpreter.state()));
    }

    let number = interpreter.state().result_number();
    finish(cli, interpreter, outcome, source)?;
    Ok(number)
}

fn run_gm(cli: &Cli, program: &Program, source: &str) -> Result<Option<i64>, String> {
    let state = gmachine::compile(program).map_err(|e| format!("Compile error: {}", e))?;
    if cli.gc_every.is_some() {
        warn!("gm: the G-machine has no collector, ignoring --gc-every");
    }
    if cli.dot {
        warn!("gm: DOT output is only available for the template instantiation engine");
    }
    if cli.print_program {
        println!("{}", gmachine::printer::show_globals(&state));
    }
    let mut interpreter = Interpreter::<GMachine>::new(state, config(cli, None));
    let outcome = interpreter.run();

    if cli.trace {
        for state in interpreter.history() {
            println!("{}\n", gmachine::printer::show_state(state));
        }
    } else if !cli.tui {
        println!("{}", gmachine::printer::show_state(interpreter.state()));
    }

    let number = interpreter.state().result_number();
    finish(cli, interpreter, outcome, source)?;
    Ok(number)
}

/// Report the run outcome and hand the history to the TUI when asked
fn finish<M: Machine>(
    cli: &Cli,
    mut interpreter: Interpreter<M>,
    outcome: Result<(), EvalError>,
    source: &str,
) -> Result<(), String> {
    match &outcome {
        Ok(()) => eprintln!(
            "{}: finished in {} steps",
            M::NAME,
            interpreter.steps_taken()
        ),
        Err(e) => eprintln!("{}: runtime error: {}", M::NAME, e),
    }

    if cli.tui {
        if let Err(e) = interpreter.rewind_to_start() {
            warn!("{}: {}", M::NAME, e);
        }
        run_tui(App::new(interpreter, source.to_string()))
            .map_err(|e| format!("Terminal error: {}", e))?;
    }

    outcome.map_err(|e| format!("{}: {}", M::NAME, e))
}

fn run_tui<M: Machine>(mut app: App<M>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn compare(ti_result: Option<i64>, gm_result: Option<i64>) -> Result<(), String> {
    if ti_result == gm_result {
        eprintln!("both engines agree");
        Ok(())
    } else {
        Err(format!(
            "Engines disagree: ti gave {:?}, gm gave {:?}",
            ti_result, gm_result
        ))
    }
}
