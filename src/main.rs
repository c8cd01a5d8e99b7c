// provetty: Terminal Front End for a Remote Sequent Prover

use std::io;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use provetty::batch::{self, Job};
use provetty::config::{Cli, Command, DEFAULT_FORMULA};
use provetty::logging;
use provetty::service::HttpProofService;
use provetty::session::{ProofSessionController, ThreadDispatcher};
use provetty::typeset::TexTypesetter;
use provetty::ui::App;

/// Extra time the batch mode waits beyond the request timeout
const WAIT_GRACE: Duration = Duration::from_secs(2);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command();

    let job = match &command {
        Command::Tui => None,
        Command::Prove { formula } => Some(Job::Prove(formula.clone())),
        Command::Solve { sequents } => Some(Job::solve_from_flat(sequents)),
    };

    if let Some(job) = job {
        logging::init_stderr(cli.verbose);

        let service = HttpProofService::new(&cli.connection.server, cli.connection.timeout())?;
        let wait = cli.connection.timeout() + WAIT_GRACE;
        let stdout = io::stdout();

        match batch::run(service, &job, wait, &mut stdout.lock()) {
            Ok(true) => return Ok(()),
            Ok(false) => process::exit(1),
            Err(e) => {
                error!(error = %e, "batch run failed");
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        }
    }

    // The terminal UI owns the screen, so logs go to a file
    if let Err(e) = logging::init_file(&cli.log_file, cli.verbose) {
        eprintln!(
            "Warning: could not open log file '{}': {}",
            cli.log_file.display(),
            e
        );
    }
    info!(server = %cli.connection.server, "starting terminal UI");

    let service = HttpProofService::new(&cli.connection.server, cli.connection.timeout())?;
    let session = ProofSessionController::new(ThreadDispatcher::new(service), TexTypesetter);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session, DEFAULT_FORMULA);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal UI failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
