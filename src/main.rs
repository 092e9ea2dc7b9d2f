use anyhow::{Context, Result};
use branch_titlebar::adapters::{JumpListFile, ProjectFile, TerminalTitle};
use branch_titlebar::cli::CliArgs;
use branch_titlebar::config::Config;
use branch_titlebar::driver::{PollingDriver, tick_channel};
use branch_titlebar::git::BranchResolver;
use branch_titlebar::ports::ProjectModel;
use branch_titlebar::recent::RecentEntryStore;
use branch_titlebar::sync::{SyncState, TitleSynchronizer};
use clap::Parser;
use std::io::BufRead;
use std::thread;
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the title escape sequence
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = Config::from_cli_and_file(&args)?;

    let project = match &args.project {
        Some(path) => ProjectFile::new(path),
        None => ProjectFile::new(
            std::env::current_dir().context("Failed to determine current directory")?,
        ),
    };

    let data_dir = config.data_dir()?;
    info!("Starting branch-titlebar, recent entries in {}", data_dir.display());

    let store = RecentEntryStore::in_dir(
        &data_dir,
        config.recent_limits(),
        JumpListFile::in_dir(&data_dir),
    );
    let mut sync = TitleSynchronizer::new(
        BranchResolver::new(config.git_command()),
        TerminalTitle::stdout(),
        store,
    );
    let mut state = SyncState::default();

    if args.once {
        let outcome = sync.tick(&mut state, project.active_project().as_ref());
        info!("Tick finished: {:?}", outcome);
        return Ok(());
    }

    let (dispatcher, queue) = tick_channel();
    let driver = PollingDriver::start(config.poll_interval(), dispatcher)?;
    spawn_quit_listener(driver)?;
    info!("Type q and Enter to quit");

    // This thread is the UI-affine context: ticks run here, one at a time
    queue.run(|request| {
        let outcome = sync.tick(&mut state, project.active_project().as_ref());
        debug!(
            "Tick finished: {:?} ({:?} after scheduling)",
            outcome,
            request.scheduled_at.elapsed()
        );
    });

    info!("branch-titlebar shut down cleanly");
    Ok(())
}

/// Owns the driver until `q` is read from stdin. Stopping it closes the tick
/// queue, which ends the UI loop. Without a usable stdin the driver runs until
/// the process is killed.
fn spawn_quit_listener(driver: PollingDriver) -> Result<()> {
    thread::Builder::new()
        .name("quit-listener".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                        info!("Quit requested by user");
                        driver.stop();
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            debug!("stdin closed, polling until killed");
            loop {
                thread::park();
            }
        })
        .context("Failed to start quit listener thread")?;
    Ok(())
}
