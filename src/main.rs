//! Entry point for the **aerospace-scratchpad** CLI.
//!
//! Each invocation parses one subcommand, runs it against the AeroSpace
//! server and exits: `0` on success, `1` after printing `Error: <msg>` on
//! stderr.  `sticky follow` is the only long-running mode.

use aerospace_scratchpad::aerospace::wm::AeroSpaceWm;
use aerospace_scratchpad::command::Command;
use aerospace_scratchpad::config::{config_dir, Config, LoggingConfig};
use aerospace_scratchpad::dry_run::DryRunWm;
use aerospace_scratchpad::geometry::Geometry;
use aerospace_scratchpad::hook::PullWindowHook;
use aerospace_scratchpad::output::{OutputFormat, OutputFormatter};
use aerospace_scratchpad::registry::StickyRegistry;
use aerospace_scratchpad::scratchpad::Scratchpad;
use aerospace_scratchpad::tracker::StickyTracker;
use aerospace_scratchpad::traits::WindowManager;
use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;

/// Scratchpad for AeroSpace WM.
///
/// Inspired by the i3 scratchpad: hide windows in a dedicated workspace and
/// bring them back on demand.
#[derive(Parser, Debug)]
#[command(name = "aerospace-scratchpad")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print the window-manager changes instead of performing them.
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Output format: text, json, tsv or csv.
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move windows to the scratchpad.
    ///
    /// Without a pattern the focused window is moved.
    Move {
        /// Application-name regex.
        pattern: Option<String>,

        /// Move every matching window, not just the focused one.
        #[arg(long)]
        all: bool,

        /// Move every floating window.
        #[arg(long)]
        all_floating: bool,

        /// Extra `property=regex` filter (repeatable).
        #[arg(short = 'F', long = "filter")]
        filters: Vec<String>,
    },

    /// Toggle matching windows between the scratchpad and the focused
    /// workspace.
    Show {
        pattern: Option<String>,

        #[arg(short = 'F', long = "filter")]
        filters: Vec<String>,
    },

    /// Bring matching windows to the focused workspace.
    Summon {
        pattern: String,

        #[arg(short = 'F', long = "filter")]
        filters: Vec<String>,

        /// Resize the summoned windows, e.g. `80%x60%` (percent of the screen).
        #[arg(long)]
        geometry: Option<Geometry>,
    },

    /// Bring back the next window in the scratchpad.
    Next,

    /// List windows in the scratchpad.
    #[command(alias = "ls")]
    List {
        #[arg(short = 'F', long = "filter")]
        filters: Vec<String>,
    },

    /// Show connection and compatibility details.
    Info,

    /// Hooks for AeroSpace callbacks.
    #[command(subcommand)]
    Hook(HookCommands),

    /// Windows that follow the focused workspace.
    #[command(subcommand)]
    Sticky(StickyCommands),
}

#[derive(Subcommand, Debug)]
enum HookCommands {
    /// Pull a window out of the scratchpad after a workspace change.
    ///
    /// Meant for `exec-on-workspace-change`:
    ///   aerospace-scratchpad hook pull-window "$AEROSPACE_PREV_WORKSPACE" "$AEROSPACE_FOCUSED_WORKSPACE"
    #[command(name = "pull-window", alias = "pull")]
    PullWindow { prev: String, focused: String },
}

#[derive(Subcommand, Debug)]
enum StickyCommands {
    /// Register an application-name regex.
    Add { pattern: String },
    /// Unregister a pattern.
    Remove { pattern: String },
    /// Print registered patterns.
    List,
    /// Keep sticky windows on the focused workspace until no pattern is left.
    Follow,
}

impl Commands {
    /// The engine command, for the subcommands that have one.
    fn to_command(&self) -> Option<Command> {
        let cmd = match self {
            Commands::Move {
                pattern,
                all,
                all_floating,
                filters,
            } => Command::Move {
                pattern: pattern.clone(),
                all: *all,
                all_floating: *all_floating,
                filters: filters.clone(),
            },
            Commands::Show { pattern, filters } => Command::Show {
                pattern: pattern.clone(),
                filters: filters.clone(),
            },
            Commands::Summon {
                pattern,
                filters,
                geometry,
            } => Command::Summon {
                pattern: pattern.clone(),
                filters: filters.clone(),
                geometry: *geometry,
            },
            Commands::Next => Command::Next,
            Commands::List { filters } => Command::List {
                filters: filters.clone(),
            },
            Commands::Info | Commands::Hook(_) | Commands::Sticky(_) => return None,
        };
        Some(cmd)
    }

    /// `true` for subcommands that never change window-manager or registry
    /// state; these skip the dry-run wrapper.
    fn is_read_only(&self) -> bool {
        match self {
            Commands::Info | Commands::Sticky(StickyCommands::List) => true,
            other => other.to_command().is_some_and(|cmd| cmd.is_read_only()),
        }
    }
}

/// Route log records to the configured file.  Logging stays off when no
/// level is set.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level_filter() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("warning: {}, logging disabled", e);
            return;
        }
    };
    if level == log::LevelFilter::Off {
        return;
    }

    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(&logging.path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "warning: unable to open log file {}: {}",
                logging.path.display(),
                e
            );
            return;
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let (config, problem) = Config::from_environment();
    init_logging(&config.logging);
    match problem {
        Some(e) => warn!("{}, using defaults", e),
        None => debug!("config dir {}", config_dir().display()),
    }

    let wm = match AeroSpaceWm::new(&config.ipc) {
        Ok(wm) => wm,
        Err(e) => fail(&e),
    };

    let result = if cli.dry_run && !cli.command.is_read_only() {
        run(&DryRunWm::new(&wm), &cli, &config)
    } else {
        run(&wm, &cli, &config)
    };

    if let Err(e) = result {
        fail(&*e);
    }
}

fn fail(e: &dyn Error) -> ! {
    error!("{}", e);
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Execute the subcommand, then close `wm`.
fn run<W: WindowManager>(wm: &W, cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let result = execute(wm, cli, config);
    if let Err(e) = wm.close() {
        debug!("closing connection: {}", e);
    }
    result
}

fn execute<W: WindowManager>(wm: &W, cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(cmd) = cli.command.to_command() {
        let mut out = OutputFormatter::new(std::io::stdout(), cli.output);
        Scratchpad::new(wm).handle(&cmd, &mut out)?;
        return Ok(());
    }

    match &cli.command {
        Commands::Info => {
            let info = Scratchpad::new(wm).info()?;
            println!("{}", info);
        }
        Commands::Hook(HookCommands::PullWindow { prev, focused }) => {
            let outcome = PullWindowHook::new(wm)
                .dry_run(cli.dry_run)
                .pull_window(prev, focused)?;
            debug!("pull-window: {:?}", outcome);
        }
        Commands::Sticky(sticky) => run_sticky(wm, sticky, cli.dry_run, config)?,
        _ => {}
    }
    Ok(())
}

fn run_sticky<W: WindowManager>(
    wm: &W,
    cmd: &StickyCommands,
    dry_run: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut registry = StickyRegistry::load()?;

    match cmd {
        StickyCommands::Add { pattern } => {
            if dry_run {
                println!("[dry-run] would add sticky pattern {:?}", pattern);
            } else if registry.add(pattern)? {
                println!("added sticky pattern {:?}", pattern);
            } else {
                println!("sticky pattern {:?} already registered", pattern);
            }
        }
        StickyCommands::Remove { pattern } => {
            if dry_run {
                println!("[dry-run] would remove sticky pattern {:?}", pattern);
            } else if registry.remove(pattern)? {
                println!("removed sticky pattern {:?}", pattern);
            } else {
                println!("sticky pattern {:?} not registered", pattern);
            }
        }
        StickyCommands::List => {
            for pattern in registry.patterns() {
                println!("{}", pattern);
            }
        }
        StickyCommands::Follow => {
            if registry.is_empty() {
                println!("no sticky patterns registered");
                return Ok(());
            }
            info!("sticky registry at {}", registry.path().display());
            StickyTracker::new(wm, registry)
                .with_poll_interval(config.sticky.poll_interval())
                .follow();
        }
    }
    Ok(())
}
