use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use rtems_inspect_core::mock;
use rtems_inspect_core::{InspectCommand, InspectEvent, Inspector, SessionHandle, TargetLayout};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "RTEMS kernel object inspector", long_about = None)]
struct Cli {
    /// ELF image of the running kernel, for symbol resolution
    #[arg(short, long)]
    elf: Option<PathBuf>,

    /// Target chip name ("auto" lets the probe detect it)
    #[arg(long, default_value = "auto")]
    chip: String,

    /// Debug probe index in enumeration order
    #[arg(long, default_value_t = 0)]
    probe: usize,

    /// JSON file describing a non-default target ABI: an "id" section for
    /// the object id bit layout and an "info_table" section for the
    /// information-table offsets, either of which may be omitted
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Inspect the built-in sample image instead of hardware
    #[arg(long)]
    mock: bool,

    /// Include the verbose fields in reports
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display objects by identifier
    Object { ids: Vec<String> },
    /// Display semaphores by index
    Semaphore { indexes: Vec<String> },
    /// Display tasks by index
    Task { indexes: Vec<String> },
    /// Display message queues by index
    Mqueue { indexes: Vec<String> },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let layout = match &cli.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout file {}", path.display()))?;
            serde_json::from_str(&text).context("Failed to parse target layout")?
        }
        None => TargetLayout::default(),
    };

    let handle = if cli.mock {
        SessionHandle::spawn(move || {
            let (mem, symbols) = mock::sample_kernel();
            Ok(Inspector::with_layout(mem, symbols, layout))
        })
    } else {
        spawn_hardware(&cli, layout)?
    };

    let verbose = cli.verbose;
    let command = match cli.command {
        Commands::Object { ids } => InspectCommand::Object { args: ids, verbose },
        Commands::Semaphore { indexes } => InspectCommand::Semaphore { args: indexes, verbose },
        Commands::Task { indexes } => InspectCommand::Task { args: indexes, verbose },
        Commands::Mqueue { indexes } => InspectCommand::MessageQueue { args: indexes, verbose },
    };
    handle.send(command)?;

    let status = match handle.recv_timeout(Duration::from_secs(30))? {
        InspectEvent::Report(lines) => {
            for line in lines {
                println!("{line}");
            }
            0
        }
        InspectEvent::Failed { lines, message } => {
            for line in lines {
                println!("{line}");
            }
            eprintln!("{message}");
            1
        }
    };

    handle.shutdown();
    std::process::exit(status);
}

#[cfg(feature = "hardware")]
fn spawn_hardware(cli: &Cli, layout: TargetLayout) -> Result<SessionHandle> {
    use rtems_inspect_core::{ProbeTarget, SymbolManager};

    let elf = cli
        .elf
        .clone()
        .context("--elf is required when attaching to hardware")?;
    let chip = cli.chip.clone();
    let probe = cli.probe;
    Ok(SessionHandle::spawn(move || {
        let mem = ProbeTarget::attach(&chip, probe)?;
        let mut symbols = SymbolManager::new();
        symbols.load_elf(&elf)?;
        Ok(Inspector::with_layout(mem, symbols, layout))
    }))
}

#[cfg(not(feature = "hardware"))]
fn spawn_hardware(_cli: &Cli, _layout: TargetLayout) -> Result<SessionHandle> {
    anyhow::bail!("built without hardware support; rerun with --mock")
}
