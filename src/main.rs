//! drumloop — render, randomize and live-generate drum loops from the command line.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use drumloop::config::{default_config_path, EngineConfig};
use drumloop::diagnostics::RecentLog;
use drumloop::event::HostEvent;
use drumloop::groove::GrooveScript;
use drumloop::midi::MidiListener;
use drumloop::model::SeededModelLoader;
use drumloop::pipeline::PipelineOrchestrator;
use drumloop::sequence::{write_smf, PlaybackPolicy, PlaybackSequence};

/// How often the listen loop wakes to collect worker results.
const LISTEN_TICK: Duration = Duration::from_millis(20);

#[derive(Parser)]
#[command(name = "drumloop", version, about = "Groove-conditioned drum loop generator")]
struct Cli {
    /// Config file (default: ~/.drumloop/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed a YAML groove through the pipeline and print the resulting loop.
    Render {
        /// YAML file with a `notes:` list of `{time, velocity}` entries.
        #[arg(long)]
        groove: PathBuf,
        /// Override the configured density (0.0–1.0).
        #[arg(long)]
        density: Option<f32>,
        /// Override the configured seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Also write the loop to a MIDI file.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the sequence as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate a loop from a random latent, without a groove.
    Random {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Play a MIDI controller as the groove until Ctrl-C.
    Listen {
        /// MIDI device name substring.
        #[arg(long)]
        device: Option<String>,
        /// Tempo used to place incoming notes.
        #[arg(long)]
        bpm: Option<f64>,
    },
    /// List MIDI input devices.
    Devices,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = RecentLog::new(256, level).install() {
        eprintln!("failed to install logger: {e}");
    }

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match EngineConfig::load_from(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Render {
            groove,
            density,
            seed,
            out,
            json,
        } => render(config, &groove, density, seed, out.as_deref(), json),
        Command::Random { seed, out, json } => random(config, seed, out.as_deref(), json),
        Command::Listen { device, bpm } => listen(config, device, bpm),
        Command::Devices => {
            let devices = MidiListener::list_devices();
            if devices.is_empty() {
                println!("no MIDI input devices");
            }
            for name in devices {
                println!("{name}");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn orchestrator(config: &EngineConfig) -> Result<PipelineOrchestrator, Box<dyn std::error::Error>> {
    let loader = Box::new(SeededModelLoader::new(config.seed));
    Ok(PipelineOrchestrator::from_config(loader, config)?)
}

fn render(
    mut config: EngineConfig,
    groove: &Path,
    density: Option<f32>,
    seed: Option<u64>,
    out: Option<&Path>,
    json: bool,
) -> CliResult {
    if let Some(d) = density {
        config.density = d;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    let script = GrooveScript::load(groove)?;
    let params = config.initial_params();

    // Rendering waits for every result, so it always runs inline.
    let loader = Box::new(SeededModelLoader::new(config.seed));
    let mut orch = PipelineOrchestrator::inline(loader, &config);
    for event in script.to_events() {
        orch.process(&event, &params);
    }
    if !orch.is_model_ready() {
        return Err(format!("model '{}' could not be loaded", config.model_file).into());
    }

    emit(orch.sequence(), orch.policy(), json, out, config.midi.bpm)
}

fn random(
    mut config: EngineConfig,
    seed: Option<u64>,
    out: Option<&Path>,
    json: bool,
) -> CliResult {
    if let Some(s) = seed {
        config.seed = s;
    }
    let loader = Box::new(SeededModelLoader::new(config.seed));
    let mut orch = PipelineOrchestrator::inline(loader, &config);
    orch.generate_random();
    if !orch.is_model_ready() {
        return Err(format!("model '{}' could not be loaded", config.model_file).into());
    }
    emit(orch.sequence(), orch.policy(), json, out, config.midi.bpm)
}

fn listen(mut config: EngineConfig, device: Option<String>, bpm: Option<f64>) -> CliResult {
    if device.is_some() {
        config.midi.device_name = device;
    }
    if let Some(b) = bpm {
        config.midi.bpm = b;
    }

    let mut orch = orchestrator(&config)?;
    let params = config.initial_params();

    let (tx, rx) = mpsc::channel();
    let listener = MidiListener::start(&config.midi, tx)?;
    println!(
        "listening on '{}' at {} BPM (Ctrl-C to stop)",
        listener.port_name(),
        config.midi.bpm
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || running_clone.store(false, Ordering::Relaxed))?;

    while running.load(Ordering::Relaxed) {
        let event = match rx.recv_timeout(LISTEN_TICK) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => HostEvent::Absent,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        let output = orch.process(&event, &params);
        if output.sequence_changed {
            print_sequence(orch.sequence());
        }
    }

    println!("stopped");
    Ok(())
}

fn emit(
    sequence: &PlaybackSequence,
    policy: &PlaybackPolicy,
    json: bool,
    out: Option<&Path>,
    bpm: f64,
) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(sequence)?);
    } else {
        print_sequence(sequence);
    }
    if let Some(path) = out {
        write_smf(sequence, policy, bpm, path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn print_sequence(sequence: &PlaybackSequence) {
    println!("{} notes", sequence.len());
    for event in sequence.iter() {
        println!(
            "  {:>7.3} qn  note {:>3}  vel {:.2}",
            event.onset.value(),
            event.note,
            event.velocity
        );
    }
}
