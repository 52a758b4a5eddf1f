use std::path::PathBuf;

use anyhow::{Context, Result};
use audio_system::{AudioConfig, AudioManager, Bus, BusRegistry, SoundOrigin};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Load an asset root the way the game would and print what was registered.
#[derive(Parser)]
struct Args {
    /// Asset root; the sound folder is resolved against it
    root: PathBuf,
    /// Audio config file (buses, default bus, sound folder). Defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print the backend id of every bus and sound
    #[arg(long)]
    ids: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = match &args.config {
        Some(path) => {
            AudioConfig::load(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => AudioConfig::default(),
    };
    // no device needed to inspect; the mock backend validates files exist and are non-empty
    let backend = audio_backend::create_audio_backend();
    let manager = AudioManager::startup(backend, &args.root, &config)
        .with_context(|| format!("loading assets from {}", args.root.display()))?;

    print_buses(manager.buses(), args.ids);
    print_sounds(&manager, &config, args.ids);

    manager.shutdown();
    Ok(())
}

fn print_buses(buses: &BusRegistry, ids: bool) {
    println!("Buses ({}), default: {}", buses.len(), display_name(buses.fallback()));
    for root in buses.roots() {
        print_bus(buses, root, 1, ids);
    }
}

fn print_bus(buses: &BusRegistry, bus: &Bus, depth: usize, ids: bool) {
    let id = if ids { format!(" [{}]", bus.id()) } else { String::new() };
    println!(
        "{:indent$}{} volume={:.2}{}",
        "",
        bus.name(),
        bus.default_volume(),
        id,
        indent = depth * 2
    );
    for child in buses.children_of(bus) {
        print_bus(buses, child, depth + 1, ids);
    }
}

fn print_sounds(manager: &AudioManager, config: &AudioConfig, ids: bool) {
    let sounds = manager.sounds();
    let folder = manager.assets().path(&config.sound_folder);
    println!("Sounds ({}) from {}", sounds.len(), folder.display());
    for name in sounds.names() {
        let Some(sound) = sounds.try_get(name) else { continue };
        let file = match sound.origin() {
            SoundOrigin::File(path) => path.display().to_string(),
            SoundOrigin::Embedded => "<embedded>".to_string(),
        };
        let id = if ids { format!(" [{}]", sound.id()) } else { String::new() };
        println!("  {name:<32} {:<8} {file}{id}", sound.loading_method().to_string());
    }
}

fn display_name(bus: &Bus) -> &str {
    if bus.name().is_empty() {
        "<anonymous>"
    } else {
        bus.name()
    }
}
