use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::{Parser, Subcommand};
use koratab::{
    preset, presets, song, songs, Channel, ConsoleBackend, PlayerConfig, Scheduler, TabError,
    Tablature, Transport,
};

#[derive(Parser)]
#[command(name = "koratab")]
#[command(about = "Parse and play kora tablature", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the events of a tablature file
    Parse {
        /// Tablature file
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Play a tablature file or a built-in song in real time
    Play {
        /// Tablature file
        #[arg(required_unless_present = "song", conflicts_with = "song")]
        input: Option<PathBuf>,

        /// Built-in song number or name instead of a file
        #[arg(short, long)]
        song: Option<String>,

        /// Tempo in quarter notes per minute (overrides config)
        #[arg(short, long)]
        bpm: Option<f64>,

        /// Scale preset number or name (overrides config)
        #[arg(short, long)]
        tuning: Option<String>,

        /// YAML player configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the scale presets
    Presets,

    /// List the built-in songs
    Songs,
}

fn read_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn print_events(tab: &Tablature, json: bool) {
    if json {
        match serde_json::to_string_pretty(tab) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing events: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for event in tab.events() {
        let what = match &event.channel {
            Channel::Voice(id) => {
                let finger = event.finger.map(|f| f.as_str()).unwrap_or("-");
                format!("{:<4} {}", id, finger)
            }
            Channel::Text => format!("TXT  {}", event.message.as_deref().unwrap_or("")),
            Channel::PageBreak => "PAGE".to_string(),
        };
        println!("{:>6} {:>4}  {}", event.tick, event.duration, what);
    }
}

fn play(
    input: Option<&Path>,
    song_key: Option<&str>,
    bpm: Option<f64>,
    tuning: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), TabError> {
    let config = match config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    let tuning = match tuning {
        Some(key) => preset(&key)?.tuning,
        None => config.resolve_tuning()?,
    };

    let source = match (song_key, input) {
        (Some(key), _) => {
            let picked = song(key)?;
            log::info!(target: "playback", "playing \"{}\"", picked.name);
            picked.code.to_string()
        }
        (None, Some(path)) => read_source(path),
        (None, None) => String::new(),
    };
    let tab = Tablature::parse(&source);
    let mut scheduler = Scheduler::new(bpm.unwrap_or(config.bpm), config.scheduler)?;
    scheduler.set_events(tab.events());

    let backend = ConsoleBackend::new(tuning, config.samples_dir.clone());
    let mut transport = Transport::new(scheduler, backend);
    let mut last_beat = None;
    transport.on_tick(move |tick| {
        let beat = (tick / koratab::TICKS_PER_QUARTER as f64) as u64;
        if last_beat != Some(beat) {
            log::debug!(target: "playback", "beat {}", beat + 1);
            last_beat = Some(beat);
        }
    });

    transport.play()?;
    transport.run(thread::sleep);
    log::info!(
        target: "playback",
        "{} notes played",
        transport.backend().triggered().len()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Parse { input, json } => {
            let tab = Tablature::parse(&read_source(&input));
            print_events(&tab, json);
            Ok(())
        }
        Commands::Play {
            input,
            song,
            bpm,
            tuning,
            config,
        } => play(input.as_deref(), song.as_deref(), bpm, tuning, config),
        Commands::Presets => {
            for p in presets() {
                let notes: Vec<&str> = p.tuning.iter().map(|(_, pitch)| pitch).collect();
                println!("{:<36} {}", p.name, notes.join(" "));
            }
            Ok(())
        }
        Commands::Songs => {
            for (i, s) in songs().iter().enumerate() {
                let tab = s.tablature();
                println!("{:>2}. {:<40} {} notes", i + 1, s.name, tab.audible().count());
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
