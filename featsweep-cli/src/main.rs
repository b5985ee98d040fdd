use clap::Parser;
use featsweep::sweep::RegionOfInterest;
use featsweep::{
    CsvSink, DescriptorKind, DetectorKind, MatcherKind, SelectorKind, SequenceLayout, SweepConfig,
    SweepEngine,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "FeatSweep keypoint benchmark (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-stage diagnostics.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SequenceJson {
    dir: String,
    prefix: String,
    extension: String,
    start_index: usize,
    end_index: usize,
    fill_width: usize,
}

impl Default for SequenceJson {
    fn default() -> Self {
        let layout = SequenceLayout::default();
        Self {
            dir: layout.dir.display().to_string(),
            prefix: layout.prefix,
            extension: layout.extension,
            start_index: layout.start_index,
            end_index: layout.end_index,
            fill_width: layout.fill_width,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoiJson {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    sequence: SequenceJson,
    detectors: Vec<String>,
    descriptors: Vec<String>,
    matcher: String,
    selector: String,
    roi: Option<RoiJson>,
    window_capacity: usize,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let sweep = SweepConfig::default();
        let roi = RegionOfInterest::default();
        Self {
            sequence: SequenceJson::default(),
            detectors: sweep.detectors.iter().map(|k| k.name().to_string()).collect(),
            descriptors: sweep
                .descriptors
                .iter()
                .map(|k| k.name().to_string())
                .collect(),
            matcher: sweep.matcher.name().to_string(),
            selector: sweep.selector.name().to_string(),
            roi: Some(RoiJson {
                x: roi.x,
                y: roi.y,
                width: roi.width,
                height: roi.height,
            }),
            window_capacity: sweep.window_capacity,
            output_path: None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("featsweep=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.sequence.end_index < config.sequence.start_index {
        return Err("sequence end_index must be >= start_index".into());
    }
    if config.detectors.is_empty() || config.descriptors.is_empty() {
        return Err("detectors and descriptors must be non-empty".into());
    }

    let detectors = config
        .detectors
        .iter()
        .map(|name| name.parse::<DetectorKind>())
        .collect::<Result<Vec<_>, _>>()?;
    let descriptors = config
        .descriptors
        .iter()
        .map(|name| name.parse::<DescriptorKind>())
        .collect::<Result<Vec<_>, _>>()?;

    let sweep_config = SweepConfig {
        detectors,
        descriptors,
        matcher: config.matcher.parse::<MatcherKind>()?,
        selector: config.selector.parse::<SelectorKind>()?,
        roi: config.roi.map(|r| RegionOfInterest {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }),
        window_capacity: config.window_capacity,
    };

    let layout = SequenceLayout {
        dir: PathBuf::from(config.sequence.dir),
        prefix: config.sequence.prefix,
        extension: config.sequence.extension,
        start_index: config.sequence.start_index,
        end_index: config.sequence.end_index,
        fill_width: config.sequence.fill_width,
    };
    let source = featsweep::sequence::ImageSequence::new(layout);

    let engine = SweepEngine::new(sweep_config);
    match config.output_path {
        Some(path) => {
            let file = fs::File::create(&path)?;
            let mut sink = CsvSink::new(io::BufWriter::new(file));
            engine.run(&source, &mut sink)?;
            eprintln!("results written to {path}");
        }
        None => {
            let stdout = io::stdout();
            let mut sink = CsvSink::new(stdout.lock());
            engine.run(&source, &mut sink)?;
        }
    }

    Ok(())
}
