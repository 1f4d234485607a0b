mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hifitime::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use parker_core::constants::{AU, SECONDS_PER_DAY};
use parker_log::{parse, parse_observation_time, save_table, write_table, DateColumns, SpiralLogWriter};
use parker_sim::{
    first_orbit, sample_track, Advance, CircularEphemeris, Ephemeris, FrameAdvanceEngine, ReferenceFrame,
    SpiralBranch, SpiralConfig, SpiralGeometry, SPACECRAFT,
};
use render::SvgSink;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parker")]
#[command(about = "Parker spiral animation and spiral log extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rotating-spiral animation and append every frame to the log
    Animate {
        /// JSON configuration (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Observation start, e.g. "2008-JAN-23 16:39:33"
        #[arg(long)]
        obs_time: Option<String>,
        /// Number of frames to run
        #[arg(long)]
        frames: Option<u32>,
        /// Timer interval between frames (ms)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Spiral log file (truncated on start)
        #[arg(long, default_value = "spiral_data_log.txt")]
        log: PathBuf,
        /// Also render one SVG per frame into this directory
        #[arg(long)]
        svg_dir: Option<PathBuf>,
    },

    /// Print positions and distances of a single frame
    Frame {
        #[arg(short, long)]
        index: u32,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Extract per-row distances from a spiral log into a tab-separated table
    Extract {
        #[arg(short, long, default_value = "spiral_data_log.txt")]
        log: PathBuf,
        /// Sample rows to extract, e.g. "15,20,25" (overrides the config)
        #[arg(long, value_delimiter = ',')]
        rows: Vec<usize>,
        /// JSON configuration supplying the target rows
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Split the date into Day/Month/Year/Hour/Minute columns
        #[arg(long)]
        decompose: bool,
    },

    /// Write the default configuration as JSON
    Config {
        #[arg(short, long, default_value = "parker.json")]
        output: PathBuf,
    },

    /// Show a body or spacecraft position at an epoch
    Observer {
        /// Body or spacecraft id: Earth, STEREO-A, STEREO-B
        #[arg(default_value = "Earth")]
        id: String,
        #[arg(short, long, default_value = "2008-JAN-23 16:39:33")]
        epoch: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<SpiralConfig> {
    match path {
        Some(path) => SpiralConfig::load(path).with_context(|| format!("Failed to load config {:?}", path)),
        None => Ok(SpiralConfig::default()),
    }
}

/// Rows given on the command line win over the configured ones
fn target_rows(cli_rows: Vec<usize>, config: &SpiralConfig) -> Vec<usize> {
    if cli_rows.is_empty() {
        config.target_rows.clone()
    } else {
        cli_rows
    }
}

/// Marker color of a spacecraft
fn craft_color(id: &str) -> &'static str {
    match id {
        "STEREO-A" => "red",
        "STEREO-B" => "blue",
        _ => "gray",
    }
}

fn build_engine(config: &SpiralConfig) -> Result<FrameAdvanceEngine> {
    let params = config.parameters()?;
    let geometry = SpiralGeometry::build(&params);
    Ok(FrameAdvanceEngine::new(geometry, config.clock()?))
}

fn svg_sink(dir: PathBuf, config: &SpiralConfig, engine: &FrameAdvanceEngine) -> Result<SvgSink> {
    let eph = CircularEphemeris::default();
    let step = Duration::from_seconds(SECONDS_PER_DAY);
    let track = sample_track(
        &eph,
        "Earth",
        engine.clock().start(),
        step,
        700,
        ReferenceFrame::HeliocentricEarthEcliptic,
    )?;

    let extent = config.radius_max_au.max(1.0) * 1.1;
    let mut sink = SvgSink::new(dir, extent)?
        .with_orbit(first_orbit(&track))
        .with_observer(engine.observer());

    // Spacecraft stay where they were at the observation start
    for id in SPACECRAFT {
        let position =
            eph.observer_position(id, engine.clock().start(), ReferenceFrame::HeliocentricEarthEcliptic)?;
        let label = id.trim_start_matches("STEREO-");
        sink = sink.with_spacecraft(label, &position, craft_color(id));
    }
    Ok(sink)
}

async fn animate(
    config: SpiralConfig,
    log: PathBuf,
    svg_dir: Option<PathBuf>,
) -> Result<()> {
    let mut engine = build_engine(&config)?;

    let writer = SpiralLogWriter::create(&log)?;
    let svg = match svg_dir {
        Some(dir) => Some(svg_sink(dir, &config, &engine)?),
        None => None,
    };
    let mut sink = (writer, svg);

    tracing::info!(
        "Animating {} frames from {} ({} h/frame, {} ms interval)",
        config.frame_count, config.obs_time, config.hours_per_frame, config.frame_interval_ms
    );

    let pb = ProgressBar::new(u64::from(config.frame_count));
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")?);

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(config.frame_interval_ms.max(1)));
    while let Some(frame) = engine.clock_mut().tick() {
        ticker.tick().await;
        if engine.advance(frame, &mut sink)? == Advance::Advanced {
            if let Some(state) = engine.state() {
                pb.set_message(state.timestamp_text.clone());
            }
            pb.inc(1);
        }
    }

    pb.finish_with_message("done");
    println!("Wrote {} frames to {:?}", sink.0.blocks_written(), sink.0.path());
    if let Some(svg) = &sink.1 {
        println!("SVG frames in {:?}", svg.dir());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Animate { config, obs_time, frames, interval_ms, log, svg_dir } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(t) = obs_time {
                config.obs_time = t;
            }
            if let Some(n) = frames {
                config.frame_count = n;
            }
            if let Some(ms) = interval_ms {
                config.frame_interval_ms = ms;
            }

            animate(config, log, svg_dir).await?;
        }

        Commands::Frame { index, config } => {
            let config = load_config(config.as_deref())?;
            let engine = build_engine(&config)?;
            let state = engine.compute(index);

            println!("Frame {} - {} (rotation {:.1} deg)", state.frame_index, state.timestamp_text,
                state.rotation_phase.to_degrees());
            println!("{:<6} {:>4} {:>10} {:>10} {:>12}", "Branch", "Row", "X (AU)", "Y (AU)", "Dist (AU)");
            for branch in SpiralBranch::all() {
                let frame = state.branch(*branch);
                for (i, (p, d)) in frame.positions.iter().zip(&frame.distances).enumerate() {
                    println!("{:<6} {:>4} {:>10.3} {:>10.3} {:>12.3}", branch.name(), i, p.x, p.y, d);
                }
            }
        }

        Commands::Extract { log, rows, config, output, decompose } => {
            let config = load_config(config.as_deref())?;
            let rows = target_rows(rows, &config);
            let layout = if decompose {
                DateColumns::Decomposed
            } else {
                DateColumns::Combined
            };

            let series = parse(&log, &rows).with_context(|| format!("Failed to read {:?}", log))?;
            match output {
                Some(path) => {
                    save_table(&series, &path, layout)?;
                    println!("Extracted {} frames into {:?}", series.len(), path);
                }
                None => write_table(&series, std::io::stdout().lock(), layout)?,
            }
        }

        Commands::Config { output } => {
            SpiralConfig::default().save(&output)?;
            println!("Default configuration written to {:?}", output);
        }

        Commands::Observer { id, epoch } => {
            let epoch = parse_observation_time(&epoch)?;
            let eph = CircularEphemeris::default();

            let hee = eph.observer_position(&id, epoch, ReferenceFrame::HeliocentricEarthEcliptic)?;
            let ecl = eph.observer_position(&id, epoch, ReferenceFrame::EclipticJ2000)?;
            let plot = hee.to_plot_xy();

            println!("{} at {}", id, epoch);
            println!("  Distance:       {:.6} AU", hee.magnitude() / AU);
            println!("  HEE:            ({:.6}, {:.6}, {:.6}) AU", hee.x / AU, hee.y / AU, hee.z / AU);
            println!("  HEE longitude:  {:.3} deg", hee.longitude().to_degrees());
            println!("  Ecliptic:       ({:.6}, {:.6}, {:.6}) AU", ecl.x / AU, ecl.y / AU, ecl.z / AU);
            println!("  Ecl. longitude: {:.3} deg", ecl.longitude().to_degrees());
            println!("  Plot axes:      horizontal {:.6}, vertical {:.6}", plot.x, plot.y);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extract_rows_come_from_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parker.json");
        std::fs::write(&path, r#"{ "target_rows": [3, 7] }"#).unwrap();
        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(target_rows(Vec::new(), &config), vec![3, 7]);
        assert_eq!(target_rows(vec![1], &config), vec![1]);
        assert_eq!(
            target_rows(Vec::new(), &SpiralConfig::default()),
            SpiralConfig::default().target_rows
        );
    }

    #[test]
    fn test_svg_sink_draws_both_spacecraft() {
        let dir = tempdir().unwrap();
        let config = SpiralConfig::default();
        let engine = build_engine(&config).unwrap();
        let sink = svg_sink(dir.path().join("frames"), &config, &engine).unwrap();

        let text = sink.document(&engine.compute(0)).to_string();
        assert!(text.contains("fill=\"red\""));
        assert!(text.contains("fill=\"blue\""));
        assert_eq!(text.matches("stroke-dasharray=\"2 4\"").count(), 3);
    }
}
