mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, Command, GenArgs};
use djrp::audio;
use djrp::chart::generate::{build_chart, ChartSource};
use djrp::chart::Chart;
use djrp::config::{self, Config};
use djrp::play;
use djrp::play::calibration::{click_schedule, Calibrator};
use djrp::play::engine::SessionTiming;
use djrp::song::{Catalog, SongMeta};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    let catalog = Catalog::with_extra(cfg.songs.clone());

    match cli.command {
        Command::Songs => {
            println!("Available songs:");
            for song in catalog.songs() {
                println!(
                    "  {:<16} {:<24} {:>6.1} BPM  {:>6.1}s",
                    song.id, song.title, song.bpm, song.duration
                );
            }
        }
        Command::Chart { song, gen, output } => {
            let meta = catalog.get(&song)?;
            let (chart, _) = prepare_chart(meta, &gen, &cfg);
            let json = serde_json::to_string_pretty(&chart)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
                    log::info!("Wrote {} notes to {}", chart.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Play { song, inputs, gen, offset, tick } => {
            let meta = catalog.get(&song)?;
            let events = play::replay::load_inputs(&inputs)?;
            let (chart, duration_sec) = prepare_chart(meta, &gen, &cfg);

            let timing = SessionTiming {
                calibration_offset_ms: offset.unwrap_or(cfg.play.offset_ms),
                song_offset_ms: meta.offset_ms,
                song_duration_ms: duration_sec * 1000.0,
            };
            log::info!(
                "Replaying {} events against {} notes (offset {:+.0}ms)",
                events.len(),
                chart.len(),
                timing.calibration_offset_ms + timing.song_offset_ms
            );

            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ms {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("=>-"),
            );

            let tick_ms = tick.unwrap_or(cfg.play.tick_ms);
            let summary = play::replay::run_replay(chart, timing, &events, tick_ms, (), Some(&pb))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Calibrate { taps } => {
            let content = std::fs::read_to_string(&taps)
                .with_context(|| format!("Failed to read taps: {}", taps.display()))?;
            let taps_ms: Vec<f64> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse taps: {}", taps.display()))?;

            let mut calibrator = Calibrator::new(click_schedule());
            for tap in taps_ms {
                calibrator.record_tap(tap);
            }
            let estimate = calibrator.estimate();
            log::info!(
                "{} taps, average lag {}ms, recommended offset {}ms",
                estimate.samples,
                estimate.average_lag_ms,
                estimate.recommended_offset_ms
            );
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
    }

    Ok(())
}

/// Decode the song's audio and build its chart, falling back to the seeded
/// grid when decoding fails. Returns the chart and the song length in seconds.
fn prepare_chart(song: &SongMeta, args: &GenArgs, cfg: &Config) -> (Chart, f64) {
    let path = args.audio.clone().unwrap_or_else(|| song.audio.clone());
    log::info!("Decoding audio: {}", path.display());
    let decoded = audio::decode::decode_audio(&path);

    let duration_sec = match &decoded {
        Ok(samples) if samples.duration_sec() > 0.0 => samples.duration_sec(),
        _ => song.duration,
    };
    let params = song.generate_params(
        duration_sec,
        Some(args.density.unwrap_or(cfg.gen.density_nps)),
        Some(args.scratch_ratio.unwrap_or(cfg.gen.scratch_ratio)),
    );

    let (chart, source) = build_chart(decoded.as_ref(), &params);
    if source == ChartSource::Fallback {
        log::info!("'{}' charted from the fallback grid", song.id);
    }
    (chart, duration_sec)
}
