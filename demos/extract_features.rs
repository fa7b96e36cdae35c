//! Example: Extract mean MFCC vectors for every WAV file in a directory
//!
//! Usage:
//!   cargo run --release --example extract_features -- [--jobs N] [--json] [--config FILE] <dir>
//!
//! Notes:
//! - Parallelism is across files. Each file's chain runs on one worker.
//! - A file that fails anywhere in the chain is reported with its diagnostic;
//!   the batch carries on.
//! - `--config` reads a JSON `FeatureConfig`; missing fields keep their defaults.

use guarded_dsp::io::files::{files_in_dir, only_wav_files};
use guarded_dsp::pipeline::{mean_mfcc, normalized_audio_with};
use guarded_dsp::{BacktraceMode, Empty, FeatureConfig, GuardConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize)]
struct ItemOut {
    file: String,
    /// Directory the file sits in, used as its label
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_mfcc: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Empty>,
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn label_of(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut dir: Option<String> = None;
    let mut config_path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--config" => {
                config_path = Some(args.first().ok_or("--config requires a path")?.clone());
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: extract_features [--jobs N] [--json] [--config FILE] <dir>\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --json         Emit one JSON object per line (JSONL)\n\
                     --config FILE  Feature parameters as JSON\n"
                );
                return Ok(());
            }
            _ => dir = Some(a),
        }
    }

    let Some(dir) = dir else {
        eprintln!("ERROR: Provide a directory of WAV files. Use --help for usage.");
        std::process::exit(2);
    };

    let paths = only_wav_files(files_in_dir(&dir)?);
    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config: FeatureConfig = match &config_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => FeatureConfig::default(),
    };
    log::info!("Feature config: {}", serde_json::to_string(&config)?);
    // Backtraces only when RUST_BACKTRACE asks for them.
    let guard = GuardConfig {
        backtrace: BacktraceMode::Env,
        ..GuardConfig::default()
    };

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let features = mean_mfcc(&normalized_audio_with(path, &config, guard), &config);
                let (mean_mfcc, error) = match features.into_inner() {
                    Ok(mean) => (Some(mean), None),
                    Err(empty) => (None, Some(empty)),
                };
                ItemOut {
                    file: path.display().to_string(),
                    label: label_of(path),
                    mean_mfcc,
                    error,
                }
            })
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        if json {
            println!("{}", serde_json::to_string(o)?);
            continue;
        }
        match (&o.mean_mfcc, &o.error) {
            (Some(mean), _) => println!(
                "[{}/{}] {} ({}): {} coefficients, c0={:.2}",
                idx + 1,
                outs.len(),
                o.file,
                o.label,
                mean.len(),
                mean.first().copied().unwrap_or(0.0)
            ),
            (None, Some(empty)) => println!(
                "[{}/{}] {}: ERROR: {:#}",
                idx + 1,
                outs.len(),
                o.file,
                empty
            ),
            (None, None) => println!("[{}/{}] {}: ERROR", idx + 1, outs.len(), o.file),
        }
    }

    let ok = outs.iter().filter(|o| o.mean_mfcc.is_some()).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
