//! Scans a TIFF frame for stuck, hot and dead pixels.
//!
//! ```bash
//! defect_scan white_frame.tif --threshold 0.08 --methods mean3,median3 --output report.json
//! ```

mod args;
mod table;

use std::time::Instant;

use anyhow::{Context, Result};
use pixel_defects::{analyze, AnalysisConfig, ImageSource};

use crate::args::{parse_args, Args, USAGE};

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    common::setup_logging(&args.log_level, args.log_dir.as_deref());

    let config = build_config(&args)?;
    tracing::info!(
        image = %args.image.display(),
        threshold = config.threshold,
        methods = ?config.methods.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
        "Starting defect scan"
    );

    let start = Instant::now();
    let raster = config.tiff_source().load(&args.image)?;
    let load_time = start.elapsed();

    let start = Instant::now();
    let report = analyze(&raster, &config)?;
    let analyze_time = start.elapsed();

    tracing::info!(
        load_ms = load_time.as_secs_f64() * 1000.0,
        analyze_ms = analyze_time.as_secs_f64() * 1000.0,
        defects = report.len(),
        "Scan finished"
    );

    println!(
        "Loaded in {:.1} ms, analyzed in {:.1} ms",
        load_time.as_secs_f64() * 1000.0,
        analyze_time.as_secs_f64() * 1000.0
    );
    print!("{}", table::format_report(&report));

    if let Some(output) = &args.output {
        common::write_file(output, &report)
            .with_context(|| format!("Failed to write report to '{}'", output.display()))?;
        tracing::info!(path = %output.display(), "Report written");
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config: AnalysisConfig = match &args.config {
        Some(path) => common::read_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(methods) = &args.methods {
        config.methods = methods.clone();
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pixel_defects::{ChannelLayout, Method};

    use super::*;

    fn args_with(config: Option<PathBuf>) -> Args {
        Args {
            image: PathBuf::from("frame.tif"),
            config,
            threshold: None,
            methods: None,
            layout: None,
            output: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.yaml");
        std::fs::write(&path, "threshold: 0.3\nlayout: rgba8\nmethods: [mean5]\n").unwrap();

        let mut args = args_with(Some(path));
        args.threshold = Some(0.05);
        let config = build_config(&args).unwrap();

        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.layout, ChannelLayout::Rgba8);
        assert_eq!(config.methods, vec![Method::MEAN5]);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut args = args_with(None);
        args.threshold = Some(1.2);
        assert!(build_config(&args).is_err());
    }
}
