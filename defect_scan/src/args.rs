use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use pixel_defects::{ChannelLayout, Method};

pub const USAGE: &str = "\
Usage: defect_scan <image.tif> [options]

Options:
  --config <file>        YAML or JSON analysis config
  --threshold <f>        threshold as a fraction of full scale, 0 < f < 1
  --methods <a,b,...>    detectors to run: mean3, mean5, median3, hierarchical3
  --layout <layout>      expected image layout: mono16 or rgba8
  --output <file>        write the report as YAML or JSON
  --log-level <level>    tracing filter when RUST_LOG is unset (default: info)
  --log-dir <dir>        also write rolling log files to <dir>
  -h, --help             print this help";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub image: PathBuf,
    pub config: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub methods: Option<Vec<Method>>,
    pub layout: Option<ChannelLayout>,
    pub output: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

/// Parses command line arguments (without the program name).
/// Returns `None` when help was requested.
pub fn parse_args<I>(args: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut image = None;
    let mut config = None;
    let mut threshold = None;
    let mut methods = None;
    let mut layout = None;
    let mut output = None;
    let mut log_level = "info".to_string();
    let mut log_dir = None;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| anyhow!("Missing value for {name}"))
        };

        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--threshold" => {
                let text = value("--threshold")?;
                threshold = Some(
                    text.parse::<f64>()
                        .with_context(|| format!("Invalid threshold '{text}'"))?,
                );
            }
            "--methods" => {
                let list = value("--methods")?
                    .split(',')
                    .filter(|name| !name.trim().is_empty())
                    .map(str::parse::<Method>)
                    .collect::<Result<Vec<_>, _>>()?;
                if list.is_empty() {
                    bail!("--methods needs at least one method");
                }
                methods = Some(list);
            }
            "--layout" => {
                let text = value("--layout")?;
                layout = Some(
                    text.parse::<ChannelLayout>()
                        .map_err(|_| anyhow!("Invalid layout '{text}', expected mono16 or rgba8"))?,
                );
            }
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--log-level" => log_level = value("--log-level")?,
            "--log-dir" => log_dir = Some(PathBuf::from(value("--log-dir")?)),
            flag if flag.starts_with('-') => bail!("Unknown option '{flag}'"),
            path => {
                if image.is_some() {
                    bail!("Only one image path may be given, got extra '{path}'");
                }
                image = Some(PathBuf::from(path));
            }
        }
    }

    let image = image.ok_or_else(|| anyhow!("Missing image path"))?;

    Ok(Some(Args {
        image,
        config,
        threshold,
        methods,
        layout,
        output,
        log_level,
        log_dir,
    }))
}
