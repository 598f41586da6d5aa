use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use metatagger::cache::RenderCache;
use metatagger::exif::{ExifRecord, decode_metadata};
use metatagger::format::{self, DisplayLines};
use metatagger::geocode::{self, NominatimResolver};
use metatagger::overlay::Alignment;
use metatagger::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "metatagger",
    version,
    about = "Burn camera model, place name, and exposure settings from EXIF metadata onto photos"
)]
struct Cli {
    /// Image files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Text alignment (overrides config)
    #[arg(long, value_enum)]
    align: Option<AlignArg>,

    /// Leave out the camera model line
    #[arg(long)]
    no_model: bool,

    /// Leave out the place line
    #[arg(long)]
    no_location: bool,

    /// Leave out the camera settings line
    #[arg(long)]
    no_settings: bool,

    /// Directory for rendered images (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Render without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Display the decoded metadata and overlay text, then exit
    #[arg(long = "show-exif")]
    show_exif: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlignArg {
    Left,
    Right,
}

impl From<AlignArg> for Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => Alignment::Left,
            AlignArg::Right => Alignment::Right,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config and apply CLI overrides
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(align) = cli.align {
        config.overlay.alignment = align.into();
    }
    if cli.no_model {
        config.overlay.show_model = false;
    }
    if cli.no_location {
        config.overlay.show_location = false;
    }
    if cli.no_settings {
        config.overlay.show_settings = false;
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = Some(dir);
    }
    if cli.dry_run {
        config.output.dry_run = true;
    }

    // Collect images
    let images = pipeline::collect_images(&cli.paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    // Handle --show-exif
    if cli.show_exif {
        let resolver = config.geocoding.enabled.then(|| {
            NominatimResolver::new(
                config.geocoding.endpoint.clone(),
                config.geocoding.user_agent.clone(),
            )
        });
        let mut records = Vec::new();
        for image_path in &images {
            let bytes = std::fs::read(image_path)
                .with_context(|| format!("Failed to read {}", image_path.display()))?;
            let mut record = ExifRecord::from_raw(&decode_metadata(&bytes));
            if let (Some(gps), Some(resolver)) = (record.gps, &resolver) {
                record = record.with_place(geocode::resolve_place(resolver, gps).await);
            }
            if cli.json {
                let lines = DisplayLines::from_record(&record);
                records.push(serde_json::json!({
                    "path": image_path.display().to_string(),
                    "metadata": record,
                    "lines": {
                        "model": lines.model,
                        "place": lines.place,
                        "settings": lines.settings,
                    },
                }));
            } else {
                print_record(image_path, &record);
            }
        }
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        return Ok(());
    }

    log::info!("Found {} image(s) to process", images.len());
    if config.output.dry_run {
        log::info!("DRY RUN — no files will be written");
    }

    let tagger = pipeline::TaggerPipeline::from_config(&config)
        .context("Failed to set up overlay fonts (check the \"fonts\" section of config.json)")?;
    let mut cache = RenderCache::new();

    // Process each image
    let mut results = Vec::new();
    let total = images.len();

    for (i, image_path) in images.iter().enumerate() {
        log::info!(
            "[{}/{}] Processing: {}",
            i + 1,
            total,
            image_path.display()
        );

        let result = pipeline::process_file(image_path, &tagger, &config, &mut cache).await;

        // Print result
        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        } else {
            if let Some(ref record) = result.record {
                log::info!(
                    "  Camera: {} {}",
                    format::format_make(record.make.as_deref()),
                    record.model.as_deref().unwrap_or(format::UNKNOWN_MODEL)
                );
                if let Some(ref place) = record.place {
                    log::info!("  Place: {}", format::format_place(place));
                }
            }
            if let Some(ref out) = result.output_path {
                let action = if result.written { "Wrote" } else { "Would write" };
                log::info!("  {action}: {}", out.display());
            }
        }

        results.push(result);
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "output_path": r.output_path.as_ref().map(|p| p.display().to_string()),
                    "metadata": r.record,
                    "written": r.written,
                    "cached": r.cached,
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!("Done: {success} succeeded, {failed} failed out of {total} images");

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print the decoded metadata and resulting overlay text for a file.
fn print_record(path: &Path, record: &ExifRecord) {
    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    println!("{DIM}{}{RESET}", "═".repeat(72));

    println!("  {BOLD}Camera{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    print_row("Make", &format::format_make(record.make.as_deref()));
    print_row("Model", record.model.as_deref().unwrap_or(format::UNKNOWN_MODEL));
    println!();

    println!("  {BOLD}Capture Settings{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    print_row("ISO", &format::format_iso(record.iso));
    print_row("FocalLength", &format::format_focal_length(record.focal_length));
    print_row("FNumber", &format::format_f_number(record.f_number));
    print_row("ExposureTime", &format::format_exposure_time(record.exposure_time));
    let orientation = record
        .orientation
        .map(|o| o.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    print_row("Orientation", &orientation);
    println!();

    if let Some(gps) = record.gps {
        println!("  {BOLD}GPS{RESET}");
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        print_row("Latitude", &format!("{:.6}", gps.latitude));
        print_row("Longitude", &format!("{:.6}", gps.longitude));
        match record.place {
            Some(ref place) => print_row("Place", &format::format_place(place)),
            None => print_row("Place", "(not resolved)"),
        }
        println!();
    }

    let lines = DisplayLines::from_record(record);
    println!("  {BOLD}Overlay{RESET}");
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    print_row("Model line", &lines.model);
    if let Some(ref place) = lines.place {
        print_row("Place line", place);
    }
    print_row("Settings line", &lines.settings);
    println!();
}

/// Max width for the value column before wrapping.
const VAL_WIDTH: usize = 46;
/// Indent for continuation lines (tag column width + " : " = 25 chars + 2 leading spaces).
const INDENT: &str = "                           ";

/// Print a single row in the metadata table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {tag_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}
