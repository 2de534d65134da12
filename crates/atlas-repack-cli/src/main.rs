use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use atlas_repack_core::prelude::*;
use atlas_repack_core::to_json_hash;
use clap::{ArgAction, Args, Parser, Subcommand};
use image::{ImageReader, RgbaImage};
use tracing::{error, info, warn};
use walkdir::WalkDir;

mod selector;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-repack",
    about = "Repack sprite atlas regions into a single composite page",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Repack one atlas sidecar
    Repack(RepackArgs),
    /// Repack every *.atlas under a directory; a failing unit is logged and
    /// its siblings still run
    Batch(BatchArgs),
}

#[derive(Parser, Debug, Clone)]
struct RepackArgs {
    /// Atlas sidecar file (.atlas)
    #[arg(help_heading = "Input/Output")]
    atlas: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Output base name (files will be name.png/.atlas); defaults to the
    /// input file stem
    #[arg(short, long, help_heading = "Input/Output")]
    name: Option<String>,

    /// File with one region name per line; defaults to all regions
    #[arg(long, help_heading = "Selection")]
    regions: Option<PathBuf>,
    /// Skeletal-animation JSON document; pack the attachment names its skins
    /// reference
    #[arg(long, conflicts_with = "regions", help_heading = "Selection")]
    skeleton: Option<PathBuf>,

    #[command(flatten)]
    pack: PackOpts,
}

#[derive(Args, Debug, Clone)]
struct PackOpts {
    /// Padding between sprites and around the composite edge (pixels)
    #[arg(long, default_value_t = 2, help_heading = "Packing")]
    padding: u32,
    /// Canvas area slack factor (1.1..=1.3)
    #[arg(long, default_value_t = 1.3, help_heading = "Packing")]
    slack: f64,
    /// Maximum canvas dimension; sprites that cannot fit are skipped
    #[arg(long, help_heading = "Packing")]
    max_dim: Option<u32>,
    /// Allow 90deg rotation for sprites that only fit sideways
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Packing")]
    allow_rotation: bool,
    /// Also write placement metadata as name.json
    #[arg(long, default_value_t = false, help_heading = "Export")]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
struct BatchArgs {
    /// Directory to scan recursively for *.atlas files
    #[arg(help_heading = "Input/Output")]
    input_dir: PathBuf,
    /// Output directory (one subdirectory per atlas)
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,

    #[command(flatten)]
    pack: PackOpts,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        Commands::Repack(args) => run_repack(&args),
        Commands::Batch(args) => run_batch(&args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_repack(args: &RepackArgs) -> anyhow::Result<()> {
    let diag = TracingDiag;
    let atlas = parse_file(&args.atlas, &diag)
        .with_context(|| format!("read atlas {}", args.atlas.display()))?;
    if atlas.pages.is_empty() {
        bail!("no pages found in {}", args.atlas.display());
    }

    let atlas_dir = args.atlas.parent().unwrap_or(Path::new("."));
    let images = load_page_images(&atlas, atlas_dir)?;
    let names = select_names(&atlas, args)?;
    if names.is_empty() {
        bail!("no regions selected from {}", args.atlas.display());
    }

    let stem = match &args.name {
        Some(n) => n.clone(),
        None => args
            .atlas
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "combined".to_string()),
    };
    let page_name = format!("{stem}.png");

    let cfg = RepackConfig::builder()
        .padding(args.pack.padding)
        .slack(args.pack.slack)
        .max_dim(args.pack.max_dim)
        .allow_rotation(args.pack.allow_rotation)
        .build();
    let out = repack_atlas(&atlas, &images, &names, &page_name, &cfg, &diag)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {}", args.out_dir.display()))?;
    let png_path = args.out_dir.join(&page_name);
    out.image
        .save(&png_path)
        .with_context(|| format!("write {}", png_path.display()))?;
    let sidecar_path = args.out_dir.join(format!("{stem}.atlas"));
    fs::write(&sidecar_path, &out.atlas_text)
        .with_context(|| format!("write {}", sidecar_path.display()))?;
    if args.pack.json {
        let json_path = args.out_dir.join(format!("{stem}.json"));
        let value = to_json_hash(&out, &page_name);
        fs::write(&json_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", json_path.display()))?;
    }

    let (w, h) = out.image.dimensions();
    info!(
        placed = out.placed.len(),
        skipped = out.skipped.len(),
        canvas = format!("{w}x{h}"),
        "repacked {} -> {}",
        args.atlas.display(),
        png_path.display()
    );
    if !out.skipped.is_empty() {
        warn!(skipped = ?out.skipped, "regions left out of the composite");
    }
    Ok(())
}

fn run_batch(args: &BatchArgs) -> anyhow::Result<()> {
    let mut units: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&args.input_dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "atlas")
        {
            units.push(entry.path().to_path_buf());
        }
    }
    if units.is_empty() {
        warn!("no .atlas files under {}", args.input_dir.display());
        return Ok(());
    }

    let mut failures = 0usize;
    for unit in &units {
        let stem = unit
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "atlas".to_string());
        let repack = RepackArgs {
            atlas: unit.clone(),
            out_dir: args.out_dir.join(&stem),
            name: None,
            regions: None,
            skeleton: None,
            pack: args.pack.clone(),
        };
        if let Err(e) = run_repack(&repack) {
            failures += 1;
            error!("failed to repack {}: {e:#}", unit.display());
        }
    }
    info!(
        total = units.len(),
        failures, "batch finished under {}",
        args.input_dir.display()
    );
    Ok(())
}

fn load_page_images(atlas: &Atlas, dir: &Path) -> anyhow::Result<HashMap<String, RgbaImage>> {
    let mut images = HashMap::new();
    for page in &atlas.pages {
        let path = dir.join(&page.name);
        let img = ImageReader::open(&path)
            .with_context(|| format!("open page bitmap {}", path.display()))?
            .decode()
            .with_context(|| format!("decode page bitmap {}", path.display()))?;
        images.insert(page.name.clone(), img.to_rgba8());
    }
    Ok(images)
}

fn select_names(atlas: &Atlas, args: &RepackArgs) -> anyhow::Result<Vec<String>> {
    if let Some(path) = &args.regions {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read region list {}", path.display()))?;
        return Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect());
    }
    if let Some(path) = &args.skeleton {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read skeleton {}", path.display()))?;
        let doc: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse skeleton {}", path.display()))?;
        return Ok(selector::attachment_names(&doc));
    }
    Ok(atlas.region_names())
}
