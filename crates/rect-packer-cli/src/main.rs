use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use rect_packer_core::{
    Atlas, PackMethod, PackerConfig, RectanglePacker, compositing::compose_rgba, to_json_array,
    to_json_hash, to_plist_hash,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "rect-packer",
    about = "Shelf-pack images into a single texture atlas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into an atlas PNG plus metadata
    Pack(PackArgs),
    /// Layout-only export (no PNG): read image sizes, compute placements, write metadata
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Max width
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_width: u32,
    /// Max height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_height: u32,
    /// Padding between images
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    padding: u32,
    /// Packing method: shelf | maxrects | guillotine (only shelf is implemented)
    #[arg(long, value_parser = ["shelf", "maxrects", "guillotine"], default_value = "shelf", help_heading = "Layout")]
    method: String,
    /// Round atlas dims up to powers of two
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pow2: bool,
    /// Allow 90deg rotation when an image fits only sideways
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    allow_rotation: bool,

    // Export
    /// Metadata format: json-array | json (alias) | json-hash | plist
    #[arg(long, default_value = "json-array", help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet, false),
        Commands::Layout(args) => run_pack(args, false, true),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool, layout_only: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        anyhow::bail!("no images found under {}", cli.input.display());
    }

    if layout_only {
        let mut packer: RectanglePacker<PathBuf> = RectanglePacker::with_config(cfg)?;
        for p in &paths {
            match image::image_dimensions(p) {
                Ok((w, h)) => register(&mut packer, image_key(&cli.input, p), w, h, p.clone()),
                Err(e) => error!(?p, error = %e, "skip image"),
            }
        }
        info!(count = packer.image_count(), "read image sizes");
        packer.pack().context("packing failed")?;
        let atlas = packer.build_atlas(&cli.name)?;
        write_metadata(cli, &atlas, None)?;
        return write_stats(cli, &packer);
    }

    let images = load_images_with_progress(&cli.input, &paths, show_progress)?;
    info!(count = images.len(), "loaded input images");
    let mut packer: RectanglePacker<RgbaImage> = RectanglePacker::with_config(cfg)?;
    for (key, rgba) in images {
        let (w, h) = rgba.dimensions();
        register(&mut packer, key, w, h, rgba);
    }
    packer.pack().context("packing failed")?;

    let png_name = format!("{}.png", cli.name);
    if !cli.dry_run {
        let canvas = compose_rgba(&packer)?;
        let png_path = cli.out_dir.join(&png_name);
        canvas
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(?png_path, "wrote atlas image");
    }

    let atlas = packer.build_atlas(&cli.name)?;
    write_metadata(cli, &atlas, Some(&png_name))?;
    write_stats(cli, &packer)
}

fn build_config(cli: &PackArgs) -> anyhow::Result<PackerConfig> {
    let method: PackMethod = cli
        .method
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown method: {}", cli.method))?;
    let base = PackerConfig::builder()
        .with_max_dimensions(cli.max_width, cli.max_height)
        .padding(cli.padding)
        .method(method)
        .pow2(cli.pow2)
        .allow_rotation(cli.allow_rotation)
        .build();

    // Config file overrides the flags field by field
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_packer_config(base)
    } else {
        base
    };
    cfg.validate()?;
    Ok(cfg)
}

fn register<T>(packer: &mut RectanglePacker<T>, key: String, w: u32, h: u32, tag: T) {
    if let Err(e) = packer.add_image(key, w, h, tag) {
        warn!(error = %e, "skip image");
    }
}

fn write_metadata(cli: &PackArgs, atlas: &Atlas, texture_file: Option<&str>) -> anyhow::Result<()> {
    let (file_name, contents) = match cli.metadata.as_str() {
        // "json" is an alias of "json-array"
        "json-array" | "json" => (
            format!("{}.json", cli.name),
            serde_json::to_string_pretty(&to_json_array(atlas))?,
        ),
        "json-hash" => (
            format!("{}.json", cli.name),
            serde_json::to_string_pretty(&to_json_hash(atlas))?,
        ),
        "plist" => (
            format!("{}.plist", cli.name),
            to_plist_hash(atlas, texture_file),
        ),
        other => anyhow::bail!("unknown metadata format: {}", other),
    };
    if cli.dry_run {
        return Ok(());
    }
    let path = cli.out_dir.join(file_name);
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    info!(?path, regions = atlas.regions.len(), "atlas written");
    Ok(())
}

fn write_stats<T>(cli: &PackArgs, packer: &RectanglePacker<T>) -> anyhow::Result<()> {
    let stats = packer.stats();
    info!(
        images = stats.num_packed,
        width = stats.packed_width,
        height = stats.packed_height,
        efficiency = format!("{:.2}%", stats.efficiency * 100.0),
        "stats"
    );
    if let Some(stats_path) = &cli.export_stats {
        if cli.dry_run {
            println!("{}", stats.summary());
        } else {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        }
    }
    Ok(())
}

/// Image files under `path` (or `path` itself), sorted, after glob filtering.
fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let filter = PathFilter {
        include: build_globset(include)?,
        exclude: build_globset(exclude)?,
    };
    if path.is_file() {
        let single = filter.accepts(path).then(|| path.to_path_buf());
        return Ok(single.into_iter().collect());
    }
    Ok(WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && filter.accepts(e.path()))
        .map(|e| e.into_path())
        .collect())
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).with_context(|| format!("bad glob {pat}"))?);
    }
    Ok(Some(builder.build()?))
}

struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    /// Exclude wins over include; globs match the `/`-separated path.
    fn accepts(&self, p: &Path) -> bool {
        let s = p.to_string_lossy().replace('\\', "/");
        let excluded = self.exclude.as_ref().is_some_and(|g| g.is_match(&s));
        let included = self.include.as_ref().is_none_or(|g| g.is_match(&s));
        !excluded && included && is_image(p)
    }
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

/// Region name for `p`: its path relative to the input root, `/`-separated.
/// A single-file input is named by its file name.
fn image_key(root: &Path, p: &Path) -> String {
    let rel = match p.strip_prefix(root) {
        Ok(r) if !r.as_os_str().is_empty() => r,
        _ => p.file_name().map(Path::new).unwrap_or(p),
    };
    rel.to_string_lossy().replace('\\', "/")
}

fn load_images_with_progress(
    root: &Path,
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(String, RgbaImage)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => list.push((image_key(root, p), img)),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_width: Option<u32>,
    max_height: Option<u32>,
    padding: Option<u32>,
    method: Option<String>,
    power_of_two: Option<bool>,
    allow_rotation: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> PackerConfig {
        if let Some(v) = self.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = self.max_height {
            cfg.max_height = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.method {
            match v.parse() {
                Ok(m) => cfg.method = m,
                Err(()) => warn!(method = %v, "unknown method in config, keeping {}", cfg.method.as_str()),
            }
        }
        if let Some(v) = self.power_of_two {
            cfg.power_of_two = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        cfg
    }
}
