use clap::{Parser, Subcommand};
use comics_catalog::cache::ThumbnailCache;
use comics_catalog::config::{self, CatalogConfig};
use comics_catalog::imaging::RustBackend;
use comics_catalog::render::{self, HtmlRenderer, JsonRenderer, RenderContext, Renderer, XmlRenderer};
use comics_catalog::types::{self, Node};
use comics_catalog::{logging, output, scan};
use std::path::{Path, PathBuf};

/// Overrides for the values in `catalog.toml`.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Directory holding the comic archives
    #[arg(long)]
    albums_dir: Option<PathBuf>,

    /// Directory cover thumbnails are cached in
    #[arg(long)]
    thumbnails_dir: Option<PathBuf>,

    /// host/base/path prefixed to every absolute URL
    #[arg(long)]
    remote_base: Option<String>,

    /// Write the HTML index
    #[arg(long)]
    html: bool,

    /// Write the XML index
    #[arg(long)]
    xml: bool,

    /// Write the JSON index
    #[arg(long)]
    json: bool,

    /// Root HTML document
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Root XML document
    #[arg(long)]
    xml_file: Option<PathBuf>,

    /// Root JSON document
    #[arg(long)]
    json_file: Option<PathBuf>,
}

impl BuildArgs {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(dir) = self.albums_dir {
            config.albums_dir = dir;
        }
        if let Some(dir) = self.thumbnails_dir {
            config.thumbnails_dir = dir;
        }
        if let Some(base) = self.remote_base {
            config.remote_base = base;
        }
        config.output.html |= self.html;
        config.output.xml |= self.xml;
        config.output.json |= self.json;
        if let Some(file) = self.html_file {
            config.output.html_file = file;
        }
        if let Some(file) = self.xml_file {
            config.output.xml_file = file;
        }
        if let Some(file) = self.json_file {
            config.output.json_file = file;
        }
    }
}

/// Overrides accepted by `check`, which only scans.
#[derive(clap::Args, Clone)]
struct CheckArgs {
    /// Directory holding the comic archives
    #[arg(long)]
    albums_dir: Option<PathBuf>,
}

impl CheckArgs {
    fn apply(self, config: &mut CatalogConfig) {
        if let Some(dir) = self.albums_dir {
            config.albums_dir = dir;
        }
    }
}

#[derive(Parser)]
#[command(name = "comics-catalog")]
#[command(about = "Static catalog generator for directories of comic archives")]
#[command(long_about = "\
Static catalog generator for directories of comic archives

The albums directory is the data source. Sub-directories become folders,
.cbz/.cbr archives become albums, and the first entry of each archive (in
name order) becomes its cover thumbnail.

Site layout (paths relative to the site root):

  catalog.toml                 # Optional config
  albums/
  ├── A_Comic.cbz              # Album \"A Comic\"
  ├── .hidden/                 # Dot-entries are ignored
  └── Series/                  # Folder \"Series\"
      └── Vol_1.cbz
  thumbnails/                  # <sha256 of cover>.png, reused across runs
  index.htm / index.xml / index.json
  Series.htm / Series.xml / Series.json

Run 'comics-catalog gen-config' to generate a documented catalog.toml.")]
#[command(version)]
struct Cli {
    /// Site root: config, albums, thumbnails and documents are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Increase diagnostic output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → thumbnails → documents
    Build(BuildArgs),
    /// Scan the albums directory and print the tree
    Check(CheckArgs),
    /// Print a stock catalog.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Build(args) => {
            let config = load_config(&cli.root, |config| args.apply(config))?;
            build(&config)?;
        }
        Command::Check(args) => {
            let config = load_config(&cli.root, |config| args.apply(config))?;
            println!("==> Checking {}", config.albums_dir.display());
            let tree = scan::scan(&config.albums_dir)?;
            output::print_tree(&tree);
            println!("==> {} albums found", types::albums(&tree).len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Enter the site root, load `catalog.toml`, apply CLI overrides, validate.
fn load_config(
    root: &Path,
    overrides: impl FnOnce(&mut CatalogConfig),
) -> Result<CatalogConfig, Box<dyn std::error::Error>> {
    std::env::set_current_dir(root)?;
    let mut config = config::load_config(Path::new("."))?;
    overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn build(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Stage 1: Scanning {}", config.albums_dir.display());
    let tree = scan::scan(&config.albums_dir)?;
    output::print_tree(&tree);
    tracing::info!(albums = types::albums(&tree).len(), "scan complete");

    println!("==> Stage 2: Thumbnails");
    init_thread_pool(&config.processing);
    let backend = RustBackend::new();
    let cache = ThumbnailCache::new(&backend, &config.thumbnails_dir, config.thumbnails.height);
    let annotation = cache.annotate(&config.albums_dir, &tree)?;
    output::print_annotation(&annotation, cache.cache_dir());

    if !config.output.any_enabled() {
        println!("==> No output format enabled (use --html, --xml or --json)");
        return Ok(());
    }

    println!("==> Stage 3: Documents");
    let ctx = RenderContext::new(&config.remote_base, &config.albums_dir);
    if config.output.html {
        write_documents("HTML", &HtmlRenderer, &annotation.tree, &config.output.html_file, &ctx)?;
    }
    if config.output.xml {
        write_documents("XML", &XmlRenderer, &annotation.tree, &config.output.xml_file, &ctx)?;
    }
    if config.output.json {
        write_documents("JSON", &JsonRenderer, &annotation.tree, &config.output.json_file, &ctx)?;
    }

    println!("==> Build complete");
    Ok(())
}

fn write_documents(
    format: &str,
    renderer: &impl Renderer,
    tree: &[Node],
    output_file: &Path,
    ctx: &RenderContext,
) -> Result<(), render::RenderError> {
    let written = render::render(renderer, tree, output_file, ctx)?;
    tracing::info!(format, documents = written.len(), "documents written");
    output::print_documents(format, &written);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never more threads than available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
