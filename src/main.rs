use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use lazy_fs_tree::config::{AppConfig, GeneralConfig, TreeConfig};
use lazy_fs_tree::error::{self, AppError};
use lazy_fs_tree::listing::{self, ListingOptions};
use lazy_fs_tree::logging::{setup_tracing, LogLevel};
use lazy_fs_tree::{LazyTreeModel, ModelOptions, NativeProvider};

/// Print a directory as a lazily expanded tree.
#[derive(Parser, Debug)]
#[command(name = "fstree", version, about)]
struct Cli {
    /// Root path to display (defaults to the configured path or ".")
    path: Option<PathBuf>,

    /// Number of levels to print
    #[arg(short, long)]
    depth: Option<usize>,

    /// List directories before files
    #[arg(long)]
    dirs_first: bool,

    /// Skip dot-files
    #[arg(long)]
    hide_hidden: bool,

    /// Use nerd font icons
    #[arg(long)]
    icons: bool,

    /// Explicit config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity on stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

impl Cli {
    /// Flags that were given, as a partial config layered over the files.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: None,
                show_hidden: self.hide_hidden.then_some(false),
            },
            tree: TreeConfig {
                dirs_first: self.dirs_first.then_some(true),
                depth: self.depth,
                use_icons: self.icons.then_some(true),
            },
            ..Default::default()
        }
    }
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.log_level);
    debug!("Parsed CLI arguments: {cli:?}");

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    debug!("Loaded config: {config:?}");

    let requested = cli
        .path
        .clone()
        .or_else(|| config.general.default_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let root = requested.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;
    if !root.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let provider = NativeProvider::new().show_hidden(config.show_hidden());
    let options = ModelOptions {
        dirs_first: config.dirs_first(),
    };
    let mut model = LazyTreeModel::with_options(provider, options);
    model.set_root_path(&root.to_string_lossy());

    let listing_options = ListingOptions {
        max_depth: config.depth(),
        use_icons: config.use_icons(),
        human_sizes: config.human_sizes(),
        time_format: config.time_format().to_string(),
    };
    let rows = listing::collect_rows(&mut model, &listing_options);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", root.display())?;
    write!(stdout, "{}", listing::render_table(&rows))?;
    Ok(())
}
