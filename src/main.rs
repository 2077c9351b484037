//! Interactive Cloudscape layout builder.

use cloudscape_rad_builder::catalog::Catalog;
use cloudscape_rad_builder::config::Config;
use cloudscape_rad_builder::highlight::Highlighter;
use cloudscape_rad_builder::history::History;
use cloudscape_rad_builder::ident::IdGenerator;
use cloudscape_rad_builder::layout::Region;
use cloudscape_rad_builder::persistence::FileStore;
use cloudscape_rad_builder::shell::{self, Flow};
use cloudscape_rad_builder::{Builder, BuilderError};

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cloudscape-rad-builder")]
#[command(version, about = "Assemble Cloudscape layouts and generate React code", long_about = None)]
struct Args {
    /// Settings file (default: ~/.cloudscape-rad-builder/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for saved designs, overriding the config
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Print generated code without colours
    #[arg(long)]
    no_highlight: bool,

    /// Replay commands from a file instead of reading stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), BuilderError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }
    if args.no_highlight {
        config.highlight = false;
    }

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json(&std::fs::read_to_string(path)?)?,
        None => Catalog::builtin(),
    };
    let history = match config.max_history {
        Some(max) => History::with_capacity_limit(max),
        None => History::new(),
    };

    tracing::info!("storing designs in {}", config.store_dir.display());
    let store = FileStore::new(&config.store_dir);
    let mut builder = Builder::with_parts(catalog, store, history, IdGenerator::new());
    builder.set_design_name(config.design_name.clone());
    if config.seed_navigation {
        builder.insert("side-navigation", Region::Navigation, None);
        builder.reset_history();
    }

    let highlighter = config.highlight.then(|| Highlighter::with_theme(&config.theme));

    let (input, interactive): (Box<dyn BufRead>, bool) = match &args.script {
        Some(path) => (Box::new(BufReader::new(File::open(path)?)), false),
        None => (Box::new(io::stdin().lock()), io::stdin().is_terminal()),
    };

    let mut stdout = io::stdout().lock();
    if interactive {
        writeln!(stdout, "{} - type `help` for commands", builder.design_name())?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match shell::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(stdout, "error: {e}")?;
                continue;
            }
        };
        match shell::execute(&mut builder, command, &mut stdout, highlighter.as_ref()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(BuilderError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => break,
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }

    Ok(())
}
