//! StripeFS control CLI
//!
//! Thin collaborator over the StripeFS core: loads the configuration,
//! restores the catalog snapshot, runs a single operation and saves the
//! snapshot back. Transport framing, authentication and anything beyond
//! plumbing live outside the core by design.

use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};

use stripefs::api::file_ops::StripeFs;
use stripefs::catalog::{NamespaceCatalog, StripeLayout};
use stripefs::config::StripeFsConfig;
use stripefs::storage::{FsStripeStore, TargetSet};

/// StripeFS control tool
#[derive(Parser, Debug)]
#[command(name = "stripefsctl")]
#[command(about = "Manage a StripeFS namespace and its striped objects")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "stripefs.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file and create the target directories
    Init,

    /// List the children of a directory
    Ls {
        /// Directory path
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create a directory
    Mkdir {
        /// Parent directory path
        path: String,
        /// New directory name
        name: String,
    },

    /// Upload a local file, striping it across the targets
    Put {
        /// Destination directory path
        path: String,
        /// Local file to upload
        file: PathBuf,
        /// Name to store the file under (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Download a file, reconstructing it from its stripes
    Get {
        /// File path
        path: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the stripe layout of a path
    Layout {
        /// Path
        path: String,
    },

    /// Set the stripe layout of a path
    SetLayout {
        /// Path
        path: String,
        /// Number of targets to rotate stripes across
        #[arg(long)]
        stripe_count: u32,
        /// Stripe size in megabytes
        #[arg(long)]
        stripe_size_mb: u64,
    },

    /// Show the per-target stripe distribution of a file
    Viz {
        /// File path
        path: String,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Init = args.command {
        return init(&args.config);
    }

    let config = StripeFsConfig::from_file(&args.config)?;
    stripefs::logging::init_with_hostname(&config.node.log_level);

    let targets = Rc::new(TargetSet::with_names(
        config.node.data_dir.clone(),
        config.storage.targets.clone(),
    ));
    targets.ensure_directories()?;

    let store = Rc::new(FsStripeStore::new(targets.clone()));

    let catalog_path = config.catalog_path();
    let fs = if catalog_path.exists() {
        let catalog = NamespaceCatalog::load_snapshot(&catalog_path)?;
        StripeFs::with_catalog(targets, store, catalog)
    } else {
        StripeFs::new(targets, store, config.default_layout())
    };

    let mutated = match args.command {
        Command::Init => unreachable!(),
        Command::Ls { path } => {
            for child in fs.list_children(&path)? {
                let kind = if child.is_directory { "dir " } else { "file" };
                println!("{:>6}  {}  {:>10}  {}", child.id, kind, child.size, child.name);
            }
            false
        }
        Command::Mkdir { path, name } => {
            let id = fs.create_directory(&path, &name)?;
            println!("Created directory {} (id={})", name, id);
            true
        }
        Command::Put { path, file, name } => {
            let data = std::fs::read(&file)?;
            let name = match name {
                Some(n) => n,
                None => file
                    .file_name()
                    .and_then(|s| s.to_str())
                    .ok_or("Cannot derive a file name from the given path")?
                    .to_string(),
            };
            let id = fs.create_file(&path, &name, &data)?;
            println!("Uploaded {} ({} bytes, id={})", name, data.len(), id);
            true
        }
        Command::Get { path, output } => {
            let id = fs.resolve(&path)?;
            let data = fs.download_file(id)?;
            std::fs::write(&output, &data)?;
            println!("Wrote {} bytes to {}", data.len(), output.display());
            false
        }
        Command::Layout { path } => {
            let layout = fs.get_layout(&path)?;
            println!(
                "stripe_count = {}\nstripe_size  = {} bytes",
                layout.stripe_count, layout.stripe_size
            );
            false
        }
        Command::SetLayout {
            path,
            stripe_count,
            stripe_size_mb,
        } => {
            // MB -> bytes conversion happens at this edge; the core only
            // deals in bytes.
            let layout = StripeLayout::new(stripe_count, stripe_size_mb * 1024 * 1024);
            fs.set_layout(&path, layout)?;
            println!("Updated layout for {}", path);
            true
        }
        Command::Viz { path } => {
            for placement in fs.visualize(&path)? {
                let indices: Vec<String> =
                    placement.stripes.iter().map(|i| i.to_string()).collect();
                println!("{}: [{}]", placement.target, indices.join(", "));
            }
            false
        }
    };

    if mutated {
        fs.save_catalog(&catalog_path)?;
    }

    Ok(())
}

fn init(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = StripeFsConfig::default();
    config.to_file(config_path)?;

    std::fs::create_dir_all(&config.node.data_dir)?;
    let targets = TargetSet::with_names(
        config.node.data_dir.clone(),
        config.storage.targets.clone(),
    );
    targets.ensure_directories()?;

    println!("Wrote default configuration to {}", config_path);
    println!("Data directory: {}", config.node.data_dir.display());
    for target in targets.iter() {
        println!("Target ready: {} ({})", target.name, target.path.display());
    }

    Ok(())
}
