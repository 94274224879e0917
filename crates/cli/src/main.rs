#![forbid(unsafe_code)]

mod config;
mod dispatch;
mod logging;
mod protocol;
mod stdio;
mod timestamps;

use catalog_storage::SqliteStore;
use config::{CliAction, parse_args};
use dispatch::CatalogServer;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> &'static str {
    "catalogd - category hierarchy service (line-delimited JSON over stdio)\n\n\
USAGE:\n\
  catalogd [--storage-dir DIR] [--log FILTER] [--in-memory]\n\
\n\
FLAGS:\n\
  --storage-dir DIR  Store directory (env CATALOG_STORAGE_DIR, default .catalog)\n\
  --log FILTER       tracing filter directive (env CATALOG_LOG, default info)\n\
  --in-memory        Use a throwaway in-memory database (env CATALOG_IN_MEMORY)\n\
  -h, --help         Print this help and exit\n\
  -V, --version      Print version and exit\n\
\n\
METHODS:\n\
  category.create  category.get  category.list  category.update\n\
  category.move  category.delete  category.descendants  category.audit\n"
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let action = parse_args(std::env::args().skip(1), |key| std::env::var(key).ok())?;
    let config = match action {
        CliAction::Help => {
            print!("{}", usage());
            return Ok(());
        }
        CliAction::Version => {
            println!("catalogd {SERVER_VERSION}");
            return Ok(());
        }
        CliAction::Run(config) => config,
    };

    logging::init_logging(&config.log_filter)?;

    let store = if config.in_memory {
        SqliteStore::open_in_memory()?
    } else {
        SqliteStore::open(&config.storage_dir)?
    };
    tracing::info!(
        version = SERVER_VERSION,
        storage_dir = %config.storage_dir.display(),
        in_memory = config.in_memory,
        "catalogd started"
    );

    let mut server = CatalogServer::new(store);
    stdio::run_stdio(&mut server)
}
