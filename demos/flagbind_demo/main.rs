//! # flagbind demo application
//!
//! A sample CLI tool that shows how to wire [flagbind](https://docs.rs/flagbind)
//! into an application: register flags from a template struct, fill them from
//! an optional TOML file and the command line, then load them back.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagbind_demo -- --port 9000 --peers 'a,"b, c"'
//! cargo run --example flagbind_demo -- --verbose --timeout=1m30s
//! cargo run --example flagbind_demo -- usage
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                              |
//! |------------------------|-----------------------------------------------------------------|
//! | Template defaults      | `cargo run --example flagbind_demo`                             |
//! | Flag file              | Create `flagbind-demo.toml` in cwd with `port = 7000`           |
//! | Command-line override  | `cargo run --example flagbind_demo -- --port 9000`              |
//! | Presence flag          | `cargo run --example flagbind_demo -- --verbose`                |
//! | List flag              | `cargo run --example flagbind_demo -- --peers=a,b`              |
//! | Optional destination   | `cargo run --example flagbind_demo -- --color red`              |
//! | Flag listing           | `cargo run --example flagbind_demo -- usage`                    |
//! | clap help              | `cargo run --example flagbind_demo -- --help`                   |
//! | Debug logging          | `RUST_LOG=flagbind=debug cargo run --example flagbind_demo`     |

mod config;

use std::path::Path;
use std::process;

use flagbind::{FlagSet, FlagbindError, Options, load_from_flags, register_flags};

use config::DemoConfig;

const FLAG_FILE: &str = "flagbind-demo.toml";

/// Register, fill and load the demo flags. Returns the loaded config and the
/// positional arguments left over after parsing.
fn run(flags: &mut FlagSet, options: &Options) -> Result<(DemoConfig, Vec<String>), FlagbindError> {
    register_flags(flags, &DemoConfig::default(), options)?;

    let file = Path::new(FLAG_FILE);
    if file.is_file() {
        flags.apply_file(file)?;
    }
    let positionals = flags.parse(std::env::args().skip(1))?;

    let mut config = DemoConfig::default();
    load_from_flags(flags, &mut config, options)?;
    Ok((config, positionals))
}

fn echo(config: &DemoConfig) {
    if config.verbose {
        println!("[verbose] Resolved configuration for {:?}", config.name);
        println!();
    }
    println!("name     {}", config.name);
    println!("host     {}", config.server.host);
    println!("port     {}", config.server.port);
    println!("timeout  {:?}", config.server.timeout);
    println!("peers    {:?}", config.server.peers);
    if let Some(display) = &config.display {
        println!("color    {:?}", display.color);
        println!("width    {:?}", display.width);
    }
}

fn main() {
    env_logger::init();

    let options = Options::new();
    let mut flags = FlagSet::new("flagbind-demo");
    let (config, positionals) = run(&mut flags, &options).unwrap_or_else(|e| match e {
        // clap prints `--help` to stdout and exits 0; syntax errors exit 2.
        FlagbindError::Cli(err) => err.exit(),
        other => {
            eprintln!("Failed to load flags:\n{other}");
            process::exit(2);
        }
    });

    match positionals.first().map(String::as_str) {
        Some("usage") => print!("Usage of {}:\n{}", flags.name(), flags.defaults()),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            process::exit(1);
        }
        None => echo(&config),
    }
}
