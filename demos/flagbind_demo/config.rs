//! Configuration structs for the flagbind demo application.
//!
//! [`DemoConfig`] is the root. Its untagged [`ServerConfig`] and
//! [`DisplayConfig`] fields are descended into, so their flags are reachable
//! by their own tags alone (`--port`, not `--server-port`).
//!
//! | Flag               | Field                       |
//! |--------------------|-----------------------------|
//! | `--name`           | `name`                      |
//! | `--verbose`        | `verbose`                   |
//! | `--host`           | `server.host`               |
//! | `--port`           | `server.port`               |
//! | `--timeout`        | `server.timeout`            |
//! | `--peers`          | `server.peers`              |
//! | `--color`          | `display.color`             |
//! | `--width`          | `display.width`             |

use std::time::Duration;

use flagbind::Flags;

/// Root configuration for the demo application.
#[derive(Flags, Debug)]
pub struct DemoConfig {
    /// Application name shown in the echo banner.
    #[tag(flag = "name")]
    pub name: String,

    #[tag(flag = "verbose")]
    pub verbose: bool,

    pub server: ServerConfig,

    /// Absent until loading fills it in.
    pub display: Option<DisplayConfig>,
}

#[derive(Flags, Debug)]
pub struct ServerConfig {
    #[tag(flag = "host")]
    pub host: String,

    #[tag(flag = "port")]
    pub port: u16,

    /// How long to wait for a peer before giving up.
    #[tag(flag = "timeout")]
    pub timeout: Duration,

    #[tag(flag = "peers")]
    pub peers: Vec<String>,
}

#[derive(Flags, Debug, Default)]
pub struct DisplayConfig {
    #[tag(flag = "color")]
    pub color: Option<String>,

    #[tag(flag = "width")]
    pub width: Option<u32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "flagbind-demo".to_string(),
            verbose: false,
            server: ServerConfig::default(),
            display: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            timeout: Duration::from_secs(30),
            peers: Vec::new(),
        }
    }
}
