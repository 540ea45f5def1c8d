//! Command-line entry point for the filehttp server.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;

use filehttp::{ContentEncoding, HttpServer, ServerConfig, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "filehttp")]
#[command(about = "Minimal HTTP/1.1 echo and file server")]
#[command(version)]
struct Cli {
    #[arg(short = 'd', long = "directory", default_value = "./")]
    #[arg(help = "Directory served and written by /files")]
    directory: PathBuf,

    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    #[arg(help = "Port to listen on")]
    port: u16,

    #[arg(long = "max-connections", default_value_t = 1024)]
    #[arg(help = "Maximum number of concurrent connections")]
    max_connections: usize,

    #[arg(long = "read-timeout-secs", default_value_t = 10)]
    #[arg(help = "Seconds allowed for a client to send its request")]
    read_timeout_secs: u64,

    #[arg(long = "max-message-size", default_value_t = 16 * 1024 * 1024)]
    #[arg(help = "Largest request accepted, in bytes")]
    max_message_size: usize,

    #[arg(long = "max-head-size", default_value_t = 64 * 1024)]
    #[arg(help = "Largest request line plus header block accepted, in bytes")]
    max_head_size: usize,

    #[arg(long = "encodings", value_delimiter = ',', default_value = "gzip")]
    #[arg(help = "Response encodings to offer (gzip, deflate)")]
    encodings: Vec<ContentEncoding>,

    #[arg(long = "log-level", default_value = "info")]
    #[arg(help = "Log level (error, warn, info, debug, trace); RUST_LOG takes precedence")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, self.port)),
            max_connections: self.max_connections,
            max_message_size: self.max_message_size,
            max_head_size: self.max_head_size,
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            directory: self.directory,
            encodings: self.encodings,
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str())).init();

    let config = cli.into_config();
    info!("Using directory: {dir}", dir = config.directory.display());

    let server = HttpServer::new(config);
    server.start().await?;

    Ok(())
}
