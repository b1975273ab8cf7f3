use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use progress_proxy::banner::{BannerInfo, print_banner};
use progress_proxy::config::{ProxyConfig, ServerConfig};
use progress_proxy::consts::{DEFAULT_BIND_IP, DEFAULT_BIND_PORT, DEFAULT_PROGRESS_BINARY};
use progress_proxy::logging::init_logging;
use progress_proxy::pipeline::Pipeline;
use progress_proxy::server::serve;

#[derive(Parser)]
#[command(
    name = "progress-proxy",
    version,
    about = "Run 4GL queries over HTTP through the Progress interpreter."
)]
struct Cli {
    /// Worker threads serving requests
    #[arg(long, default_value_t = 1)]
    cpus: usize,

    /// Directory for temporary query files
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    temp_path: PathBuf,

    /// Interpreter binary (e.g. /usr/dlc/bin/_progres)
    #[arg(long, default_value = DEFAULT_PROGRESS_BINARY)]
    progress_binary: PathBuf,

    /// Network address to listen on
    #[arg(long, default_value = DEFAULT_BIND_IP)]
    ip: String,

    /// Network port to listen on
    #[arg(long, default_value_t = DEFAULT_BIND_PORT)]
    port: u16,

    /// Kill the interpreter after this many seconds (default: wait forever)
    #[arg(long)]
    timeout: Option<u64>,

    /// Log filter, e.g. `info` or `progress_proxy=debug` (RUST_LOG wins)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let proxy = ProxyConfig {
        temp_path: cli.temp_path,
        progress_binary: cli.progress_binary,
        timeout: cli.timeout.map(Duration::from_secs),
    };
    let server = ServerConfig {
        ip: cli.ip,
        port: cli.port,
        workers: cli.cpus,
    };

    print_banner(&BannerInfo {
        bind_addr: &server.bind_addr(),
        workers: server.workers,
        temp_path: &proxy.temp_path,
        progress_binary: &proxy.progress_binary,
        timeout: proxy.timeout,
    });

    serve(Pipeline::new(proxy), server).await
}
