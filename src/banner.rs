//! Startup banner.

use std::path::Path;
use std::time::Duration;

use crate::consts::{AUTHOR, QUERY_PATH, REPO};

/// Settings shown in the startup banner.
pub struct BannerInfo<'a> {
    pub bind_addr: &'a str,
    pub workers: usize,
    pub temp_path: &'a Path,
    pub progress_binary: &'a Path,
    pub timeout: Option<Duration>,
}

/// Print the startup banner.
pub fn print_banner(info: &BannerInfo) {
    let timeout = match info.timeout {
        Some(limit) => format!("{}s", limit.as_secs()),
        None => "none".to_string(),
    };
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║        P R O G R E S S   P R O X Y    ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   repo      {}
   listen    http://{}{}
   workers   {}
   temp      {}
   binary    {}
   timeout   {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        REPO,
        info.bind_addr,
        QUERY_PATH,
        info.workers,
        info.temp_path.display(),
        info.progress_binary.display(),
        timeout,
    );
}
