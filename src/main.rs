mod app;
mod proxy;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::proxy::HttpTopologySource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,

    #[arg(long)]
    proxy_id: String,

    #[arg(long)]
    proxy_name: Option<String>,

    #[arg(long, default_value_t = 5)]
    poll_interval_secs: u64,

    #[arg(long, default_value_t = 4)]
    request_timeout_secs: u64,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = app::LaunchSettings {
        proxy_name: args.proxy_name.unwrap_or_else(|| args.proxy_id.clone()),
        proxy_id: args.proxy_id,
        base_url: args.base_url,
        poll_interval: Duration::from_secs(args.poll_interval_secs.max(1)),
    };
    let source = Arc::new(HttpTopologySource::new(
        &settings.base_url,
        Duration::from_secs(args.request_timeout_secs.max(1)),
    ));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "proxy-topology",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopologyApp::new(cc, settings, source)))),
    )
}
