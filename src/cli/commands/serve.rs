use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::config::core::cli_overrides;
use crate::server;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind [default: server.host]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on [default: server.port]
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let overrides = cli_overrides(&[
        ("server", "host", args.host.map(|host| json!(host))),
        ("server", "port", args.port.map(|port| json!(port))),
    ]);
    let config = ConfigLoader::load_with(custom_config, overrides)?.settings()?;

    let addr = config.server.bind_addr();
    output.step(&format!("Starting evalview on http://{addr}"));
    output.key_value("Upload page:", &format!("http://{addr}/"), true);
    output.key_value("Health check:", &format!("http://{addr}/api/health"), false);
    output.info("Press Ctrl+C to stop");

    server::serve(&config).await
}
