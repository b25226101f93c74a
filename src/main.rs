use anyhow::Result;
use clap::Parser;

use prompt_vault::{cli, AppContext, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::Cli::parse();
    let config = Config::from_env()
        .with_api_url(cli.api_url)
        .with_data_dir(cli.data_dir);

    let ctx = AppContext::open(config)?;
    ctx.startup().await;
    let result = cli::handle_command(cli.command, &ctx).await;
    ctx.shutdown();

    result
}
