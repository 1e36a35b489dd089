use anyhow::Result;
use clap::Parser;
use clerical_rpa::cli::Cli;
use clerical_rpa::utils::logging;
use clerical_rpa::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    let task = cli.apply(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config, task)?.run().await?;

    Ok(())
}
