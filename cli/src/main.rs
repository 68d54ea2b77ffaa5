mod commands;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, discover, watch};
use nodelink_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = Config {
        no_banner: commands.no_banner || commands.json,
        quiet: commands.quiet,
        json: commands.json,
    };
    let scan_cfg = commands.scan.to_config();

    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Discover { base } => {
            print::header("getting ready for discovery", cfg.quiet);
            discover::discover(base, scan_cfg, &cfg).await
        }
        Commands::Watch { base, interval } => {
            print::header("watching the network", cfg.quiet);
            watch::watch(base, Duration::from_secs(interval), scan_cfg, &cfg).await
        }
    }
}
