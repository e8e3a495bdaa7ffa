use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder;

use hula_sim::ProtocolConfig;
use hula_sim::report::ConvergenceReport;
use hula_sim::simulation::Simulation;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "hula-sim", about = "Run a HULA probe-flooding simulation over a test graph")]
struct Cli {
    /// Topology document with `nodes` and `edges`
    #[arg(long)]
    graph: PathBuf,

    /// Protocol configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds to let the routers run
    #[arg(long, default_value_t = 10)]
    duration: u64,

    #[arg(long)]
    update_window: Option<u64>,

    #[arg(long)]
    send_cycle: Option<u64>,

    #[arg(long)]
    queue_capacity: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl Cli {
    fn protocol_config(&self) -> Result<ProtocolConfig> {
        let mut config = match &self.config {
            Some(path) => ProtocolConfig::load(path)?,
            None => ProtocolConfig::default(),
        };

        if let Some(update_window) = self.update_window {
            config.update_window = update_window;
        }
        if let Some(send_cycle) = self.send_cycle {
            config.send_cycle = send_cycle;
        }
        if let Some(queue_capacity) = self.queue_capacity {
            config.queue_capacity = queue_capacity;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.protocol_config()?;
    info!("Protocol configuration: {:?}", config);

    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(run(cli, config))
}

async fn run(cli: Cli, config: ProtocolConfig) -> Result<()> {
    let mut simulation = Simulation::load(&cli.graph, &config)
        .with_context(|| format!("loading graph {}", cli.graph.display()))?;

    simulation.start()?;

    tokio::select! {
        _ = simulation.run_for(Duration::from_secs(cli.duration)) => {
            info!("Simulation ran for {}s", cli.duration);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping routers");
        }
    }

    let state = simulation.stop().await;
    let report = ConvergenceReport::evaluate(simulation.topology(), &state);

    match cli.format {
        OutputFormat::Table => print!("{}", report.render_table()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
