mod simulation;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;

use simulation::{SimConfig, SimDriver, SimWorld};

#[derive(Parser)]
#[command(name = "corridor_sim")]
#[command(about = "Multi-lane corridor traffic simulation, headless")]
struct Cli {
    /// How many wall-clock seconds to run
    #[arg(long, default_value = "30")]
    seconds: u64,

    /// Tick period in milliseconds
    #[arg(long, default_value = "80")]
    tick_ms: u64,

    /// Seed for reproducible exit-intent draws
    #[arg(long)]
    seed: Option<u64>,

    /// Percentage of vehicles that take the ring exit
    #[arg(long, default_value = "35")]
    exit_share: u32,

    /// Disable the merge ring (ring-exit vehicles consume directly)
    #[arg(long)]
    no_ring: bool,

    /// Disable the traffic signals
    #[arg(long)]
    no_signals: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = Arc::new(SimConfig::new());
    config.set_tick_ms(cli.tick_ms);
    config.set_exit_share_pct(cli.exit_share);
    config.set_ring_enabled(!cli.no_ring);
    config.set_signals_enabled(!cli.no_signals);

    let world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(Arc::clone(&config), seed),
        None => SimWorld::new(Arc::clone(&config)),
    };

    info!(
        "running for {}s at {}ms per tick (ring {}, signals {})",
        cli.seconds,
        cli.tick_ms,
        if cli.no_ring { "off" } else { "on" },
        if cli.no_signals { "off" } else { "on" },
    );

    let driver = SimDriver::start(world);

    for second in 1..=cli.seconds {
        std::thread::sleep(Duration::from_secs(1));
        let snapshot = driver.snapshot();
        info!(
            "t={:>3}s on_road={:<3} queues={}/{} entered={} exited={} | {}",
            second,
            snapshot.vehicles_on_road,
            snapshot.queue_main.length,
            snapshot.queue_side.length,
            snapshot.entered_main + snapshot.entered_side,
            snapshot.exited_ring + snapshot.exited_terminal,
            snapshot.diagnosis.message(),
        );
    }

    let final_snapshot = driver.snapshot();
    driver.stop()?;

    println!();
    final_snapshot.print_summary();
    println!();
    final_snapshot.draw_road();

    Ok(())
}
