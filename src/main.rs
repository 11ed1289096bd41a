use anyhow::{bail, Context, Result};
use inventory_game::io::demand::{self, DemandSource};
use inventory_game::io::reporting;
use inventory_game::player::implementations::{ConsolePlayer, ScriptedOrders};
use inventory_game::player::session::{self, PlayOutcome, SessionEvent};
use inventory_game::simulation::config::GameConfig;
use inventory_game::simulation::engine::{GameSummary, InventoryGame};
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: inventory-game [--config FILE.json] [--days N] [--unit-cost X] \
[--holding-rate R] [--shortage-cost X] [--demand-csv FILE | --seed N --low N --high N] \
[--orders 60,0,50] [--out results.csv] [--player NAME]";

#[derive(Debug, Default)]
struct Options {
    config_file: Option<String>,
    days: Option<u32>,
    unit_cost: Option<f64>,
    holding_rate: Option<f64>,
    shortage_cost: Option<f64>,
    demand_csv: Option<String>,
    seed: Option<u64>,
    low: Option<u32>,
    high: Option<u32>,
    orders: Option<String>,
    out: Option<String>,
    player: Option<String>,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options::default();
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--config" => opts.config_file = Some(value()?),
            "--days" => opts.days = Some(value()?.parse().context("--days")?),
            "--unit-cost" => opts.unit_cost = Some(value()?.parse().context("--unit-cost")?),
            "--holding-rate" => opts.holding_rate = Some(value()?.parse().context("--holding-rate")?),
            "--shortage-cost" => opts.shortage_cost = Some(value()?.parse().context("--shortage-cost")?),
            "--demand-csv" => opts.demand_csv = Some(value()?),
            "--seed" => opts.seed = Some(value()?.parse().context("--seed")?),
            "--low" => opts.low = Some(value()?.parse().context("--low")?),
            "--high" => opts.high = Some(value()?.parse().context("--high")?),
            "--orders" => opts.orders = Some(value()?),
            "--out" => opts.out = Some(value()?),
            "--player" => opts.player = Some(value()?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unknown argument `{}`\n{}", other, USAGE),
        }
    }
    Ok(opts)
}

/// Flags override the config file, which overrides the defaults. With a
/// demand table and no explicit horizon, the game lasts as long as the table.
fn build_config(opts: &Options, table_len: Option<usize>) -> Result<GameConfig> {
    let mut config = match &opts.config_file {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let (None, None, Some(len)) = (opts.days, &opts.config_file, table_len) {
        config.horizon_days = u32::try_from(len).context("demand table is too long")?;
    }
    if let Some(days) = opts.days {
        config.horizon_days = days;
    }
    if let Some(cost) = opts.unit_cost {
        config.unit_cost = cost;
    }
    if let Some(rate) = opts.holding_rate {
        config.holding_rate_annual = rate;
    }
    if let Some(cost) = opts.shortage_cost {
        config.shortage_cost_per_unit = cost;
    }
    config.validate()?;
    Ok(config)
}

fn build_source(opts: &Options) -> Result<DemandSource> {
    if let Some(path) = &opts.demand_csv {
        if opts.seed.is_some() || opts.low.is_some() || opts.high.is_some() {
            bail!("--demand-csv cannot be combined with --seed/--low/--high");
        }
        let values = demand::load_demand_csv_file(path)
            .with_context(|| format!("reading demand from {}", path))?;
        return Ok(DemandSource::External { values });
    }
    Ok(DemandSource::Generated {
        seed: opts.seed.unwrap_or(demand::DEFAULT_SEED),
        low: opts.low.unwrap_or(demand::DEFAULT_LOW),
        high: opts.high.unwrap_or(demand::DEFAULT_HIGH),
    })
}

/// Prints the summary and writes the results table.
fn report(summary: &GameSummary, player: Option<&str>, output_file: &str) {
    println!();
    print!("{}", reporting::render_summary(summary, player));
    match reporting::write_results_file(output_file, &summary.records) {
        Ok(()) => println!("Results written to ./{}", output_file),
        Err(e) => eprintln!("Error writing CSV: {}", e),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let opts = parse_args()?;
    info!(?opts, "starting");

    println!("=== Single-Item Inventory Game ===");

    // 1. SETUP CONFIGURATION AND DEMAND
    let source = build_source(&opts)?;
    let table_len = match &source {
        DemandSource::External { values } => Some(values.len()),
        DemandSource::Generated { .. } => None,
    };
    let config = build_config(&opts, table_len)?;
    let mut game = InventoryGame::new(config, source)?;

    let cfg = game.config();
    println!(
        "{} days | unit cost {:.2} | holding {:.0}%/year ({:.4} per unit per day) | shortage {:.2} per unit",
        cfg.horizon_days,
        cfg.unit_cost,
        cfg.holding_rate_annual * 100.0,
        cfg.holding_cost_per_unit_per_day(),
        cfg.shortage_cost_per_unit
    );
    if let Some(name) = &opts.player {
        println!("Welcome, {}! Let's begin day 1.", name);
    }

    // 2. PLAY, REPORTING EACH FINISHED GAME
    let output_file = opts.out.as_deref().unwrap_or("results.csv");
    let player = opts.player.as_deref();
    let on_event = |event: &SessionEvent| match event {
        SessionEvent::Played(record) => println!("{}", reporting::describe_day(record)),
        SessionEvent::Completed(summary) => {
            report(summary, player, output_file);
            println!("Play again with `reset` or `new <seed>`, or `quit`.");
        }
        SessionEvent::Reset => println!("Game restarted from day 1."),
        SessionEvent::Regenerated { seed } => {
            println!("New demand drawn from seed {}; game restarted from day 1.", seed)
        }
        SessionEvent::Rejected(reason) => println!("Not accepted: {}", reason),
    };
    let outcome = match &opts.orders {
        Some(list) => {
            let mut orders = ScriptedOrders::parse(list).context("--orders")?;
            session::play(&mut game, &mut orders, on_event)?
        }
        None => {
            println!("Enter an order quantity each day (`reset`, `new <seed>`, `quit`).");
            let stdin = io::stdin();
            let mut console = ConsolePlayer::new(stdin.lock(), io::stdout());
            session::play(&mut game, &mut console, on_event)?
        }
    };

    // 3. REPORT A PARTIAL GAME
    if let PlayOutcome::Stopped { days_played } = outcome {
        info!(days_played, "stopped before the end of the horizon");
        if days_played > 0 {
            report(&game.summary(), player, output_file);
        }
    }

    Ok(())
}
