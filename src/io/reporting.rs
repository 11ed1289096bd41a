// src/io/reporting.rs

use crate::model::ledger::DayRecord;
use crate::simulation::engine::GameSummary;
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tracing::info;

/// Column order of the results export.
pub const RESULT_COLUMNS: [&str; 10] = [
    "day",
    "order",
    "demand",
    "sales",
    "shortage",
    "ending_inventory",
    "purchase_cost",
    "holding_cost",
    "shortage_cost",
    "total_day_cost",
];

/// A ledger row as it appears in the export. Costs are pre-formatted to two
/// decimals; the ledger itself keeps full precision.
#[derive(Debug, Serialize)]
struct ResultRow {
    day: u32,
    order: u32,
    demand: u32,
    sales: u32,
    shortage: u32,
    ending_inventory: u32,
    purchase_cost: String,
    holding_cost: String,
    shortage_cost: String,
    total_day_cost: String,
}

impl From<&DayRecord> for ResultRow {
    fn from(r: &DayRecord) -> Self {
        Self {
            day: r.day,
            order: r.order_qty,
            demand: r.demand,
            sales: r.units_sold,
            shortage: r.shortage_units,
            ending_inventory: r.ending_inventory,
            purchase_cost: money(r.purchase_cost),
            holding_cost: money(r.holding_cost),
            shortage_cost: money(r.shortage_cost),
            total_day_cost: money(r.total_day_cost),
        }
    }
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

/// Writes the results table: a header row, then one row per played day.
///
/// The header is written even when no day has been played yet.
pub fn write_results<W: io::Write>(writer: W, records: &[DayRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(RESULT_COLUMNS)?;
    for record in records {
        wtr.serialize(ResultRow::from(record))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the results table to `file_path`, replacing any existing file.
pub fn write_results_file(
    file_path: impl AsRef<Path>,
    records: &[DayRecord],
) -> Result<(), csv::Error> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_results(file, records)?;

    info!(rows = records.len(), path = %path.display(), "results exported");
    Ok(())
}

/// One-line feedback shown right after a day is played.
pub fn describe_day(r: &DayRecord) -> String {
    format!(
        "Day {}: demand {} | sold {} | shortage {} | end inventory {}\n  \
         costs: purchase {:.2} + holding {:.2} + shortage {:.2} = {:.2}",
        r.day,
        r.demand,
        r.units_sold,
        r.shortage_units,
        r.ending_inventory,
        r.purchase_cost,
        r.holding_cost,
        r.shortage_cost,
        r.total_day_cost
    )
}

/// Plain-text final report: daily table, running cost and total.
pub fn render_summary(summary: &GameSummary, player: Option<&str>) -> String {
    let mut out = String::new();

    let heading = match (summary.complete, player) {
        (true, Some(name)) => format!("Game over, {}!", name),
        (true, None) => "Game over!".to_string(),
        (false, _) => format!(
            "Game in progress: {} of {} days played",
            summary.days_played, summary.horizon_days
        ),
    };
    let _ = writeln!(out, "{}", heading);

    if summary.records.is_empty() {
        let _ = writeln!(out, "No days played yet.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4} {:>7} {:>7} {:>6} {:>9} {:>8} {:>12} {:>12}",
        "day", "order", "demand", "sales", "shortage", "end inv", "day cost", "cumulative"
    );
    for (r, cumulative) in summary.records.iter().zip(&summary.cumulative_costs) {
        let _ = writeln!(
            out,
            "{:>4} {:>7} {:>7} {:>6} {:>9} {:>8} {:>12.2} {:>12.2}",
            r.day,
            r.order_qty,
            r.demand,
            r.units_sold,
            r.shortage_units,
            r.ending_inventory,
            r.total_day_cost,
            cumulative
        );
    }
    let _ = writeln!(out, "Total cost for {} days: {:.2}", summary.days_played, summary.total_cost);
    out
}
