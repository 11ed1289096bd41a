// src/io/demand.rs

use crate::simulation::config::GameConfig;
use crate::simulation::error::{ConfigError, DemandSourceError, GameError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub const DEMAND_COLUMN: &str = "demand";
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_LOW: u32 = 30;
pub const DEFAULT_HIGH: u32 = 100;

/// Where a playthrough's daily demand comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DemandSource {
    /// Values supplied from outside (a file or table), fitted to the horizon.
    External { values: Vec<i64> },
    /// Uniform draws from `low..=high`, reproducible from `seed`.
    Generated { seed: u64, low: u32, high: u32 },
}

impl Default for DemandSource {
    fn default() -> Self {
        DemandSource::Generated {
            seed: DEFAULT_SEED,
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }
}

impl DemandSource {
    /// Same bounds, new seed. External sources cannot be reseeded.
    pub fn with_seed(&self, seed: u64) -> Option<DemandSource> {
        match self {
            DemandSource::Generated { low, high, .. } => Some(DemandSource::Generated {
                seed,
                low: *low,
                high: *high,
            }),
            DemandSource::External { .. } => None,
        }
    }

    /// Short label that is safe to log; never includes demand values.
    pub fn kind(&self) -> &'static str {
        match self {
            DemandSource::External { .. } => "external",
            DemandSource::Generated { .. } => "generated",
        }
    }
}

/// Daily demand for a whole playthrough. Its length equals the horizon and
/// never changes once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandSequence(Vec<u32>);

impl DemandSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Demand of a 1-based day.
    pub fn for_day(&self, day: u32) -> Option<u32> {
        let index = (day as usize).checked_sub(1)?;
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Builds the demand sequence for `config.horizon_days` days.
pub fn resolve(config: &GameConfig, source: &DemandSource) -> Result<DemandSequence, GameError> {
    config.validate()?;
    let days = config.horizon_days as usize;

    let values = match source {
        DemandSource::External { values } => fit_to_horizon(&checked_values(values)?, days)?,
        DemandSource::Generated { seed, low, high } => generate_uniform_demand(days, *seed, *low, *high)?,
    };

    // values stay out of the log until each day reveals its own demand
    debug!(days, source = source.kind(), "demand resolved");
    Ok(DemandSequence(values))
}

fn checked_values(values: &[i64]) -> Result<Vec<u32>, DemandSourceError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value < 0 {
                return Err(DemandSourceError::Negative { index, value });
            }
            u32::try_from(value).map_err(|_| DemandSourceError::OutOfRange { index, value })
        })
        .collect()
}

/// Truncates to `days`, or pads by repeating the last observed value.
pub fn fit_to_horizon(values: &[u32], days: usize) -> Result<Vec<u32>, DemandSourceError> {
    let last = *values.last().ok_or(DemandSourceError::Empty)?;

    let mut schedule: Vec<u32> = values.iter().copied().take(days).collect();
    schedule.resize(days, last);
    Ok(schedule)
}

/// Independent uniform draws from `low..=high` (inclusive on both ends).
///
/// The generator is seeded explicitly, so the same arguments always give the
/// same schedule.
pub fn generate_uniform_demand(
    days: usize,
    seed: u64,
    low: u32,
    high: u32,
) -> Result<Vec<u32>, ConfigError> {
    if low > high {
        return Err(ConfigError::InvalidDemandBounds { low, high });
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let uniform = Uniform::new_inclusive(low, high);

    Ok((0..days).map(|_| uniform.sample(&mut rng)).collect())
}

/// Reads the `demand` column of a CSV table.
///
/// Cells must hold non-negative whole numbers; integral decimals such as
/// `52.0` are accepted. Rows are reported 1-based, header excluded.
pub fn load_demand_csv<R: Read>(reader: R) -> Result<Vec<i64>, DemandSourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case(DEMAND_COLUMN))
        .ok_or_else(|| DemandSourceError::MissingColumn(DEMAND_COLUMN.to_string()))?;

    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = record.get(column).unwrap_or("");
        let value = parse_demand_cell(cell).ok_or_else(|| DemandSourceError::InvalidValue {
            row,
            value: cell.to_string(),
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(DemandSourceError::Empty);
    }
    Ok(values)
}

pub fn load_demand_csv_file(path: impl AsRef<Path>) -> Result<Vec<i64>, DemandSourceError> {
    let file = File::open(path)?;
    load_demand_csv(file)
}

fn parse_demand_cell(cell: &str) -> Option<i64> {
    if let Ok(v) = cell.parse::<i64>() {
        return (v >= 0).then_some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    // i64::MAX is not exactly representable; stay well inside it
    let integral = v.is_finite() && v.fract() == 0.0 && v >= 0.0 && v < 9.0e18;
    integral.then_some(v as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(days: u32) -> GameConfig {
        GameConfig::default().with_horizon(days)
    }

    #[test]
    fn generated_demand_is_reproducible() {
        let source = DemandSource::Generated { seed: 42, low: 30, high: 100 };
        let first = resolve(&config(30), &source).unwrap();
        let second = resolve(&config(30), &source).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 30);
        assert!(first.as_slice().iter().all(|d| (30..=100).contains(d)));
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_uniform_demand(30, 1, 0, 1000).unwrap();
        let b = generate_uniform_demand(30, 2, 0, 1000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn degenerate_bounds_give_constant_demand() {
        assert_eq!(generate_uniform_demand(4, 9, 7, 7).unwrap(), vec![7; 4]);
    }

    #[test]
    fn inverted_bounds_are_a_config_error() {
        let source = DemandSource::Generated { seed: 1, low: 10, high: 5 };
        let err = resolve(&config(5), &source).unwrap_err();
        assert!(matches!(
            err,
            GameError::Config(ConfigError::InvalidDemandBounds { low: 10, high: 5 })
        ));
    }

    #[test]
    fn short_external_demand_repeats_last_value() {
        let values: Vec<i64> = (1..=10).collect();
        let seq = resolve(&config(30), &DemandSource::External { values }).unwrap();
        assert_eq!(seq.len(), 30);
        assert_eq!(&seq.as_slice()[..10], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert!(seq.as_slice()[10..].iter().all(|&d| d == 10));
    }

    #[test]
    fn long_external_demand_is_truncated() {
        let values: Vec<i64> = (0..40).collect();
        let seq = resolve(&config(30), &DemandSource::External { values }).unwrap();
        assert_eq!(seq.as_slice(), (0..30).collect::<Vec<u32>>().as_slice());
    }

    #[test]
    fn empty_external_demand_is_rejected() {
        let err = resolve(&config(5), &DemandSource::External { values: vec![] }).unwrap_err();
        assert!(matches!(err, GameError::Demand(DemandSourceError::Empty)));
    }

    #[test]
    fn negative_external_demand_is_rejected() {
        let source = DemandSource::External { values: vec![4, -2, 5] };
        let err = resolve(&config(3), &source).unwrap_err();
        assert!(matches!(
            err,
            GameError::Demand(DemandSourceError::Negative { index: 1, value: -2 })
        ));
    }

    #[test]
    fn oversized_external_demand_is_rejected() {
        let too_big = i64::from(u32::MAX) + 1;
        let source = DemandSource::External { values: vec![5, too_big] };
        let err = resolve(&config(2), &source).unwrap_err();
        assert!(matches!(
            err,
            GameError::Demand(DemandSourceError::OutOfRange { index: 1, value }) if value == too_big
        ));
    }

    #[test]
    fn missing_demand_file_is_an_io_error() {
        let path = std::env::temp_dir().join("inventory-game-no-such-demand.csv");
        let err = load_demand_csv_file(&path).unwrap_err();
        assert!(matches!(err, DemandSourceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn demand_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("inventory-game-demand-{}.csv", std::process::id()));
        std::fs::write(&path, "day,demand\n1,12\n2,7\n").unwrap();
        let values = load_demand_csv_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(values.unwrap(), vec![12, 7]);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn resolving_does_not_log_upcoming_demand() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let source = DemandSource::External { values: vec![4242, 7373] };
            resolve(&config(2), &source).unwrap();
        });

        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("demand resolved"));
        assert!(logged.contains("external"));
        assert!(!logged.contains("4242"));
        assert!(!logged.contains("7373"));
    }

    #[test]
    fn day_lookup_is_one_based() {
        let seq = resolve(&config(3), &DemandSource::External { values: vec![5, 6, 7] }).unwrap();
        assert_eq!(seq.for_day(0), None);
        assert_eq!(seq.for_day(1), Some(5));
        assert_eq!(seq.for_day(3), Some(7));
        assert_eq!(seq.for_day(4), None);
    }

    #[test]
    fn reseeding_keeps_bounds() {
        let source = DemandSource::default();
        assert_eq!(
            source.with_seed(7),
            Some(DemandSource::Generated { seed: 7, low: 30, high: 100 })
        );
        assert_eq!(DemandSource::External { values: vec![1] }.with_seed(7), None);
    }

    #[test]
    fn source_deserializes_from_tagged_json() {
        let src: DemandSource =
            serde_json::from_str(r#"{"kind": "generated", "seed": 3, "low": 1, "high": 2}"#).unwrap();
        assert_eq!(src, DemandSource::Generated { seed: 3, low: 1, high: 2 });
        let src: DemandSource =
            serde_json::from_str(r#"{"kind": "external", "values": [1, 2]}"#).unwrap();
        assert_eq!(src, DemandSource::External { values: vec![1, 2] });
    }

    #[test]
    fn csv_demand_column_is_loaded() {
        let csv = "day,demand\n1,52\n2, 48 \n3,60.0\n";
        assert_eq!(load_demand_csv(csv.as_bytes()).unwrap(), vec![52, 48, 60]);
    }

    #[test]
    fn csv_without_demand_column_is_rejected() {
        let err = load_demand_csv("day,qty\n1,5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DemandSourceError::MissingColumn(c) if c == "demand"));
    }

    #[test]
    fn csv_bad_cells_are_reported_by_row() {
        for bad in ["abc", "-4", "2.5", ""] {
            let csv = format!("day,demand\n1,10\n2,{}\n", bad);
            let err = load_demand_csv(csv.as_bytes()).unwrap_err();
            assert!(
                matches!(&err, DemandSourceError::InvalidValue { row: 2, value } if value == bad),
                "unexpected error for {:?}: {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn csv_with_only_header_is_empty() {
        let err = load_demand_csv("demand\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DemandSourceError::Empty));
    }

    proptest! {
        #[test]
        fn fitted_length_always_matches_horizon(
            values in proptest::collection::vec(0u32..500, 1..60),
            days in 1usize..60,
        ) {
            let fitted = fit_to_horizon(&values, days).unwrap();
            prop_assert_eq!(fitted.len(), days);
            let shared = values.len().min(days);
            prop_assert_eq!(&fitted[..shared], &values[..shared]);
            prop_assert!(fitted[shared..].iter().all(|v| v == values.last().unwrap()));
        }
    }
}
