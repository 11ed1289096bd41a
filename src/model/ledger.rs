// src/model/ledger.rs

use crate::model::inventory::DaySettlement;
use serde::Serialize;

/// One completed day. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub day: u32,
    pub starting_inventory: u32,
    pub order_qty: u32,
    pub demand: u32,
    pub units_sold: u32,
    pub shortage_units: u32,
    pub ending_inventory: u32,
    pub purchase_cost: f64,
    pub holding_cost: f64,
    pub shortage_cost: f64,
    pub total_day_cost: f64,
}

impl DayRecord {
    pub fn new(
        day: u32,
        starting_inventory: u32,
        order_qty: u32,
        demand: u32,
        settlement: &DaySettlement,
    ) -> Self {
        Self {
            day,
            starting_inventory,
            order_qty,
            demand,
            units_sold: settlement.units_sold,
            shortage_units: settlement.shortage_units,
            ending_inventory: settlement.ending_inventory,
            purchase_cost: settlement.purchase_cost,
            holding_cost: settlement.holding_cost,
            shortage_cost: settlement.shortage_cost,
            total_day_cost: settlement.total_cost(),
        }
    }
}

/// Append-only list of completed days; entry `i` is day `i + 1`.
///
/// Aggregates are always recomputed from the records so they cannot drift
/// from what was actually played.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<DayRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: DayRecord) {
        debug_assert_eq!(record.day as usize, self.records.len() + 1);
        self.records.push(record);
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&DayRecord> {
        self.records.last()
    }

    /// Running total of `total_day_cost`, one entry per day.
    pub fn cumulative_costs(&self) -> Vec<f64> {
        self.records
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r.total_day_cost;
                Some(*acc)
            })
            .collect()
    }

    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.total_day_cost).sum()
    }

    pub fn inventory_series(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.ending_inventory).collect()
    }

    pub fn demand_series(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.demand).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inventory::{settle_day, CostRates, OrderQty};
    use crate::simulation::config::GameConfig;

    fn ledger_for(orders: &[u32], demand: &[u32]) -> Ledger {
        let rates = CostRates::from(&GameConfig::default());
        let mut ledger = Ledger::new();
        let mut stock = 0;
        for (i, (&o, &d)) in orders.iter().zip(demand).enumerate() {
            let s = settle_day(stock, OrderQty::new(o), d, &rates).unwrap();
            ledger.push(DayRecord::new(i as u32 + 1, stock, o, d, &s));
            stock = s.ending_inventory;
        }
        ledger
    }

    #[test]
    fn running_total_matches_total() {
        let ledger = ledger_for(&[60, 0, 50, 7, 33], &[50, 50, 50, 12, 30]);
        let cumulative = ledger.cumulative_costs();
        assert_eq!(cumulative.len(), 5);
        assert_eq!(*cumulative.last().unwrap(), ledger.total_cost());
        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn series_follow_records() {
        let ledger = ledger_for(&[60, 0, 50], &[50, 50, 50]);
        assert_eq!(ledger.inventory_series(), vec![10, 0, 0]);
        assert_eq!(ledger.demand_series(), vec![50, 50, 50]);
        assert_eq!(ledger.last().map(|r| r.day), Some(3));
    }

    #[test]
    fn empty_ledger_costs_nothing() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_cost(), 0.0);
        assert!(ledger.cumulative_costs().is_empty());
    }
}
