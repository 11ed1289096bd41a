// src/model/inventory.rs

use crate::simulation::config::GameConfig;
use crate::simulation::error::DecisionError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A validated, non-negative whole order quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct OrderQty(u32);

impl OrderQty {
    pub fn new(units: u32) -> Self {
        Self(units)
    }

    pub fn units(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for OrderQty {
    type Error = DecisionError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw < 0 {
            return Err(DecisionError::Negative(raw));
        }
        u32::try_from(raw)
            .map(Self)
            .map_err(|_| DecisionError::TooLarge(raw))
    }
}

impl FromStr for OrderQty {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(raw) => Self::try_from(raw),
            Err(_) => Err(DecisionError::NotAnInteger(trimmed.to_string())),
        }
    }
}

impl fmt::Display for OrderQty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-unit prices applied to a single day, taken from the game config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRates {
    pub unit_cost: f64,
    pub holding_per_unit_per_day: f64,
    pub shortage_per_unit: f64,
}

impl From<&GameConfig> for CostRates {
    fn from(config: &GameConfig) -> Self {
        Self {
            unit_cost: config.unit_cost,
            holding_per_unit_per_day: config.holding_cost_per_unit_per_day(),
            shortage_per_unit: config.shortage_cost_per_unit,
        }
    }
}

/// Outcome of one day of trading before it is stamped into the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySettlement {
    pub units_sold: u32,
    pub shortage_units: u32,
    pub ending_inventory: u32,
    pub purchase_cost: f64,
    pub holding_cost: f64,
    pub shortage_cost: f64,
}

impl DaySettlement {
    pub fn total_cost(&self) -> f64 {
        self.purchase_cost + self.holding_cost + self.shortage_cost
    }
}

/// Settles a day under the lost-sales rule.
///
/// Ordered units arrive immediately and are added to the opening stock.
/// Whatever demand cannot be served from that is lost for good; nothing is
/// carried into the next day, so the closing stock never goes below zero.
pub fn settle_day(
    starting_inventory: u32,
    order: OrderQty,
    demand: u32,
    rates: &CostRates,
) -> Result<DaySettlement, DecisionError> {
    let available = starting_inventory.checked_add(order.units()).ok_or(
        DecisionError::InventoryOverflow {
            starting: starting_inventory,
            order: order.units(),
        },
    )?;

    let units_sold = available.min(demand);
    let shortage_units = demand.saturating_sub(available);
    let ending_inventory = available - units_sold;

    Ok(DaySettlement {
        units_sold,
        shortage_units,
        ending_inventory,
        purchase_cost: f64::from(order.units()) * rates.unit_cost,
        holding_cost: f64::from(ending_inventory) * rates.holding_per_unit_per_day,
        shortage_cost: f64::from(shortage_units) * rates.shortage_per_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rates() -> CostRates {
        CostRates::from(&GameConfig::default())
    }

    #[test]
    fn parses_whole_orders_only() {
        assert_eq!("60".parse::<OrderQty>(), Ok(OrderQty::new(60)));
        assert_eq!(" 0 ".parse::<OrderQty>(), Ok(OrderQty::new(0)));
        assert_eq!("-3".parse::<OrderQty>(), Err(DecisionError::Negative(-3)));
        assert_eq!(
            "2.5".parse::<OrderQty>(),
            Err(DecisionError::NotAnInteger("2.5".to_string()))
        );
        assert_eq!(
            "lots".parse::<OrderQty>(),
            Err(DecisionError::NotAnInteger("lots".to_string()))
        );
        assert_eq!(
            OrderQty::try_from(i64::from(u32::MAX) + 1),
            Err(DecisionError::TooLarge(i64::from(u32::MAX) + 1))
        );
    }

    #[test]
    fn surplus_is_held() {
        let s = settle_day(0, OrderQty::new(60), 50, &rates()).unwrap();
        assert_eq!((s.units_sold, s.shortage_units, s.ending_inventory), (50, 0, 10));
        assert_eq!(s.purchase_cost, 6000.0);
        assert!((s.holding_cost - 10.0 * 20.0 / 365.0).abs() < 1e-12);
        assert_eq!(s.shortage_cost, 0.0);
    }

    #[test]
    fn unmet_demand_is_lost() {
        let s = settle_day(10, OrderQty::new(0), 50, &rates()).unwrap();
        assert_eq!((s.units_sold, s.shortage_units, s.ending_inventory), (10, 40, 0));
        assert_eq!(s.shortage_cost, 800.0);
        assert_eq!(s.total_cost(), 800.0);
    }

    #[test]
    fn overflowing_stock_is_rejected() {
        let err = settle_day(u32::MAX, OrderQty::new(1), 0, &rates()).unwrap_err();
        assert_eq!(
            err,
            DecisionError::InventoryOverflow { starting: u32::MAX, order: 1 }
        );
    }

    proptest! {
        #[test]
        fn stock_is_conserved(start in 0u32..10_000, order in 0u32..10_000, demand in 0u32..10_000) {
            let s = settle_day(start, OrderQty::new(order), demand, &rates()).unwrap();
            prop_assert_eq!(start + order, s.units_sold + s.ending_inventory);
            prop_assert_eq!(s.units_sold, (start + order).min(demand));
            prop_assert_eq!(
                i64::from(s.shortage_units),
                (i64::from(demand) - i64::from(start) - i64::from(order)).max(0)
            );
            prop_assert!(s.ending_inventory == 0 || s.shortage_units == 0);
        }
    }
}
