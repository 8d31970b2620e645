use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to do when an outflow asks for more quantity than the running
/// balance holds at that point in replay.
///
/// The engine never discards the shortfall silently; the caller picks one of
/// these and the choice is visible in the result (an error, a zeroed balance,
/// or a warn-logged skip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutflowPolicy {
    /// Fail the snapshot with an insufficient-stock error.
    #[default]
    Reject,
    /// Consume everything available; quantity and value go to exactly zero.
    ClampToZero,
    /// Ignore the movement's effect (legacy report compatibility). Each skip
    /// is logged at WARN.
    SkipMovement,
}

/// An outflow exceeded the available running quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: Decimal,
    pub available: Decimal,
}

/// The replay accumulator: running on-hand quantity and running value.
///
/// The weighted-average unit cost is not stored; it is always
/// `value / qty` and therefore updates implicitly on every inflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningBalance {
    qty: Decimal,
    value: Decimal,
}

impl RunningBalance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn qty(&self) -> Decimal {
        self.qty
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Average cost of what is currently on hand; zero when nothing is.
    pub fn average_unit_cost(&self) -> Decimal {
        if self.qty > Decimal::ZERO {
            self.value / self.qty
        } else {
            Decimal::ZERO
        }
    }

    /// Book an inflow of `quantity` units at `unit_cost` each.
    pub fn receive(&mut self, quantity: Decimal, unit_cost: Decimal) {
        self.qty += quantity;
        self.value += quantity * unit_cost;
    }

    /// Consume `quantity` units at the average cost immediately prior.
    ///
    /// A full drain zeroes the balance exactly rather than leaving division
    /// dust behind, so an inflow followed by a matching outflow conserves
    /// value to the last decimal place.
    pub fn consume(&mut self, quantity: Decimal) -> Result<(), Shortfall> {
        if self.qty < quantity {
            return Err(Shortfall {
                requested: quantity,
                available: self.qty,
            });
        }

        if self.qty == quantity {
            self.qty = Decimal::ZERO;
            self.value = Decimal::ZERO;
        } else {
            let outflow_value = quantity * self.value / self.qty;
            self.qty -= quantity;
            self.value -= outflow_value;
        }
        Ok(())
    }

    /// Consume everything on hand (the `ClampToZero` policy's resolution).
    pub fn drain(&mut self) {
        self.qty = Decimal::ZERO;
        self.value = Decimal::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn average_updates_on_each_inflow() {
        let mut balance = RunningBalance::new();
        balance.receive(dec!(100), dec!(10));
        assert_eq!(balance.average_unit_cost(), dec!(10));

        balance.receive(dec!(100), dec!(20));
        assert_eq!(balance.qty(), dec!(200));
        assert_eq!(balance.value(), dec!(3000));
        assert_eq!(balance.average_unit_cost(), dec!(15));
    }

    #[test]
    fn consume_uses_prior_average_cost() {
        let mut balance = RunningBalance::new();
        balance.receive(dec!(200), dec!(15));
        balance.consume(dec!(50)).unwrap();

        assert_eq!(balance.qty(), dec!(150));
        assert_eq!(balance.value(), dec!(2250));
        assert_eq!(balance.average_unit_cost(), dec!(15));
    }

    #[test]
    fn full_drain_is_exact_even_with_repeating_averages() {
        let mut balance = RunningBalance::new();
        // 10 / 3 has no finite decimal representation.
        balance.receive(dec!(3), dec!(3.333333));
        balance.consume(dec!(3)).unwrap();

        assert_eq!(balance.qty(), Decimal::ZERO);
        assert_eq!(balance.value(), Decimal::ZERO);
        assert_eq!(balance.average_unit_cost(), Decimal::ZERO);
    }

    #[test]
    fn shortfall_reports_requested_and_available() {
        let mut balance = RunningBalance::new();
        balance.receive(dec!(10), dec!(1));

        let shortfall = balance.consume(dec!(25)).unwrap_err();
        assert_eq!(shortfall.requested, dec!(25));
        assert_eq!(shortfall.available, dec!(10));
        // The failed consume left the balance untouched.
        assert_eq!(balance.qty(), dec!(10));
    }

    #[test]
    fn empty_balance_has_zero_average() {
        let balance = RunningBalance::new();
        assert_eq!(balance.average_unit_cost(), Decimal::ZERO);
    }
}
