use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// The coin kinds the machine accepts, in the order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    Quarter,
    Dime,
    Nickel,
    Penny,
}

pub const DENOMINATIONS: [Denomination; 4] = [
    Denomination::Quarter,
    Denomination::Dime,
    Denomination::Nickel,
    Denomination::Penny,
];

impl Denomination {
    pub fn value(self) -> Decimal {
        match self {
            Denomination::Quarter => dec!(0.25),
            Denomination::Dime => dec!(0.10),
            Denomination::Nickel => dec!(0.05),
            Denomination::Penny => dec!(0.01),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Denomination::Quarter => "quarters",
            Denomination::Dime => "dimes",
            Denomination::Nickel => "nickels",
            Denomination::Penny => "pennies",
        }
    }
}

/// Where coins come from during one order. The interactive implementation
/// lives in [`console`](crate::console); tests script it.
pub trait CoinInput {
    /// Called once before collection starts, with the drink and its price.
    fn announce_price(&mut self, drink: &str, price: Decimal);

    /// The number of coins inserted for one denomination, or `None` if the
    /// customer cancelled the order. Implementations must keep asking until
    /// they have a valid non-negative count or a cancellation; a count of
    /// zero is valid.
    fn insert(&mut self, denomination: Denomination) -> Option<u64>;
}

/// Outcome of collecting payment for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenderResult {
    /// The full coin sequence was collected; the total is exact to the cent.
    Tendered(Decimal),
    /// The customer aborted mid-collection; `refunded` is what they had
    /// inserted so far.
    Cancelled { refunded: Decimal },
}

/// Collects one count per denomination and sums in exact decimal; money
/// never passes through floating point.
pub fn collect_tender(coins: &mut impl CoinInput, drink: &str, price: Decimal) -> TenderResult {
    coins.announce_price(drink, price);
    let mut total = Decimal::ZERO;
    for denomination in DENOMINATIONS {
        match coins.insert(denomination) {
            Some(count) => total += Decimal::from(count) * denomination.value(),
            None => {
                return TenderResult::Cancelled {
                    refunded: round2(total),
                };
            }
        }
    }
    TenderResult::Tendered(round2(total))
}

/// Rounds to two decimal places, half-up.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Change due for a paid order. Callers only invoke this once the tendered
/// amount covers the cost.
pub fn compute_change(tendered: Decimal, cost: Decimal) -> Decimal {
    debug_assert!(tendered >= cost);
    round2(tendered - cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds a fixed coin sequence; `None` entries simulate a cancellation.
    struct ScriptedCoins {
        counts: Vec<Option<u64>>,
        announced: Vec<(String, Decimal)>,
    }

    impl ScriptedCoins {
        fn new(counts: &[Option<u64>]) -> Self {
            Self {
                counts: counts.to_vec(),
                announced: Vec::new(),
            }
        }
    }

    impl CoinInput for ScriptedCoins {
        fn announce_price(&mut self, drink: &str, price: Decimal) {
            self.announced.push((drink.to_string(), price));
        }

        fn insert(&mut self, _denomination: Denomination) -> Option<u64> {
            if self.counts.is_empty() {
                return None;
            }
            self.counts.remove(0)
        }
    }

    #[test]
    fn test_summation_is_exact() {
        // 2 quarters + 1 dime + 1 nickel + 1 penny
        let mut coins = ScriptedCoins::new(&[Some(2), Some(1), Some(1), Some(1)]);
        let result = collect_tender(&mut coins, "espresso", dec!(1.50));
        assert_eq!(result, TenderResult::Tendered(dec!(0.66)));
    }

    #[test]
    fn test_every_denomination_is_collected() {
        let mut coins = ScriptedCoins::new(&[Some(0), Some(0), Some(0), Some(0)]);
        let result = collect_tender(&mut coins, "espresso", dec!(1.50));
        assert_eq!(result, TenderResult::Tendered(dec!(0.00)));
        assert_eq!(coins.announced, vec![("espresso".to_string(), dec!(1.50))]);
    }

    #[test]
    fn test_cancellation_reports_partial_refund() {
        let mut coins = ScriptedCoins::new(&[Some(2), None]);
        let result = collect_tender(&mut coins, "latte", dec!(2.50));
        assert_eq!(
            result,
            TenderResult::Cancelled {
                refunded: dec!(0.50)
            }
        );
    }

    #[test]
    fn test_compute_change_round_trip() {
        let change = compute_change(dec!(2.00), dec!(1.50));
        assert_eq!(change, dec!(0.50));
        assert_eq!(dec!(1.50) + change, dec!(2.00));
    }

    #[test]
    fn test_compute_change_zero() {
        assert_eq!(compute_change(dec!(1.50), dec!(1.50)), dec!(0.00));
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(0.005)), dec!(0.01));
        assert_eq!(round2(dec!(0.004)), dec!(0.00));
        assert_eq!(round2(dec!(2.675)), dec!(2.68));
    }
}
