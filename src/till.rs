use crate::payment::round2;
use rust_decimal::Decimal;

/// The machine's financial ledger: accumulated earnings and how many orders
/// produced them. Only a committed order adds to it; a rejected or cancelled
/// order never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Till {
    earnings: Decimal,
    transactions: u64,
}

impl Till {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one committed sale.
    pub fn record_sale(&mut self, price: Decimal) {
        self.earnings = round2(self.earnings + price);
        self.transactions += 1;
    }

    pub fn earnings(&self) -> Decimal {
        self.earnings
    }

    pub fn transactions(&self) -> u64 {
        self.transactions
    }

    /// Average earnings per transaction, or `None` before the first sale.
    pub fn average_sale(&self) -> Option<Decimal> {
        if self.transactions == 0 {
            return None;
        }
        Some(round2(self.earnings / Decimal::from(self.transactions)))
    }

    /// Overwrites the accumulated earnings, used when restoring a persisted
    /// snapshot. The snapshot carries no transaction count, so the counter
    /// restarts at zero.
    pub fn set_earnings(&mut self, earnings: Decimal) {
        self.earnings = round2(earnings);
    }
}
