use crate::error::{MachineError, Result};
use crate::menu::Menu;
use crate::payment::{CoinInput, TenderResult, collect_tender, compute_change};
use crate::snapshot::MachineState;
use crate::stock::StockLedger;
use crate::till::Till;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info};

/// Why an order was rejected. Every rejection leaves both ledgers exactly as
/// they were before the order; amounts already inserted are reported back so
/// the caller can hand them out as a refund.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("unknown drink {0:?}")]
    UnknownDrink(String),
    #[error("not enough {0}")]
    OutOfStock(String),
    #[error("insufficient payment: ${tendered} tendered for a ${price} drink")]
    ShortPaid { tendered: Decimal, price: Decimal },
    #[error("order cancelled, ${refunded} refunded")]
    Cancelled { refunded: Decimal },
    #[error("{ingredient} ran out while dispensing, ${refunded} refunded")]
    StockRaceLost {
        ingredient: String,
        refunded: Decimal,
    },
}

/// Record of one committed order. `tendered == price + change` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub drink: String,
    pub price: Decimal,
    pub tendered: Decimal,
    pub change: Decimal,
}

/// The order-fulfillment engine: one read-only drink catalog, one stock
/// ledger and one till, all exclusively owned. One order runs start to
/// finish before the next begins.
pub struct CoffeeMachine {
    menu: Menu,
    stock: StockLedger,
    till: Till,
}

impl CoffeeMachine {
    pub fn new(menu: Menu, stock: StockLedger) -> Self {
        Self {
            menu,
            stock,
            till: Till::new(),
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn stock(&self) -> &StockLedger {
        &self.stock
    }

    pub fn till(&self) -> &Till {
        &self.till
    }

    /// Runs one order end to end: catalog lookup, read-only stock check,
    /// payment collection, then the commit. The ledgers are only touched in
    /// the commit step, and the stock deduction is applied before earnings
    /// are recorded; recording cannot fail, so the two mutations land as one
    /// unit.
    pub fn fulfill(
        &mut self,
        drink_id: &str,
        coins: &mut impl CoinInput,
    ) -> std::result::Result<Receipt, Rejection> {
        let Some(drink) = self.menu.lookup(drink_id) else {
            return Err(Rejection::UnknownDrink(drink_id.to_string()));
        };
        let drink = drink.clone();
        debug!(drink = drink.name(), "order validated");

        // Non-destructive check; no payment is requested for a drink the
        // machine cannot make.
        if let Some(ingredient) = self.stock.first_shortage(drink.ingredients()) {
            return Err(Rejection::OutOfStock(ingredient.to_string()));
        }

        let tendered = match collect_tender(coins, drink.name(), drink.price()) {
            TenderResult::Tendered(amount) => amount,
            TenderResult::Cancelled { refunded } => {
                return Err(Rejection::Cancelled { refunded });
            }
        };
        if tendered < drink.price() {
            return Err(Rejection::ShortPaid {
                tendered,
                price: drink.price(),
            });
        }

        // Commit. `deduct` re-verifies every requirement before subtracting;
        // a failure here means stock vanished since the check, which the
        // single-order model rules out.
        if let Err(err) = self.stock.deduct(drink.ingredients()) {
            let ingredient = match err {
                MachineError::InsufficientStock(name)
                | MachineError::UnknownIngredient(name) => name,
                other => other.to_string(),
            };
            error!(
                drink = drink.name(),
                ingredient, "stock vanished between check and deduction"
            );
            return Err(Rejection::StockRaceLost {
                ingredient,
                refunded: tendered,
            });
        }
        self.till.record_sale(drink.price());

        let change = compute_change(tendered, drink.price());
        info!(
            drink = drink.name(),
            price = %drink.price(),
            change = %change,
            "order committed"
        );
        Ok(Receipt {
            drink: drink.name().to_string(),
            price: drink.price(),
            tendered,
            change,
        })
    }

    /// Adds stock, validating every amount first. Surfaced unchanged so the
    /// maintenance collaborator can report the specific failure.
    pub fn replenish(&mut self, amounts: &IndexMap<String, i64>) -> Result<()> {
        self.stock.replenish(amounts)?;
        info!(ingredients = amounts.len(), "stock replenished");
        Ok(())
    }

    /// How many servings of each drink the current stock can produce.
    pub fn servings_available(&self) -> IndexMap<String, u32> {
        self.menu
            .drinks()
            .map(|drink| {
                let servings = drink
                    .ingredients()
                    .iter()
                    .map(|(ingredient, required)| self.stock.quantity(ingredient) / required)
                    .min()
                    .unwrap_or(0);
                (drink.name().to_string(), servings)
            })
            .collect()
    }

    /// Current ledger state for persistence or reporting. Orders never run
    /// while a snapshot is taken, so this always observes a fully committed
    /// state.
    pub fn snapshot(&self) -> MachineState {
        MachineState {
            resources: self.stock.quantities(),
            earnings: self.till.earnings(),
        }
    }

    /// Restores ledger state from a persisted snapshot.
    pub fn restore(&mut self, state: &MachineState) {
        for (ingredient, quantity) in &state.resources {
            self.stock.set_quantity(ingredient, *quantity);
        }
        self.till.set_earnings(state.earnings);
    }
}
