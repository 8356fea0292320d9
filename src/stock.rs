use crate::error::{MachineError, Result};
use indexmap::IndexMap;

/// Remaining quantity of one ingredient, plus the tank capacity used for
/// low-stock detection. A capacity of zero means "capacity unknown": the
/// ingredient is never reported low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity: u32,
    pub capacity: u32,
}

/// Mutable quantities of the machine's consumable ingredients.
///
/// Quantities never go negative: a deduction is verified in full before any
/// subtraction is applied, so a failed deduction leaves every level intact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockLedger {
    levels: IndexMap<String, StockLevel>,
}

impl StockLedger {
    /// Builds a ledger from initial quantities; each ingredient's capacity is
    /// its initial fill.
    pub fn new(initial: impl IntoIterator<Item = (String, u32)>) -> Self {
        let levels = initial
            .into_iter()
            .map(|(ingredient, quantity)| {
                (
                    ingredient,
                    StockLevel {
                        quantity,
                        capacity: quantity,
                    },
                )
            })
            .collect();
        Self { levels }
    }

    pub fn quantity(&self, ingredient: &str) -> u32 {
        self.levels.get(ingredient).map_or(0, |level| level.quantity)
    }

    pub fn levels(&self) -> impl Iterator<Item = (&str, &StockLevel)> {
        self.levels.iter().map(|(name, level)| (name.as_str(), level))
    }

    /// Read-only sufficiency check. Returns the first required ingredient (in
    /// the requirements' own order) whose available quantity falls short; an
    /// ingredient the ledger has never seen counts as zero.
    pub fn first_shortage<'r>(&self, requirements: &'r IndexMap<String, u32>) -> Option<&'r str> {
        requirements
            .iter()
            .find(|(ingredient, required)| self.quantity(ingredient) < **required)
            .map(|(ingredient, _)| ingredient.as_str())
    }

    /// Deducts every requirement, all-or-nothing. Each requirement is
    /// re-verified here even if a [`first_shortage`](Self::first_shortage)
    /// check already passed; on any failure no quantity changes.
    pub fn deduct(&mut self, requirements: &IndexMap<String, u32>) -> Result<()> {
        for (ingredient, required) in requirements {
            let level = self
                .levels
                .get(ingredient)
                .ok_or_else(|| MachineError::UnknownIngredient(ingredient.clone()))?;
            if level.quantity < *required {
                return Err(MachineError::InsufficientStock(ingredient.clone()));
            }
        }
        for (ingredient, required) in requirements {
            self.levels[ingredient].quantity -= required;
        }
        Ok(())
    }

    /// Adds the given amounts, all-or-nothing. A non-positive amount fails
    /// with `InvalidQuantity` and leaves every level unchanged. Unknown
    /// ingredients are created with the added amount and no known capacity.
    pub fn replenish(&mut self, amounts: &IndexMap<String, i64>) -> Result<()> {
        for (ingredient, amount) in amounts {
            if *amount <= 0 {
                return Err(MachineError::InvalidQuantity {
                    ingredient: ingredient.clone(),
                    amount: *amount,
                });
            }
        }
        for (ingredient, amount) in amounts {
            let amount = u32::try_from(*amount).unwrap_or(u32::MAX);
            match self.levels.get_mut(ingredient) {
                Some(level) => level.quantity = level.quantity.saturating_add(amount),
                None => {
                    self.levels.insert(
                        ingredient.clone(),
                        StockLevel {
                            quantity: amount,
                            capacity: 0,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    /// Ingredients whose fill fraction has dropped below `threshold`
    /// (a fraction in `(0, 1]`). Ingredients without a known capacity are
    /// never reported.
    pub fn low_stock(&self, threshold: f64) -> Vec<&str> {
        self.levels
            .iter()
            .filter(|(_, level)| {
                level.capacity > 0
                    && (f64::from(level.quantity) / f64::from(level.capacity)) < threshold
            })
            .map(|(ingredient, _)| ingredient.as_str())
            .collect()
    }

    /// Overwrites one quantity, used when restoring a persisted snapshot.
    /// The configured capacity is retained; an ingredient the configuration
    /// does not know gets no capacity.
    pub fn set_quantity(&mut self, ingredient: &str, quantity: u32) {
        match self.levels.get_mut(ingredient) {
            Some(level) => level.quantity = quantity,
            None => {
                self.levels.insert(
                    ingredient.to_string(),
                    StockLevel {
                        quantity,
                        capacity: 0,
                    },
                );
            }
        }
    }

    /// Current quantities, in ledger order.
    pub fn quantities(&self) -> IndexMap<String, u32> {
        self.levels
            .iter()
            .map(|(ingredient, level)| (ingredient.clone(), level.quantity))
            .collect()
    }
}
