use crate::error::MachineError;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// A purchasable drink: its ingredient requirements and its price.
///
/// Immutable after construction; owned by the [`Menu`](crate::menu::Menu).
/// Ingredient iteration order is the order the menu source declared them in,
/// which is also the order shortages are reported in.
#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    name: String,
    ingredients: IndexMap<String, u32>,
    price: Decimal,
}

impl Drink {
    pub fn new(
        name: impl Into<String>,
        ingredients: IndexMap<String, u32>,
        price: Decimal,
    ) -> Result<Self, MachineError> {
        let name = name.into();
        if ingredients.is_empty() {
            return Err(MachineError::MalformedMenuEntry {
                name,
                reason: "no ingredients".to_string(),
            });
        }
        if price < Decimal::ZERO {
            return Err(MachineError::MalformedMenuEntry {
                name,
                reason: format!("negative price {price}"),
            });
        }
        Ok(Self {
            name,
            ingredients,
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredients(&self) -> &IndexMap<String, u32> {
        &self.ingredients
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn espresso_ingredients() -> IndexMap<String, u32> {
        IndexMap::from([("water".to_string(), 50), ("coffee".to_string(), 18)])
    }

    #[test]
    fn test_drink_construction() {
        let drink = Drink::new("espresso", espresso_ingredients(), dec!(1.50)).unwrap();
        assert_eq!(drink.name(), "espresso");
        assert_eq!(drink.price(), dec!(1.50));
        assert_eq!(drink.ingredients().get("water"), Some(&50));
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let result = Drink::new("water", IndexMap::new(), dec!(1.00));
        assert!(matches!(
            result,
            Err(MachineError::MalformedMenuEntry { .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Drink::new("tea", IndexMap::from([("water".to_string(), 200)]), dec!(-1.0));
        assert!(matches!(
            result,
            Err(MachineError::MalformedMenuEntry { .. })
        ));
    }

    #[test]
    fn test_free_drink_allowed() {
        let drink = Drink::new("tap water", IndexMap::from([("water".to_string(), 200)]), dec!(0));
        assert!(drink.is_ok());
    }

    #[test]
    fn test_ingredient_order_preserved() {
        let mut ingredients = IndexMap::new();
        ingredients.insert("milk".to_string(), 150);
        ingredients.insert("water".to_string(), 200);
        ingredients.insert("coffee".to_string(), 24);
        let drink = Drink::new("latte", ingredients, dec!(2.50)).unwrap();
        let names: Vec<&str> = drink.ingredients().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["milk", "water", "coffee"]);
    }
}
