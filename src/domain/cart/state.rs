//! Cart state container. Transitions are pure: they return a new state and
//! leave the receiver untouched, so the pre-mutation snapshot stays around
//! for rollback.

use rust_decimal::Decimal;

use super::CartLine;
use crate::domain::product::Product;
use crate::shared::ProductId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative server lines, taken verbatim.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Increment the product's line, or append a new one.
    pub fn with_added(&self, product: &Product, quantity: u32) -> Self {
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => lines.push(CartLine::from_product(product, quantity)),
        }
        Self { lines }
    }

    /// Decrement the product's line by one, removing it at zero. Unknown
    /// products leave the state unchanged.
    pub fn with_decremented(&self, product_id: ProductId) -> Self {
        let mut lines = self.lines.clone();
        if let Some(pos) = lines.iter().position(|l| l.product_id == product_id) {
            if lines[pos].quantity > 1 {
                lines[pos].quantity -= 1;
            } else {
                lines.remove(pos);
            }
        }
        Self { lines }
    }

    /// Total units across all lines.
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of `price * quantity`, unrounded.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(id: i64, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            image_urls: Vec::new(),
            image_url: None,
            stock_quantity: 10,
            category: None,
        }
    }

    #[test]
    fn test_add_appends_then_increments() {
        let p = product(1, "2.50");
        let cart = CartState::new().with_added(&p, 1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(p.id).unwrap().quantity, 1);

        let cart = cart.with_added(&p, 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(p.id).unwrap().quantity, 3);
    }

    #[test]
    fn test_transitions_do_not_touch_receiver() {
        let before = CartState::new().with_added(&product(1, "1"), 1);
        let _after = before.with_added(&product(2, "1"), 1);
        assert_eq!(before.lines().len(), 1);
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let p = product(1, "5");
        let cart = CartState::new().with_added(&p, 1).with_decremented(p.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_above_one_only_decrements() {
        let p = product(1, "5");
        let cart = CartState::new().with_added(&p, 3).with_decremented(p.id);
        assert_eq!(cart.line(p.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_decrement_unknown_product_is_noop() {
        let cart = CartState::new().with_added(&product(1, "5"), 1);
        assert_eq!(cart.with_decremented(ProductId::new(9)), cart);
    }

    #[test]
    fn test_count_and_subtotal() {
        let cart = CartState::new()
            .with_added(&product(1, "19.99"), 2)
            .with_added(&product(2, "0.02"), 5);
        assert_eq!(cart.count(), 7);
        assert_eq!(cart.subtotal(), Decimal::from_str("40.08").unwrap());
        assert_eq!(CartState::new().subtotal(), Decimal::ZERO);
    }
}
