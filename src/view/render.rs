use std::fmt;

use super::{CheckoutPhase, Toast};
use crate::cart::Price;

/// Label for a single item's price: `FREE` for zero, otherwise symbol + amount.
pub fn price_label(price: Price, currency_symbol: &str) -> String {
    if price.is_free() {
        "FREE".to_string()
    } else {
        format!("{}{}", currency_symbol, price)
    }
}

/// Label for the cart total; always numeric.
pub fn total_label(total: Price, currency_symbol: &str) -> String {
    format!("{}{}", currency_symbol, total)
}

/// One rendered cart row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub thumbnail: String,
    pub price: Price,
    pub price_label: String,
}

/// Everything the cart drawer shows at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub lines: Vec<LineView>,
    pub total: Price,
    pub total_label: String,
    /// "Remove all items?" confirmation is showing
    pub remove_all_prompt: bool,
    pub checkout: CheckoutPhase,
    pub toast: Option<Toast>,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn can_checkout(&self) -> bool {
        !self.lines.is_empty() && self.checkout == CheckoutPhase::Closed
    }

    pub fn line(&self, id: &str) -> Option<&LineView> {
        self.lines.iter().find(|line| line.id == id)
    }
}

impl fmt::Display for CartSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Cart")?;
        if self.lines.is_empty() {
            writeln!(f, "  Your cart is empty")?;
        } else {
            for line in &self.lines {
                writeln!(
                    f,
                    "  [{}] {} ({})  {}",
                    line.id, line.title, line.instructor, line.price_label
                )?;
            }
            writeln!(f, "Total: {}", self.total_label)?;
        }

        if self.remove_all_prompt {
            writeln!(
                f,
                "Remove All Items? Are you sure you want to remove all items from your cart?"
            )?;
        }

        match self.checkout {
            CheckoutPhase::Closed => {}
            CheckoutPhase::Reviewing => {
                writeln!(f, "Checkout")?;
                writeln!(f, "  {} item(s), Total: {}", self.lines.len(), self.total_label)?;
                writeln!(f, "  [buy] Buy Now   [continue] Continue")?;
            }
            CheckoutPhase::Succeeded => {
                writeln!(f, "Checkout")?;
                writeln!(f, "  Purchase Successful!")?;
            }
        }

        if let Some(ref toast) = self.toast {
            writeln!(f, "({}) {}", toast.kind, toast.message)?;
        }
        Ok(())
    }
}
