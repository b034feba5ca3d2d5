//! Cart state and the optimistic overlay.
//!
//! The backend owns cart truth; locally we keep the last confirmed [`Cart`]
//! plus a small overlay of not-yet-confirmed changes keyed by mutation key.
//! [`OptimisticCart::preview`] is what the UI renders: truth with the overlay
//! applied. A confirmed mutation promotes the server's cart to truth and
//! clears its overlay entry; a failed one just drops the entry, so the
//! display falls back to the last known-good state and no partial quantity
//! survives.

use serde::{Deserialize, Serialize};

use crate::key::{mutation_key, CartAction};
use crate::CartError;

/// One line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    /// Backend variant identifier the line points at.
    pub merchandise_id: String,
    pub quantity: u32,
    /// Unit price as a decimal string, as quoted by the backend.
    pub unit_price: String,
}

/// The cart as last confirmed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub discount_codes: Vec<String>,
}

/// Input for adding a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    pub merchandise_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<String>,
}

/// Input for changing an existing line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineUpdate {
    pub line_id: String,
    pub quantity: u32,
}

/// One cart mutation, in the shape the UI controls produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartChange {
    AddLines { lines: Vec<LineInput> },
    UpdateLines { lines: Vec<LineUpdate> },
    RemoveLines { line_ids: Vec<String> },
    SetDiscountCodes { codes: Vec<String> },
}

impl CartChange {
    #[must_use]
    pub fn action(&self) -> CartAction {
        match self {
            Self::AddLines { .. } => CartAction::LinesAdd,
            Self::UpdateLines { .. } => CartAction::LinesUpdate,
            Self::RemoveLines { .. } => CartAction::LinesRemove,
            Self::SetDiscountCodes { .. } => CartAction::DiscountCodesUpdate,
        }
    }

    /// The identifiers this change touches, in the caller's order. Adds are
    /// keyed by merchandise id since no line id exists yet.
    #[must_use]
    pub fn affected_ids(&self) -> Vec<String> {
        match self {
            Self::AddLines { lines } => lines.iter().map(|l| l.merchandise_id.clone()).collect(),
            Self::UpdateLines { lines } => lines.iter().map(|l| l.line_id.clone()).collect(),
            Self::RemoveLines { line_ids } => line_ids.clone(),
            Self::SetDiscountCodes { .. } => Vec::new(),
        }
    }

    /// The coordination key under which this change must be issued.
    #[must_use]
    pub fn coordination_key(&self) -> String {
        mutation_key(self.action(), &self.affected_ids())
    }
}

impl Cart {
    /// Applies `change` in place. A change applies atomically: every line it
    /// names is validated before anything mutates, so a rejected change
    /// leaves the cart exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] when an update or remove names a
    /// line that is not in the cart, and [`CartError::ZeroQuantity`] for a
    /// quantity update to zero (removal is its own operation).
    pub fn apply(&mut self, change: &CartChange) -> Result<(), CartError> {
        match change {
            CartChange::AddLines { lines } => {
                for input in lines {
                    self.add_line(input);
                }
                Ok(())
            }
            CartChange::UpdateLines { lines } => {
                for update in lines {
                    if update.quantity == 0 {
                        return Err(CartError::ZeroQuantity {
                            line_id: update.line_id.clone(),
                        });
                    }
                    self.require_line(&update.line_id)?;
                }
                for update in lines {
                    if let Some(line) = self.lines.iter_mut().find(|l| l.id == update.line_id) {
                        line.quantity = update.quantity;
                    }
                }
                Ok(())
            }
            CartChange::RemoveLines { line_ids } => {
                for line_id in line_ids {
                    self.require_line(line_id)?;
                }
                self.lines.retain(|l| !line_ids.contains(&l.id));
                Ok(())
            }
            CartChange::SetDiscountCodes { codes } => {
                self.discount_codes = codes.clone();
                Ok(())
            }
        }
    }

    fn require_line(&self, line_id: &str) -> Result<(), CartError> {
        if self.lines.iter().any(|l| l.id == line_id) {
            Ok(())
        } else {
            Err(CartError::UnknownLine(line_id.to_owned()))
        }
    }

    /// Adding a merchandise id already in the cart bumps its quantity; the
    /// backend collapses duplicate lines the same way.
    fn add_line(&mut self, input: &LineInput) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.merchandise_id == input.merchandise_id)
        {
            line.quantity += input.quantity;
            return;
        }
        self.lines.push(CartLine {
            id: format!("line-{}", input.merchandise_id),
            merchandise_id: input.merchandise_id.clone(),
            quantity: input.quantity,
            unit_price: input.unit_price.clone().unwrap_or_default(),
        });
    }

    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Confirmed cart truth plus pending optimistic changes.
#[derive(Debug, Default)]
pub struct OptimisticCart {
    committed: Cart,
    /// Pending changes in issue order. At most one entry per mutation key:
    /// a re-trigger of the same control replaces its predecessor.
    pending: Vec<(String, CartChange)>,
}

impl OptimisticCart {
    #[must_use]
    pub fn new(committed: Cart) -> Self {
        Self {
            committed,
            pending: Vec::new(),
        }
    }

    /// Stages an optimistic change under its mutation key, replacing any
    /// pending change with the same key (last writer wins locally too).
    pub fn stage(&mut self, key: &str, change: CartChange) {
        self.pending.retain(|(k, _)| k != key);
        self.pending.push((key.to_owned(), change));
    }

    /// What the UI shows: committed truth with every pending change applied
    /// in issue order. A pending change that no longer applies is skipped
    /// whole (changes apply atomically); it will be rolled back when its
    /// request fails.
    #[must_use]
    pub fn preview(&self) -> Cart {
        let mut cart = self.committed.clone();
        for (_, change) in &self.pending {
            if let Err(error) = cart.apply(change) {
                tracing::debug!(%error, "pending cart change skipped in preview");
            }
        }
        cart
    }

    /// Promotes the backend's cart to truth after a confirmed mutation and
    /// clears the overlay entry for `key`.
    pub fn commit(&mut self, key: &str, server_cart: Cart) {
        self.committed = server_cart;
        self.pending.retain(|(k, _)| k != key);
    }

    /// Drops the overlay entry for `key`, reverting the display to the last
    /// known-good server state.
    pub fn rollback(&mut self, key: &str) {
        self.pending.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn committed(&self) -> &Cart {
        &self.committed
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
