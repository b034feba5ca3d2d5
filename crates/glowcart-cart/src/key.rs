//! Deterministic coordination keys for cart mutations.
//!
//! When a user rapidly re-triggers the same control (double-clicking a
//! quantity stepper, say), the requests share a key built from the action
//! kind plus the affected line ids. The request layer uses that key to
//! collapse concurrent mutations: a newer request supersedes an in-flight
//! older one instead of racing it. See [`crate::coordinator`].

/// The cart mutations the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    LinesAdd,
    LinesUpdate,
    LinesRemove,
    DiscountCodesUpdate,
}

impl CartAction {
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::LinesAdd => "LinesAdd",
            Self::LinesUpdate => "LinesUpdate",
            Self::LinesRemove => "LinesRemove",
            Self::DiscountCodesUpdate => "DiscountCodesUpdate",
        }
    }
}

/// Joins the action tag and line ids with a fixed delimiter, preserving the
/// caller's id order. Same action over the same ids always yields the same
/// key; requests with different keys touch different lines and are free to
/// complete in any order relative to each other.
#[must_use]
pub fn mutation_key<S: AsRef<str>>(action: CartAction, line_ids: &[S]) -> String {
    let mut key = String::from(action.as_tag());
    for id in line_ids {
        key.push(':');
        key.push_str(id.as_ref());
    }
    key
}
