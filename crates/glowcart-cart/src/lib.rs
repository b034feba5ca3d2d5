pub mod coordinator;
pub mod key;
pub mod state;

use thiserror::Error;

pub use coordinator::{MutationCoordinator, MutationTicket};
pub use key::{mutation_key, CartAction};
pub use state::{Cart, CartChange, CartLine, LineInput, LineUpdate, OptimisticCart};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("no cart line with id {0}")]
    UnknownLine(String),

    #[error("line {line_id} quantity must be at least 1 (use a remove to delete)")]
    ZeroQuantity { line_id: String },
}
