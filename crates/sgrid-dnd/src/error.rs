#![forbid(unsafe_code)]

//! Setup errors for containers and boards.

use crate::order::OrderError;
use crate::selector::SelectorError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DndError {
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("container id must not be empty")]
    EmptyContainerId,
    #[error("container {0:?} is already on the board")]
    DuplicateContainer(String),
}
