//! Error types shared by the trainer, the evaluator and the game models.

use thiserror::Error;

use crate::cfr::config::ConfigError;

/// Errors that abort a training or evaluation run.
///
/// `InvalidAction` and `InconsistentInformationSet` mean the game model broke
/// its contract. Neither is recoverable: a half-finished iteration would leave
/// partial regret updates behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CfrError {
    /// `apply` was called with an action that is not legal at this node.
    #[error("invalid action '{action}' at information set '{key}'")]
    InvalidAction {
        /// Token of the rejected action.
        action: char,
        /// Representation of the node the action was applied to.
        key: String,
    },

    /// A representation key was seen with two different action counts.
    #[error("information set '{key}' holds {expected} actions but the node offers {found}")]
    InconsistentInformationSet {
        /// The offending representation key.
        key: String,
        /// Action count stored for the key.
        expected: usize,
        /// Action count seen at the current node.
        found: usize,
    },

    /// A deal did not contain enough cards for every seat plus the board.
    #[error("deal needs {expected} cards, got {found}")]
    InvalidDeal {
        /// Cards required by the variant.
        expected: usize,
        /// Cards supplied.
        found: usize,
    },

    /// The training configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
