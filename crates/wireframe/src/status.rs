//! Transaction status codes reported by the node.
//!
//! Callers polling for completion stop on a terminal status. Unknown codes are
//! treated as still pending; the caller's own timeout bounds the wait.

/// Status of a submitted transaction.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxStatus {
    /// Accepted, not yet queued.
    Pending = 0,
    /// Waiting in the node's queue.
    Queued = 1,
    /// Handed to the network, awaiting inclusion.
    Broadcast = 2,
    /// Included in a block.
    Included = 3,
    /// Dropped by the node.
    Dropped = 4,
    /// Wallet could not cover the transaction.
    InsufficientBalance = 100,
    /// Nonce was stale or out of order.
    InvalidNonce = 101,
    /// Signature did not verify.
    InvalidSignature = 102,
    /// Wallet is locked.
    WalletLocked = 103,
    /// Node queue is full.
    QueueFull = 104,
    /// Node queue rejected the transaction.
    QueueRejected = 105,
}

impl TxStatus {
    /// Returns the status for a wire code, or `None` if unknown.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Queued),
            2 => Some(Self::Broadcast),
            3 => Some(Self::Included),
            4 => Some(Self::Dropped),
            100 => Some(Self::InsufficientBalance),
            101 => Some(Self::InvalidNonce),
            102 => Some(Self::InvalidSignature),
            103 => Some(Self::WalletLocked),
            104 => Some(Self::QueueFull),
            105 => Some(Self::QueueRejected),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    /// True once the transaction can no longer change state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Queued | Self::Broadcast)
    }

    /// True for terminal outcomes other than inclusion.
    pub fn is_failure(self) -> bool {
        self.is_terminal() && self != Self::Included
    }
}

/// Classifies a raw status code as terminal or still pending.
pub fn is_terminal_tx_status(code: u16) -> bool {
    TxStatus::from_code(code).is_some_and(TxStatus::is_terminal)
}
