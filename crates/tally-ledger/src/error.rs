use tally_types::LocalDate;

/// Refusals produced by ledger operations. Every refusal happens before any
/// record is created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient balance: current balance {balance}, required {cost}")]
    InsufficientBalance { balance: i64, cost: u64 },

    #[error("bounty {title:?} expired on {deadline} (today is {today}); disable or delete it instead")]
    ExpiredBounty {
        title: String,
        deadline: LocalDate,
        today: LocalDate,
    },

    #[error("reward {0:?} is not available for redemption")]
    RewardUnavailable(String),

    #[error("bounty {0:?} is not open for completion")]
    BountyUnavailable(String),
}
