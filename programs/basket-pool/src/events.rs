use anchor_lang::prelude::*;

#[event]
pub struct Invested {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub net_amount: u64,
    pub investment_index: u64,
    pub distribution: Vec<u8>,
}

#[event]
pub struct Rebalanced {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub investment_index: u64,
    pub token_balances: Vec<u64>,
    pub distribution: Vec<u8>,
}

#[event]
pub struct ToggleRebalance {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub investment_index: u64,
    pub enabled: bool,
}

#[event]
pub struct InvestmentWithdrawal {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub payout: u64,
    pub investment_index: u64,
}

#[event]
pub struct Paused {
    pub pool: Pubkey,
    pub account: Pubkey,
}

#[event]
pub struct Unpaused {
    pub pool: Pubkey,
    pub account: Pubkey,
}

#[event]
pub struct OwnershipTransferred {
    pub pool: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

/// Emitted by every successful parameter setter.
#[event]
pub struct PoolParametersUpdated {
    pub pool: Pubkey,
    pub parameter: String,
}
