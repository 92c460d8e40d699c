use anchor_lang::prelude::*;

pub const POOL_SEED: &[u8] = b"pool";
pub const INVESTMENTS_SEED: &[u8] = b"investments";
pub const UNWRAP_SEED: &[u8] = b"unwrap";

/// Sentinel entry asset for pools that take the chain's native currency.
pub const NATIVE_ASSET: Pubkey = Pubkey::new_from_array([0u8; 32]);

pub const MAX_POOL_TOKENS: usize = 8;
pub const MAX_POOL_NAME_LEN: usize = 32;

pub const MAX_FEE_PERCENT: u8 = 50;
pub const DISTRIBUTION_TOTAL: u32 = 100;
pub const PERCENT_DENOMINATOR: u128 = 100;

// Router swaps must settle within this window.
pub const SWAP_DEADLINE_SECS: i64 = 300;

// Ceiling on the return data a view can hand back.
pub const MAX_RETURN_DATA_LEN: usize = 1024;
