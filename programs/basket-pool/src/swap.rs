//! Swap seam used by the ledger and the rebalancer. On chain the gateway is a
//! CPI into the pool's router; tests drive the same engine with a priced mock.

use anchor_lang::prelude::*;

use crate::error::ErrorCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub amount_in: u64,
    pub min_amount_out: u64,
}

pub trait SwapGateway {
    /// Executes one exact-input swap and returns the amount of `token_out`
    /// received. Implementations must fail rather than deliver less than
    /// `min_amount_out`.
    fn swap(&mut self, request: &SwapRequest) -> Result<u64>;
}

/// Converts `amount_in` of `token_in` into `token_out`. Same-token and zero
/// conversions never reach the gateway.
pub fn convert<G: SwapGateway + ?Sized>(
    gateway: &mut G,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<u64> {
    let amount_out = if amount_in == 0 {
        0
    } else if token_in == token_out {
        amount_in
    } else {
        gateway.swap(&SwapRequest {
            token_in,
            token_out,
            amount_in,
            min_amount_out,
        })?
    };

    require!(amount_out >= min_amount_out, ErrorCode::SlippageExceeded);
    Ok(amount_out)
}

/// Slippage floors are either omitted or given once per pool token.
pub fn validate_min_amounts(min_amounts_out: &[u64], token_count: usize) -> Result<()> {
    require!(
        min_amounts_out.is_empty() || min_amounts_out.len() == token_count,
        ErrorCode::InvalidMinAmounts
    );
    Ok(())
}

pub fn min_amount_at(min_amounts_out: &[u64], index: usize) -> u64 {
    min_amounts_out.get(index).copied().unwrap_or(0)
}
