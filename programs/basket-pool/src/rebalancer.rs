use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::ledger::investment_slot;
use crate::policy;
use crate::state::{Investment, Pool};
use crate::swap::{self, SwapGateway};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RebalanceReceipt {
    pub previous_received_currency: u64,
    pub received_currency: u64,
    pub token_balances: Vec<u64>,
    pub distribution: Vec<u8>,
}

/// Re-splits one investment to the pool's current distribution.
///
/// The whole basket is sold into the swap asset and bought back, so the
/// realized value of the sale becomes the record's new cost basis even when
/// the distribution has not changed.
pub fn rebalance<G: SwapGateway + ?Sized>(
    pool: &mut Pool,
    investments: &mut [Investment],
    gateway: &mut G,
    investment_id: u64,
    min_amounts_out: &[u64],
) -> Result<RebalanceReceipt> {
    let record = investment_slot(investments, investment_id)?;
    require!(record.active, ErrorCode::InvestmentNotActive);
    require!(record.rebalance_enabled, ErrorCode::RebalanceNotEnabled);
    pool.when_not_paused()?;
    swap::validate_min_amounts(min_amounts_out, pool.token_count())?;

    let swap_asset = pool.swap_asset();

    let mut realized: u64 = 0;
    for (token, balance) in pool.token_list.iter().zip(&record.token_balances) {
        let proceeds = swap::convert(gateway, *token, swap_asset, *balance, 0)?;
        realized = realized.checked_add(proceeds).ok_or(ErrorCode::MathOverflow)?;
    }

    let slices = policy::allocate(realized, &pool.distribution)?;
    let mut token_balances = Vec::with_capacity(slices.len());
    for (index, (token, slice)) in pool.token_list.iter().zip(slices).enumerate() {
        let bought = swap::convert(
            gateway,
            swap_asset,
            *token,
            slice,
            swap::min_amount_at(min_amounts_out, index),
        )?;
        token_balances.push(bought);
    }

    let mut totals = pool.stage();
    totals.debit_tokens(&record.token_balances)?;
    totals.credit_tokens(&token_balances)?;
    totals.sub_received(record.received_currency)?;
    totals.add_received(realized)?;

    let previous_received_currency = record.received_currency;
    record.received_currency = realized;
    record.token_balances = token_balances.clone();
    pool.commit(totals);

    Ok(RebalanceReceipt {
        previous_received_currency,
        received_currency: realized,
        token_balances,
        distribution: pool.distribution.clone(),
    })
}
