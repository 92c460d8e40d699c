//! Per-owner investment records and the pool aggregates they feed.
//!
//! Every operation reads the pool, runs its swaps, stages the new aggregates
//! in a [`PoolTotals`](crate::state::PoolTotals) and only then writes both the
//! record and the pool. An error anywhere before the commit leaves both
//! untouched, and the transaction revert covers the token movements.

use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::policy;
use crate::state::{Investment, InvestmentsPage, Pool};
use crate::swap::{self, SwapGateway};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvestReceipt {
    pub investment_index: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub token_balances: Vec<u64>,
    pub distribution: Vec<u8>,
    pub input_is_native_token: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub gross_out: u64,
    pub success_fee: u64,
    pub payout: u64,
    pub received_currency: u64,
    pub input_is_native_token: bool,
}

/// Record addressed by a mutating operation.
pub fn investment_slot(investments: &mut [Investment], investment_id: u64) -> Result<&mut Investment> {
    usize::try_from(investment_id)
        .ok()
        .and_then(move |index| investments.get_mut(index))
        .ok_or_else(|| error!(ErrorCode::InvestmentNonExists))
}

/// Read accessor; an index past the owner's history is a bounds fault.
pub fn investment_by_user(investments: &[Investment], investment_id: u64) -> Result<&Investment> {
    usize::try_from(investment_id)
        .ok()
        .and_then(|index| investments.get(index))
        .ok_or_else(|| error!(ErrorCode::InvestmentIndexOutOfBounds))
}

/// Records `offset..offset + limit` of an owner's history, clamped to what a
/// single view can return. Active and withdrawn records are both listed.
pub fn investments_page(
    investments: &[Investment],
    token_count: usize,
    offset: u64,
    limit: u64,
) -> InvestmentsPage {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(investments.len());
    let len = usize::try_from(limit)
        .unwrap_or(usize::MAX)
        .min(InvestmentsPage::max_len(token_count));
    let end = start.saturating_add(len).min(investments.len());

    InvestmentsPage {
        total: investments.len() as u64,
        offset: start as u64,
        investments: investments[start..end].to_vec(),
    }
}

pub fn invest<G: SwapGateway + ?Sized>(
    pool: &mut Pool,
    investments: &mut Vec<Investment>,
    gateway: &mut G,
    amount: u64,
    attached_value: u64,
    min_amounts_out: &[u64],
) -> Result<InvestReceipt> {
    let quote = pool.quote_invest(amount, attached_value)?;
    swap::validate_min_amounts(min_amounts_out, pool.token_count())?;

    let swap_asset = pool.swap_asset();
    let slices = policy::allocate(quote.net_amount, &pool.distribution)?;
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
    totals.credit_tokens(&token_balances)?;
    totals.add_received(quote.net_amount)?;
    totals.total_invest_fee = totals
        .total_invest_fee
        .checked_add(quote.fee)
        .ok_or(ErrorCode::MathOverflow)?;

    let investment_index = investments.len() as u64;
    investments.push(Investment::new(
        quote.net_amount,
        token_balances.clone(),
        quote.input_is_native_token,
    ));
    pool.commit(totals);

    Ok(InvestReceipt {
        investment_index,
        fee: quote.fee,
        net_amount: quote.net_amount,
        token_balances,
        distribution: pool.distribution.clone(),
        input_is_native_token: quote.input_is_native_token,
    })
}

/// Flips the record's rebalance switch and returns the new state.
pub fn toggle_rebalance(pool: &Pool, investments: &mut [Investment], investment_id: u64) -> Result<bool> {
    let record = investment_slot(investments, investment_id)?;
    require!(record.active, ErrorCode::InvestmentNotActive);
    pool.when_not_paused()?;

    record.rebalance_enabled = !record.rebalance_enabled;
    Ok(record.rebalance_enabled)
}

/// Sells the whole basket back into the swap asset and closes the record.
/// Open while paused so holders can always exit.
pub fn withdraw<G: SwapGateway + ?Sized>(
    pool: &mut Pool,
    investments: &mut [Investment],
    gateway: &mut G,
    investment_id: u64,
    min_amounts_out: &[u64],
) -> Result<WithdrawReceipt> {
    let record = investment_slot(investments, investment_id)?;
    require!(record.active, ErrorCode::InvestmentNotActive);
    swap::validate_min_amounts(min_amounts_out, pool.token_count())?;

    let swap_asset = pool.swap_asset();
    let mut gross_out: u64 = 0;
    for (index, (token, balance)) in pool.token_list.iter().zip(&record.token_balances).enumerate() {
        let proceeds = swap::convert(
            gateway,
            *token,
            swap_asset,
            *balance,
            swap::min_amount_at(min_amounts_out, index),
        )?;
        gross_out = gross_out.checked_add(proceeds).ok_or(ErrorCode::MathOverflow)?;
    }

    let success_fee = pool.success_fee_for(gross_out, record.received_currency)?;
    let payout = gross_out.checked_sub(success_fee).ok_or(ErrorCode::MathOverflow)?;

    let mut totals = pool.stage();
    totals.debit_tokens(&record.token_balances)?;
    totals.sub_received(record.received_currency)?;
    totals.total_success_fee = totals
        .total_success_fee
        .checked_add(success_fee)
        .ok_or(ErrorCode::MathOverflow)?;

    record.active = false;
    record.token_balances.iter_mut().for_each(|balance| *balance = 0);
    pool.commit(totals);

    Ok(WithdrawReceipt {
        gross_out,
        success_fee,
        payout,
        received_currency: record.received_currency,
        input_is_native_token: record.input_is_native_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NATIVE_ASSET;
    use crate::testing::*;

    fn invested() -> (Pool, Vec<Investment>, MockRouter) {
        let mut pool = pool_fixture();
        let mut investments = Vec::new();
        let mut router = MockRouter::new();
        invest(&mut pool, &mut investments, &mut router, 100_000, 0, &[]).unwrap();
        (pool, investments, router)
    }

    #[test]
    fn test_invest_splits_net_by_distribution() {
        let (pool, investments, router) = invested();

        assert_eq!(investments.len(), 1);
        let record = &investments[0];
        assert!(record.active);
        assert!(record.rebalance_enabled);
        assert!(!record.input_is_native_token);
        assert_eq!(record.received_currency, 90_000);
        assert_eq!(record.token_balances, vec![45_000, 22_500, 22_500]);

        assert_eq!(pool.pool_token_balances, vec![45_000, 22_500, 22_500]);
        assert_eq!(pool.total_received_currency, 90_000);
        assert_eq!(pool.total_invest_fee, 10_000);
        assert_eq!(router.calls.len(), 3);
        assert!(router.calls.iter().all(|call| call.token_in == entry_mint()));
    }

    #[test]
    fn test_invest_receipt_and_indices() {
        let (mut pool, mut investments, mut router) = invested();
        router.set_price(token_a(), 2 * PRICE_SCALE);

        let receipt = invest(&mut pool, &mut investments, &mut router, 1_000, 0, &[]).unwrap();
        assert_eq!(receipt.investment_index, 1);
        assert_eq!(receipt.fee, 100);
        assert_eq!(receipt.net_amount, 900);
        assert_eq!(receipt.token_balances, vec![225, 225, 225]);
        assert_eq!(receipt.distribution, vec![50, 25, 25]);
        assert_eq!(pool.pool_token_balances, vec![45_225, 22_725, 22_725]);
    }

    #[test]
    fn test_invest_rejections_leave_state_unchanged() {
        let (mut pool, mut investments, mut router) = invested();
        pool.min_invest = 1_000;
        let before = pool.clone();

        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 10, 0, &[]),
            ErrorCode::AmountTooSmall,
        );
        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 1_000, 1_000, &[]),
            ErrorCode::WrongValue,
        );
        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 1_000, 0, &[1, 2]),
            ErrorCode::InvalidMinAmounts,
        );
        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 1_000, 0, &[0, 0, 1_000]),
            ErrorCode::SlippageExceeded,
        );

        pool.paused = true;
        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 1_000, 0, &[]),
            ErrorCode::Paused,
        );
        pool.paused = false;

        assert_eq!(pool, before);
        assert_eq!(investments.len(), 1);
    }

    #[test]
    fn test_failed_swap_rolls_back_invest() {
        let (mut pool, mut investments, mut router) = invested();
        let before = pool.clone();
        router.fail_on(token_c());

        assert_fails_with(
            invest(&mut pool, &mut investments, &mut router, 50_000, 0, &[]),
            ErrorCode::InvalidSwapSettlement,
        );
        assert_eq!(pool, before);
        assert_eq!(investments.len(), 1);
    }

    #[test]
    fn test_native_invest_marks_record() {
        let mut pool = native_pool_fixture(NATIVE_ASSET);
        let mut investments = Vec::new();
        let mut router = MockRouter::new();

        invest(&mut pool, &mut investments, &mut router, 10_000, 10_000, &[]).unwrap();
        assert!(investments[0].input_is_native_token);
        assert!(router.calls.iter().all(|call| call.token_in == wrapped_native_mint()));
    }

    #[test]
    fn test_withdraw_charges_success_fee_on_profit() {
        let (mut pool, mut investments, mut router) = invested();
        router.set_price(token_a(), 2 * PRICE_SCALE);

        let receipt = withdraw(&mut pool, &mut investments, &mut router, 0, &[]).unwrap();
        assert_eq!(receipt.gross_out, 135_000);
        assert_eq!(receipt.success_fee, 4_500);
        assert_eq!(receipt.payout, 130_500);
        assert_eq!(receipt.received_currency, 90_000);

        assert!(!investments[0].active);
        assert_eq!(investments[0].token_balances, vec![0, 0, 0]);
        assert_eq!(pool.pool_token_balances, vec![0, 0, 0]);
        assert_eq!(pool.total_received_currency, 0);
        assert_eq!(pool.total_success_fee, 4_500);
    }

    #[test]
    fn test_withdraw_at_loss_owes_no_fee() {
        let (mut pool, mut investments, mut router) = invested();
        router.set_price(token_a(), PRICE_SCALE / 2);

        let receipt = withdraw(&mut pool, &mut investments, &mut router, 0, &[]).unwrap();
        assert_eq!(receipt.gross_out, 67_500);
        assert_eq!(receipt.success_fee, 0);
        assert_eq!(receipt.payout, 67_500);
        assert_eq!(pool.total_success_fee, 0);
    }

    #[test]
    fn test_withdraw_allowed_while_paused_and_only_once() {
        let (mut pool, mut investments, mut router) = invested();
        pool.pause(&owner()).unwrap();

        withdraw(&mut pool, &mut investments, &mut router, 0, &[]).unwrap();
        assert_fails_with(
            withdraw(&mut pool, &mut investments, &mut router, 0, &[]),
            ErrorCode::InvestmentNotActive,
        );
        pool.unpause(&owner()).unwrap();
        assert_fails_with(
            toggle_rebalance(&pool, &mut investments, 0),
            ErrorCode::InvestmentNotActive,
        );
    }

    #[test]
    fn test_withdraw_keeps_other_records() {
        let (mut pool, mut investments, mut router) = invested();
        invest(&mut pool, &mut investments, &mut router, 20_000, 0, &[]).unwrap();

        withdraw(&mut pool, &mut investments, &mut router, 0, &[]).unwrap();
        assert_eq!(pool.pool_token_balances, investments[1].token_balances);
        assert_eq!(pool.total_received_currency, 18_000);
        assert!(investments[1].active);
    }

    #[test]
    fn test_withdraw_slippage_floor_reverts() {
        let (mut pool, mut investments, mut router) = invested();
        let before = pool.clone();

        assert_fails_with(
            withdraw(&mut pool, &mut investments, &mut router, 0, &[45_001, 0, 0]),
            ErrorCode::SlippageExceeded,
        );
        assert_eq!(pool, before);
        assert!(investments[0].active);
    }

    #[test]
    fn test_toggle_rebalance_flips() {
        let (mut pool, mut investments, _) = invested();

        assert!(!toggle_rebalance(&pool, &mut investments, 0).unwrap());
        assert!(!investments[0].rebalance_enabled);
        assert!(toggle_rebalance(&pool, &mut investments, 0).unwrap());

        pool.pause(&owner()).unwrap();
        assert_fails_with(toggle_rebalance(&pool, &mut investments, 0), ErrorCode::Paused);
    }

    #[test]
    fn test_missing_index_vs_out_of_bounds() {
        let (mut pool, mut investments, mut router) = invested();

        assert_fails_with(toggle_rebalance(&pool, &mut investments, 1), ErrorCode::InvestmentNonExists);
        assert_fails_with(
            withdraw(&mut pool, &mut investments, &mut router, u64::MAX, &[]),
            ErrorCode::InvestmentNonExists,
        );
        assert_fails_with(investment_by_user(&investments, 1), ErrorCode::InvestmentIndexOutOfBounds);
        assert_eq!(investment_by_user(&investments, 0).unwrap().received_currency, 90_000);
    }

    #[test]
    fn test_investments_page_fits_return_data() {
        let (mut pool, mut investments, mut router) = invested();
        for _ in 0..29 {
            invest(&mut pool, &mut investments, &mut router, 1_000, 0, &[]).unwrap();
        }
        withdraw(&mut pool, &mut investments, &mut router, 0, &[]).unwrap();

        let page = investments_page(&investments, pool.token_count(), 0, u64::MAX);
        assert_eq!(page.total, 30);
        assert_eq!(page.investments.len(), InvestmentsPage::max_len(3));
        assert!(!page.investments[0].active);
        let mut encoded = Vec::new();
        AnchorSerialize::serialize(&page, &mut encoded).unwrap();
        assert!(encoded.len() <= crate::constants::MAX_RETURN_DATA_LEN);

        let rest = investments_page(&investments, pool.token_count(), 25, 10);
        assert_eq!(rest.offset, 25);
        assert_eq!(rest.investments, investments[25..].to_vec());

        let past_end = investments_page(&investments, pool.token_count(), u64::MAX, 10);
        assert_eq!((past_end.total, past_end.offset), (30, 30));
        assert!(past_end.investments.is_empty());
    }

    #[test]
    fn test_investments_page_with_widest_pool() {
        let record = Investment::new(1, vec![u64::MAX; crate::constants::MAX_POOL_TOKENS], true);
        let investments = vec![record; 40];

        let page = investments_page(&investments, crate::constants::MAX_POOL_TOKENS, 3, 40);
        assert_eq!(page.investments.len(), 12);
        let mut encoded = Vec::new();
        AnchorSerialize::serialize(&page, &mut encoded).unwrap();
        assert!(encoded.len() <= crate::constants::MAX_RETURN_DATA_LEN);
    }
}
