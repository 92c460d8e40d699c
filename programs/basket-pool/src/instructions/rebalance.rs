use anchor_lang::prelude::*;
use crate::constants::*;
use crate::events::{Rebalanced, ToggleRebalance};
use crate::ledger;
use crate::rebalancer;
use crate::router::RouterGateway;
use crate::state::*;

#[derive(Accounts)]
pub struct Rebalance<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: address fixed by seeds, contents read through `UserInvestments::load`
    #[account(
        mut,
        seeds = [INVESTMENTS_SEED, pool.key().as_ref(), investor.key().as_ref()],
        bump
    )]
    pub user_investments: UncheckedAccount<'info>,

    pub investor: Signer<'info>,

    /// CHECK: matched against the pool's router in `RouterGateway::new`
    pub swap_router: UncheckedAccount<'info>,
}

pub fn rebalance<'info>(
    ctx: Context<'_, '_, 'info, 'info, Rebalance<'info>>,
    investment_id: u64,
    min_amounts_out: Vec<u64>,
) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let pool_name = ctx.accounts.pool.name.clone();
    let bump = [ctx.accounts.pool.bump];
    let signer_seeds: &[&[u8]] = &[POOL_SEED, pool_name.as_bytes(), &bump];
    let signer = [signer_seeds];

    let mut gateway = RouterGateway::new(
        &ctx.accounts.pool,
        ctx.accounts.pool.to_account_info(),
        ctx.accounts.swap_router.to_account_info(),
        ctx.remaining_accounts,
        &signer,
        Clock::get()?.unix_timestamp,
    )?;

    let accounts = &mut *ctx.accounts;
    let mut user_investments = UserInvestments::load(&accounts.user_investments, ctx.program_id)?;
    let receipt = rebalancer::rebalance(
        &mut accounts.pool,
        &mut user_investments.investments,
        &mut gateway,
        investment_id,
        &min_amounts_out,
    )?;
    user_investments.store(&accounts.user_investments)?;

    msg!(
        "Rebalanced: user={}, index={}, received_currency {} -> {}",
        accounts.investor.key(),
        investment_id,
        receipt.previous_received_currency,
        receipt.received_currency
    );

    emit!(Rebalanced {
        pool: pool_key,
        user: accounts.investor.key(),
        investment_index: investment_id,
        token_balances: receipt.token_balances,
        distribution: receipt.distribution,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ToggleInvestmentRebalance<'info> {
    #[account(
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// CHECK: address fixed by seeds, contents read through `UserInvestments::load`
    #[account(
        mut,
        seeds = [INVESTMENTS_SEED, pool.key().as_ref(), investor.key().as_ref()],
        bump
    )]
    pub user_investments: UncheckedAccount<'info>,

    pub investor: Signer<'info>,
}

pub fn toggle_rebalance(ctx: Context<ToggleInvestmentRebalance>, investment_id: u64) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let mut user_investments = UserInvestments::load(&accounts.user_investments, ctx.program_id)?;
    let enabled = ledger::toggle_rebalance(&accounts.pool, &mut user_investments.investments, investment_id)?;
    user_investments.store(&accounts.user_investments)?;

    msg!(
        "Rebalance {} for investment {} of {}",
        if enabled { "enabled" } else { "disabled" },
        investment_id,
        accounts.investor.key()
    );

    emit!(ToggleRebalance {
        pool: accounts.pool.key(),
        user: accounts.investor.key(),
        investment_index: investment_id,
        enabled,
    });

    Ok(())
}
