use anchor_lang::prelude::*;
use crate::constants::*;
use crate::ledger;
use crate::state::*;

#[derive(Accounts)]
pub struct ReadPool<'info> {
    #[account(
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct ReadInvestments<'info> {
    #[account(
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        seeds = [INVESTMENTS_SEED, pool.key().as_ref(), owner.as_ref()],
        bump = user_investments.bump
    )]
    pub user_investments: Account<'info, UserInvestments>,
}

pub fn pool_data(ctx: Context<ReadPool>) -> Result<PoolData> {
    Ok(ctx.accounts.pool.pool_data())
}

pub fn pool_info(ctx: Context<ReadPool>) -> Result<PoolInfo> {
    Ok(ctx.accounts.pool.pool_info())
}

pub fn pool_tokens_distributions(ctx: Context<ReadPool>) -> Result<Vec<u8>> {
    Ok(ctx.accounts.pool.distribution.clone())
}

pub fn pool_tokens_balances(ctx: Context<ReadPool>) -> Result<Vec<u64>> {
    Ok(ctx.accounts.pool.pool_token_balances.clone())
}

pub fn token_list(ctx: Context<ReadPool>) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.pool.token_list.clone())
}

pub fn swap_router(ctx: Context<ReadPool>) -> Result<Pubkey> {
    Ok(ctx.accounts.pool.swap_router)
}

pub fn investment_by_user(
    ctx: Context<ReadInvestments>,
    _owner: Pubkey,
    investment_id: u64,
) -> Result<Investment> {
    ledger::investment_by_user(&ctx.accounts.user_investments.investments, investment_id).cloned()
}

/// Pages through an owner's records. Clients that need the whole history in
/// one read can fetch the `UserInvestments` account directly.
pub fn investments_by_user(
    ctx: Context<ReadInvestments>,
    _owner: Pubkey,
    offset: u64,
    limit: u64,
) -> Result<InvestmentsPage> {
    Ok(ledger::investments_page(
        &ctx.accounts.user_investments.investments,
        ctx.accounts.pool.token_count(),
        offset,
        limit,
    ))
}
