use anchor_lang::prelude::*;
use crate::constants::*;
use crate::events::{OwnershipTransferred, Paused, PoolParametersUpdated, Unpaused};
use crate::state::*;

/// Accounts shared by every owner-only control. Ownership itself is checked
/// by the pool methods so each failure surfaces in a fixed order.
#[derive(Accounts)]
pub struct UpdatePool<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub owner: Signer<'info>,
}

fn parameters_updated(pool: &Account<Pool>, parameter: &str) {
    emit!(PoolParametersUpdated {
        pool: pool.key(),
        parameter: parameter.to_string(),
    });
}

pub fn pause(ctx: Context<UpdatePool>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.pause(&ctx.accounts.owner.key())?;

    msg!("Pool {} paused", pool.name);
    emit!(Paused {
        pool: pool.key(),
        account: ctx.accounts.owner.key(),
    });
    Ok(())
}

pub fn unpause(ctx: Context<UpdatePool>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.unpause(&ctx.accounts.owner.key())?;

    msg!("Pool {} unpaused", pool.name);
    emit!(Unpaused {
        pool: pool.key(),
        account: ctx.accounts.owner.key(),
    });
    Ok(())
}

pub fn transfer_ownership(ctx: Context<UpdatePool>, new_owner: Pubkey) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous_owner = pool.transfer_ownership(&ctx.accounts.owner.key(), new_owner)?;

    msg!("Pool {} ownership: {} -> {}", pool.name, previous_owner, new_owner);
    emit!(OwnershipTransferred {
        pool: pool.key(),
        previous_owner,
        new_owner,
    });
    Ok(())
}

pub fn set_fee_address(ctx: Context<UpdatePool>, fee_address: Pubkey) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_fee_address(&ctx.accounts.owner.key(), fee_address)?;

    msg!("Fee address set to {}", fee_address);
    parameters_updated(pool, "fee_address");
    Ok(())
}

pub fn set_invest_fee(ctx: Context<UpdatePool>, invest_fee: u8) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_invest_fee(&ctx.accounts.owner.key(), invest_fee)?;

    msg!("Invest fee set to {}%", invest_fee);
    parameters_updated(pool, "invest_fee");
    Ok(())
}

pub fn set_success_fee(ctx: Context<UpdatePool>, success_fee: u8) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_success_fee(&ctx.accounts.owner.key(), success_fee)?;

    msg!("Success fee set to {}%", success_fee);
    parameters_updated(pool, "success_fee");
    Ok(())
}

pub fn set_min_investment_limit(ctx: Context<UpdatePool>, min_invest: u64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_min_investment_limit(&ctx.accounts.owner.key(), min_invest)?;

    msg!("Min investment set to {}", min_invest);
    parameters_updated(pool, "min_invest");
    Ok(())
}

pub fn set_pool_tokens_distributions(ctx: Context<UpdatePool>, distribution: Vec<u8>) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_pool_tokens_distributions(&ctx.accounts.owner.key(), distribution)?;

    msg!("Distribution set to {:?}", pool.distribution);
    parameters_updated(pool, "distribution");
    Ok(())
}
