use anchor_lang::prelude::*;
use crate::constants::*;
use crate::state::*;

#[derive(Accounts)]
#[instruction(config: PoolConfig)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = owner,
        space = Pool::space(),
        seeds = [POOL_SEED, config.name.as_bytes()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_pool(ctx: Context<InitializePool>, config: PoolConfig) -> Result<()> {
    let mut pool = Pool::new(ctx.accounts.owner.key(), config)?;
    pool.bump = ctx.bumps.pool;

    msg!(
        "Pool initialized: name={}, owner={}, tokens={}, invest_fee={}%, success_fee={}%",
        pool.name,
        pool.owner,
        pool.token_count(),
        pool.invest_fee,
        pool.success_fee
    );

    ctx.accounts.pool.set_inner(pool);
    Ok(())
}
