use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::constants::*;
use crate::error::ErrorCode;
use crate::state::*;

#[derive(Accounts)]
pub struct OpenVault<'info> {
    #[account(
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        constraint = pool.vault_mints().contains(&mint.key()) @ ErrorCode::InvalidVaultMint
    )]
    pub mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = mint,
        associated_token::authority = pool
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn open_vault(ctx: Context<OpenVault>) -> Result<()> {
    msg!(
        "Vault ready: pool={}, mint={}, vault={}",
        ctx.accounts.pool.name,
        ctx.accounts.mint.key(),
        ctx.accounts.vault.key()
    );
    Ok(())
}

#[derive(Accounts)]
pub struct OpenInvestments<'info> {
    #[account(
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = investor,
        space = UserInvestments::space(0, pool.token_count()),
        seeds = [INVESTMENTS_SEED, pool.key().as_ref(), investor.key().as_ref()],
        bump
    )]
    pub user_investments: Account<'info, UserInvestments>,

    #[account(mut)]
    pub investor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn open_investments(ctx: Context<OpenInvestments>) -> Result<()> {
    let user_investments = &mut ctx.accounts.user_investments;
    if user_investments.owner == Pubkey::default() {
        user_investments.pool = ctx.accounts.pool.key();
        user_investments.owner = ctx.accounts.investor.key();
        user_investments.investments = Vec::new();
        user_investments.bump = ctx.bumps.user_investments;

        msg!("Investment list opened for {}", user_investments.owner);
    }
    Ok(())
}
