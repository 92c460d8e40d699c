use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, Token, TokenAccount};
use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::Invested;
use crate::ledger;
use crate::router::RouterGateway;
use crate::state::*;

#[derive(Accounts)]
pub struct Invest<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.name.as_bytes()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [INVESTMENTS_SEED, pool.key().as_ref(), investor.key().as_ref()],
        bump = user_investments.bump,
        realloc = UserInvestments::space(user_investments.investments.len() + 1, pool.token_count()),
        realloc::payer = investor,
        realloc::zero = false
    )]
    pub user_investments: Account<'info, UserInvestments>,

    #[account(mut)]
    pub investor: Signer<'info>,

    /// Source of token deposits. Unused for native deposits.
    #[account(mut)]
    pub investor_token_account: Option<Account<'info, TokenAccount>>,

    /// Fee address's token account for the swap asset. Unused for native deposits.
    #[account(mut)]
    pub fee_token_account: Option<Account<'info, TokenAccount>>,

    /// CHECK: pinned to the pool's fee address, only ever credited lamports
    #[account(mut, address = pool.fee_address @ ErrorCode::InvalidFeeRecipient)]
    pub fee_recipient: UncheckedAccount<'info>,

    #[account(
        mut,
        address = get_associated_token_address(&pool.key(), &pool.swap_asset()) @ ErrorCode::InvalidVault
    )]
    pub entry_vault: Account<'info, TokenAccount>,

    /// CHECK: matched against the pool's router in `RouterGateway::new`
    pub swap_router: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn invest<'info>(
    ctx: Context<'_, '_, 'info, 'info, Invest<'info>>,
    amount: u64,
    attached_value: u64,
    min_amounts_out: Vec<u64>,
) -> Result<()> {
    let quote = ctx.accounts.pool.quote_invest(amount, attached_value)?;

    if quote.input_is_native_token {
        wrap_native_deposit(&ctx.accounts, quote.fee, quote.net_amount)?;
    } else {
        transfer_token_deposit(&ctx.accounts, quote.fee, quote.net_amount)?;
    }

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
    let receipt = ledger::invest(
        &mut accounts.pool,
        &mut accounts.user_investments.investments,
        &mut gateway,
        amount,
        attached_value,
        &min_amounts_out,
    )?;

    msg!(
        "Invested: user={}, index={}, amount={}, fee={}, net={}, native={}",
        accounts.investor.key(),
        receipt.investment_index,
        amount,
        receipt.fee,
        receipt.net_amount,
        receipt.input_is_native_token
    );

    emit!(Invested {
        pool: pool_key,
        user: accounts.investor.key(),
        net_amount: receipt.net_amount,
        investment_index: receipt.investment_index,
        distribution: receipt.distribution,
    });

    Ok(())
}

/// Fee goes out as lamports; the net amount is wrapped in the pool's vault.
fn wrap_native_deposit(accounts: &Invest, fee: u64, net_amount: u64) -> Result<()> {
    if fee > 0 {
        system_program::transfer(
            CpiContext::new(
                accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: accounts.investor.to_account_info(),
                    to: accounts.fee_recipient.to_account_info(),
                },
            ),
            fee,
        )?;
    }

    system_program::transfer(
        CpiContext::new(
            accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: accounts.investor.to_account_info(),
                to: accounts.entry_vault.to_account_info(),
            },
        ),
        net_amount,
    )?;

    token::sync_native(CpiContext::new(
        accounts.token_program.to_account_info(),
        token::SyncNative {
            account: accounts.entry_vault.to_account_info(),
        },
    ))
}

fn transfer_token_deposit(accounts: &Invest, fee: u64, net_amount: u64) -> Result<()> {
    let swap_asset = accounts.pool.swap_asset();
    let source = accounts
        .investor_token_account
        .as_ref()
        .ok_or(ErrorCode::MissingTokenAccount)?;
    require_keys_eq!(source.mint, swap_asset, ErrorCode::InvalidVaultMint);
    require_keys_eq!(source.owner, accounts.investor.key(), ErrorCode::MissingTokenAccount);

    if fee > 0 {
        let fee_account = accounts
            .fee_token_account
            .as_ref()
            .ok_or(ErrorCode::MissingTokenAccount)?;
        require_keys_eq!(
            fee_account.key(),
            get_associated_token_address(&accounts.pool.fee_address, &swap_asset),
            ErrorCode::InvalidFeeRecipient
        );

        token::transfer(
            CpiContext::new(
                accounts.token_program.to_account_info(),
                token::Transfer {
                    from: source.to_account_info(),
                    to: fee_account.to_account_info(),
                    authority: accounts.investor.to_account_info(),
                },
            ),
            fee,
        )?;
    }

    token::transfer(
        CpiContext::new(
            accounts.token_program.to_account_info(),
            token::Transfer {
                from: source.to_account_info(),
                to: accounts.entry_vault.to_account_info(),
                authority: accounts.investor.to_account_info(),
            },
        ),
        net_amount,
    )
}
