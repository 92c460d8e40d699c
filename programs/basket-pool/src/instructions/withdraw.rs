use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, Mint, Token, TokenAccount};
use crate::constants::*;
use crate::error::ErrorCode;
use crate::events::InvestmentWithdrawal;
use crate::ledger::{self, WithdrawReceipt};
use crate::router::RouterGateway;
use crate::state::*;

#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    #[account(mut)]
    pub investor: Signer<'info>,

    /// Receives token payouts. Unused for native payouts.
    #[account(mut)]
    pub investor_token_account: Option<Account<'info, TokenAccount>>,

    /// Fee address's token account for the swap asset. Unused for native payouts.
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

    /// Wrapped native mint, required for native payouts.
    pub native_mint: Option<Account<'info, Mint>>,

    /// CHECK: transient unwrap account, derived and created in the handler
    #[account(mut)]
    pub unwrap_account: Option<UncheckedAccount<'info>>,

    /// CHECK: matched against the pool's router in `RouterGateway::new`
    pub swap_router: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn withdraw<'info>(
    ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
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
    let receipt = ledger::withdraw(
        &mut accounts.pool,
        &mut user_investments.investments,
        &mut gateway,
        investment_id,
        &min_amounts_out,
    )?;
    user_investments.store(&accounts.user_investments)?;

    if receipt.input_is_native_token {
        pay_native(accounts, &receipt, &signer, ctx.program_id)?;
    } else {
        pay_tokens(accounts, &receipt, &signer)?;
    }

    msg!(
        "Withdrawn: user={}, index={}, gross={}, success_fee={}, payout={}",
        accounts.investor.key(),
        investment_id,
        receipt.gross_out,
        receipt.success_fee,
        receipt.payout
    );

    emit!(InvestmentWithdrawal {
        pool: pool_key,
        user: accounts.investor.key(),
        payout: receipt.payout,
        investment_index: investment_id,
    });

    Ok(())
}

fn pay_tokens(accounts: &Withdraw, receipt: &WithdrawReceipt, signer: &[&[&[u8]]]) -> Result<()> {
    let swap_asset = accounts.pool.swap_asset();
    let destination = accounts
        .investor_token_account
        .as_ref()
        .ok_or(ErrorCode::MissingTokenAccount)?;
    require_keys_eq!(destination.mint, swap_asset, ErrorCode::InvalidVaultMint);
    require_keys_eq!(destination.owner, accounts.investor.key(), ErrorCode::MissingTokenAccount);

    token::transfer(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            token::Transfer {
                from: accounts.entry_vault.to_account_info(),
                to: destination.to_account_info(),
                authority: accounts.pool.to_account_info(),
            },
            signer,
        ),
        receipt.payout,
    )?;

    if receipt.success_fee > 0 {
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
            CpiContext::new_with_signer(
                accounts.token_program.to_account_info(),
                token::Transfer {
                    from: accounts.entry_vault.to_account_info(),
                    to: fee_account.to_account_info(),
                    authority: accounts.pool.to_account_info(),
                },
                signer,
            ),
            receipt.success_fee,
        )?;
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnwrapFunding {
    Create { lamports: u64 },
    /// Someone already sent lamports to the address. Fund the shortfall and
    /// take the account over instead of creating it.
    Adopt { top_up: u64 },
}

fn unwrap_funding(current_lamports: u64, rent_minimum: u64) -> UnwrapFunding {
    if current_lamports == 0 {
        UnwrapFunding::Create { lamports: rent_minimum }
    } else {
        UnwrapFunding::Adopt {
            top_up: rent_minimum.saturating_sub(current_lamports),
        }
    }
}

/// Moves the gross proceeds into a fresh wrapped-native account owned by the
/// pool and closes it into the investor, who then forwards the success fee.
fn pay_native(
    accounts: &Withdraw,
    receipt: &WithdrawReceipt,
    signer: &[&[&[u8]]],
    program_id: &Pubkey,
) -> Result<()> {
    let native_mint = accounts
        .native_mint
        .as_ref()
        .ok_or(ErrorCode::MissingNativeMint)?;
    require_keys_eq!(native_mint.key(), accounts.pool.swap_asset(), ErrorCode::MissingNativeMint);
    let unwrap_account = accounts
        .unwrap_account
        .as_ref()
        .ok_or(ErrorCode::InvalidUnwrapAccount)?;

    let pool_key = accounts.pool.key();
    let investor_key = accounts.investor.key();
    let (expected, unwrap_bump) = Pubkey::find_program_address(
        &[UNWRAP_SEED, pool_key.as_ref(), investor_key.as_ref()],
        program_id,
    );
    require_keys_eq!(unwrap_account.key(), expected, ErrorCode::InvalidUnwrapAccount);

    let unwrap_seeds: &[&[u8]] = &[
        UNWRAP_SEED,
        pool_key.as_ref(),
        investor_key.as_ref(),
        &[unwrap_bump],
    ];
    let rent_minimum = Rent::get()?.minimum_balance(TokenAccount::LEN);
    match unwrap_funding(unwrap_account.lamports(), rent_minimum) {
        UnwrapFunding::Create { lamports } => {
            system_program::create_account(
                CpiContext::new_with_signer(
                    accounts.system_program.to_account_info(),
                    system_program::CreateAccount {
                        from: accounts.investor.to_account_info(),
                        to: unwrap_account.to_account_info(),
                    },
                    &[unwrap_seeds],
                ),
                lamports,
                TokenAccount::LEN as u64,
                &accounts.token_program.key(),
            )?;
        }
        UnwrapFunding::Adopt { top_up } => {
            if top_up > 0 {
                system_program::transfer(
                    CpiContext::new(
                        accounts.system_program.to_account_info(),
                        system_program::Transfer {
                            from: accounts.investor.to_account_info(),
                            to: unwrap_account.to_account_info(),
                        },
                    ),
                    top_up,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    accounts.system_program.to_account_info(),
                    system_program::Allocate {
                        account_to_allocate: unwrap_account.to_account_info(),
                    },
                    &[unwrap_seeds],
                ),
                TokenAccount::LEN as u64,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    accounts.system_program.to_account_info(),
                    system_program::Assign {
                        account_to_assign: unwrap_account.to_account_info(),
                    },
                    &[unwrap_seeds],
                ),
                &accounts.token_program.key(),
            )?;
        }
    }

    token::initialize_account3(CpiContext::new(
        accounts.token_program.to_account_info(),
        token::InitializeAccount3 {
            account: unwrap_account.to_account_info(),
            mint: native_mint.to_account_info(),
            authority: accounts.pool.to_account_info(),
        },
    ))?;

    token::transfer(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            token::Transfer {
                from: accounts.entry_vault.to_account_info(),
                to: unwrap_account.to_account_info(),
                authority: accounts.pool.to_account_info(),
            },
            signer,
        ),
        receipt.gross_out,
    )?;

    token::close_account(CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        token::CloseAccount {
            account: unwrap_account.to_account_info(),
            destination: accounts.investor.to_account_info(),
            authority: accounts.pool.to_account_info(),
        },
        signer,
    ))?;

    if receipt.success_fee > 0 {
        system_program::transfer(
            CpiContext::new(
                accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: accounts.investor.to_account_info(),
                    to: accounts.fee_recipient.to_account_info(),
                },
            ),
            receipt.success_fee,
        )?;
    }

    Ok(())
}
