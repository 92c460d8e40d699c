//! CPI rendition of the swap gateway. Every swap is an exact-input call into
//! the pool's router program, signed by the pool PDA, settling between two
//! of the pool's vaults. The realized output is read back from the vault.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::TokenAccount;

use crate::error::ErrorCode;
use crate::state::Pool;
use crate::swap::{SwapGateway, SwapRequest};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RouterSwapArgs {
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub amount_in: u64,
    pub recipient: Pubkey,
    pub deadline: i64,
    pub min_amount_out: u64,
}

pub fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

pub fn instruction_data(args: &RouterSwapArgs) -> Result<Vec<u8>> {
    let mut data = sighash("swap").to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(ErrorCode::InvalidSwapSettlement))?;
    Ok(data)
}

fn read_token_amount(info: &AccountInfo) -> Result<u64> {
    let data = info.try_borrow_data()?;
    let mut data_slice: &[u8] = &data;
    let account = TokenAccount::try_deserialize(&mut data_slice)
        .map_err(|_| ErrorCode::InvalidVault)?;
    Ok(account.amount)
}

pub struct RouterGateway<'a, 'info> {
    router: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    vaults: Vec<(Pubkey, AccountInfo<'info>)>,
    route_accounts: &'a [AccountInfo<'info>],
    signer_seeds: &'a [&'a [&'a [u8]]],
    deadline: i64,
}

impl<'a, 'info> RouterGateway<'a, 'info> {
    /// `remaining_accounts` must start with the pool's vaults in
    /// [`Pool::vault_mints`] order; whatever follows is handed to the router.
    pub fn new(
        pool: &Pool,
        pool_info: AccountInfo<'info>,
        router: AccountInfo<'info>,
        remaining_accounts: &'a [AccountInfo<'info>],
        signer_seeds: &'a [&'a [&'a [u8]]],
        now: i64,
    ) -> Result<Self> {
        require_keys_eq!(router.key(), pool.swap_router, ErrorCode::InvalidSwapRouter);
        require!(router.executable, ErrorCode::InvalidSwapRouter);

        let mints = pool.vault_mints();
        require!(
            remaining_accounts.len() >= mints.len(),
            ErrorCode::InvalidRemainingAccounts
        );
        let (vault_infos, route_accounts) = remaining_accounts.split_at(mints.len());

        let mut vaults = Vec::with_capacity(mints.len());
        for (mint, info) in mints.into_iter().zip(vault_infos) {
            let expected = get_associated_token_address(&pool_info.key(), &mint);
            require_keys_eq!(info.key(), expected, ErrorCode::InvalidVault);
            require!(info.is_writable, ErrorCode::InvalidVault);
            vaults.push((mint, info.clone()));
        }

        Ok(RouterGateway {
            router,
            pool: pool_info,
            vaults,
            route_accounts,
            signer_seeds,
            deadline: now
                .checked_add(crate::constants::SWAP_DEADLINE_SECS)
                .ok_or(ErrorCode::MathOverflow)?,
        })
    }

    fn vault(&self, mint: &Pubkey) -> Result<&AccountInfo<'info>> {
        self.vaults
            .iter()
            .find(|(vault_mint, _)| vault_mint == mint)
            .map(|(_, info)| info)
            .ok_or_else(|| error!(ErrorCode::InvalidVault))
    }
}

impl SwapGateway for RouterGateway<'_, '_> {
    fn swap(&mut self, request: &SwapRequest) -> Result<u64> {
        let vault_in = self.vault(&request.token_in)?.clone();
        let vault_out = self.vault(&request.token_out)?.clone();

        let in_before = read_token_amount(&vault_in)?;
        let out_before = read_token_amount(&vault_out)?;

        let args = RouterSwapArgs {
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in: request.amount_in,
            recipient: vault_out.key(),
            deadline: self.deadline,
            min_amount_out: request.min_amount_out,
        };

        let mut accounts = vec![
            AccountMeta::new_readonly(self.pool.key(), true),
            AccountMeta::new(vault_in.key(), false),
            AccountMeta::new(vault_out.key(), false),
        ];
        let mut infos = vec![
            self.router.clone(),
            self.pool.clone(),
            vault_in.clone(),
            vault_out.clone(),
        ];
        for acc in self.route_accounts.iter() {
            accounts.push(AccountMeta {
                pubkey: *acc.key,
                is_signer: acc.is_signer,
                is_writable: acc.is_writable,
            });
            infos.push(acc.clone());
        }

        invoke_signed(
            &Instruction {
                program_id: self.router.key(),
                accounts,
                data: instruction_data(&args)?,
            },
            &infos,
            self.signer_seeds,
        )?;

        let in_after = read_token_amount(&vault_in)?;
        let out_after = read_token_amount(&vault_out)?;

        settle(request, in_before, in_after, out_before, out_after)
    }
}

/// Checks the vault balances observed around a router call and returns the
/// realized output, which is the growth of the output vault.
pub fn settle(
    request: &SwapRequest,
    in_before: u64,
    in_after: u64,
    out_before: u64,
    out_after: u64,
) -> Result<u64> {
    let spent = in_before
        .checked_sub(in_after)
        .ok_or(ErrorCode::InvalidSwapSettlement)?;
    require!(spent <= request.amount_in, ErrorCode::InvalidSwapSettlement);
    let received = out_after
        .checked_sub(out_before)
        .ok_or(ErrorCode::InvalidSwapSettlement)?;
    require!(received >= request.min_amount_out, ErrorCode::SlippageExceeded);

    msg!(
        "Swapped {} {} for {} {}",
        spent,
        request.token_in,
        received,
        request.token_out
    );
    Ok(received)
}
