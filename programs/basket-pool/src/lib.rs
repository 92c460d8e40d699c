pub mod constants;
pub mod error;
pub mod events;
pub mod state;
pub mod policy;
pub mod guard;
pub mod swap;
pub mod router;
pub mod ledger;
pub mod rebalancer;
pub mod instructions;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod proptest_properties;

use anchor_lang::prelude::*;

pub use state::*;
pub use instructions::*;

declare_id!("4W2ppPUbHukxR2RytmWmxMYvRmeiQNz5W77cfiNvEFvf");

#[program]
pub mod basket_pool {
    use super::*;

    pub fn initialize_pool(ctx: Context<InitializePool>, config: PoolConfig) -> Result<()> {
        instructions::initialize_pool(ctx, config)
    }

    pub fn open_vault(ctx: Context<OpenVault>) -> Result<()> {
        instructions::open_vault(ctx)
    }

    pub fn open_investments(ctx: Context<OpenInvestments>) -> Result<()> {
        instructions::open_investments(ctx)
    }

    pub fn invest<'info>(
        ctx: Context<'_, '_, 'info, 'info, Invest<'info>>,
        amount: u64,
        attached_value: u64,
        min_amounts_out: Vec<u64>,
    ) -> Result<()> {
        instructions::invest(ctx, amount, attached_value, min_amounts_out)
    }

    pub fn rebalance<'info>(
        ctx: Context<'_, '_, 'info, 'info, Rebalance<'info>>,
        investment_id: u64,
        min_amounts_out: Vec<u64>,
    ) -> Result<()> {
        instructions::rebalance(ctx, investment_id, min_amounts_out)
    }

    pub fn toggle_rebalance(ctx: Context<ToggleInvestmentRebalance>, investment_id: u64) -> Result<()> {
        instructions::toggle_rebalance(ctx, investment_id)
    }

    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        investment_id: u64,
        min_amounts_out: Vec<u64>,
    ) -> Result<()> {
        instructions::withdraw(ctx, investment_id, min_amounts_out)
    }

    pub fn pause(ctx: Context<UpdatePool>) -> Result<()> {
        instructions::pause(ctx)
    }

    pub fn unpause(ctx: Context<UpdatePool>) -> Result<()> {
        instructions::unpause(ctx)
    }

    pub fn transfer_ownership(ctx: Context<UpdatePool>, new_owner: Pubkey) -> Result<()> {
        instructions::transfer_ownership(ctx, new_owner)
    }

    pub fn set_fee_address(ctx: Context<UpdatePool>, fee_address: Pubkey) -> Result<()> {
        instructions::set_fee_address(ctx, fee_address)
    }

    pub fn set_invest_fee(ctx: Context<UpdatePool>, invest_fee: u8) -> Result<()> {
        instructions::set_invest_fee(ctx, invest_fee)
    }

    pub fn set_success_fee(ctx: Context<UpdatePool>, success_fee: u8) -> Result<()> {
        instructions::set_success_fee(ctx, success_fee)
    }

    pub fn set_min_investment_limit(ctx: Context<UpdatePool>, min_invest: u64) -> Result<()> {
        instructions::set_min_investment_limit(ctx, min_invest)
    }

    pub fn set_pool_tokens_distributions(ctx: Context<UpdatePool>, distribution: Vec<u8>) -> Result<()> {
        instructions::set_pool_tokens_distributions(ctx, distribution)
    }

    pub fn pool_data(ctx: Context<ReadPool>) -> Result<PoolData> {
        instructions::pool_data(ctx)
    }

    pub fn pool_info(ctx: Context<ReadPool>) -> Result<PoolInfo> {
        instructions::pool_info(ctx)
    }

    pub fn pool_tokens_distributions(ctx: Context<ReadPool>) -> Result<Vec<u8>> {
        instructions::pool_tokens_distributions(ctx)
    }

    pub fn pool_tokens_balances(ctx: Context<ReadPool>) -> Result<Vec<u64>> {
        instructions::pool_tokens_balances(ctx)
    }

    pub fn token_list(ctx: Context<ReadPool>) -> Result<Vec<Pubkey>> {
        instructions::token_list(ctx)
    }

    pub fn swap_router(ctx: Context<ReadPool>) -> Result<Pubkey> {
        instructions::swap_router(ctx)
    }

    pub fn investment_by_user(
        ctx: Context<ReadInvestments>,
        owner: Pubkey,
        investment_id: u64,
    ) -> Result<Investment> {
        instructions::investment_by_user(ctx, owner, investment_id)
    }

    pub fn investments_by_user(
        ctx: Context<ReadInvestments>,
        owner: Pubkey,
        offset: u64,
        limit: u64,
    ) -> Result<InvestmentsPage> {
        instructions::investments_by_user(ctx, owner, offset, limit)
    }
}
