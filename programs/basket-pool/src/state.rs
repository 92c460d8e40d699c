use anchor_lang::prelude::*;
use std::collections::HashSet;

use crate::constants::*;
use crate::error::ErrorCode;
use crate::policy;

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Pool {
    pub owner: Pubkey,                      // Governs setters and pause control
    pub name: String,                       // Also the PDA seed, max 32 bytes
    pub entry_asset: Pubkey,                // Deposit mint, or NATIVE_ASSET
    pub native_wrap_asset: Pubkey,          // Wrapped native mint, default when unused
    pub swap_router: Pubkey,                // Router program invoked for every swap
    pub fee_address: Pubkey,                // Receives invest and success fees
    pub invest_fee: u8,                     // Percent of each deposit (0-50)
    pub success_fee: u8,                    // Percent of realized profit (0-50)
    pub min_invest: u64,                    // Smallest accepted deposit
    pub paused: bool,                       // Deposits/rebalances frozen, setters open
    pub token_list: Vec<Pubkey>,            // Fixed at construction
    pub distribution: Vec<u8>,              // Target weights, sum == 100
    pub pool_token_balances: Vec<u64>,      // Sum over active investments
    pub total_received_currency: u64,       // Sum of active cost bases
    pub total_invest_fee: u64,
    pub total_success_fee: u64,
    pub total_manager_fee: u64,
    pub bump: u8,
}

/// Constructor parameters for a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub name: String,
    pub entry_asset: Pubkey,
    pub fee_address: Pubkey,
    pub invest_fee: u8,
    pub success_fee: u8,
    pub swap_router: Pubkey,
    pub native_wrap_asset: Pubkey,
    pub min_invest: u64,
    pub token_list: Vec<Pubkey>,
    pub distribution: Vec<u8>,
}

/// One deposit event and the basket bought with it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Investment {
    pub active: bool,
    pub received_currency: u64,
    pub token_balances: Vec<u64>,
    pub rebalance_enabled: bool,
    pub input_is_native_token: bool,
}

#[account]
#[derive(Debug)]
pub struct UserInvestments {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub investments: Vec<Investment>,       // Append-only, index == investment id
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolData {
    pub owner: Pubkey,
    pub entry_asset: Pubkey,
    pub pool_tokens: Vec<Pubkey>,
    pub pool_distribution: Vec<u8>,
    pub pool_tokens_balances: Vec<u64>,
    pub pool_size: u8,
    pub fee_address: Pubkey,
    pub invest_fee: u8,
    pub success_fee: u8,
    pub total_received_currency: u64,
    pub total_success_fee: u64,
    pub total_manager_fee: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolInfo {
    pub name: String,
    pub entry_asset: Pubkey,
    pub native_wrap_asset: Pubkey,
    pub swap_router: Pubkey,
    pub fee_address: Pubkey,
    pub invest_fee: u8,
    pub success_fee: u8,
    pub min_invest: u64,
    pub paused: bool,
    pub total_invest_fee: u64,
}

/// One page of a user's investment records, sized to fit in return data.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InvestmentsPage {
    pub total: u64,
    pub offset: u64,
    pub investments: Vec<Investment>,
}

/// Staged copy of the pool aggregates. Operations mutate this with checked
/// arithmetic and hand it to [`Pool::commit`] once every swap has settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolTotals {
    pub pool_token_balances: Vec<u64>,
    pub total_received_currency: u64,
    pub total_invest_fee: u64,
    pub total_success_fee: u64,
}

impl Pool {
    pub const FIXED_SIZE: usize = 32 + 32 + 32 + 32 + 32 + 1 + 1 + 8 + 1 + 8 * 4 + 1;

    /// Account size with room for the longest name and token list.
    pub fn space() -> usize {
        8 + Self::FIXED_SIZE
            + (4 + MAX_POOL_NAME_LEN)
            + (4 + 32 * MAX_POOL_TOKENS)
            + (4 + MAX_POOL_TOKENS)
            + (4 + 8 * MAX_POOL_TOKENS)
    }

    pub fn new(owner: Pubkey, config: PoolConfig) -> Result<Self> {
        require!(
            !config.name.is_empty() && config.name.len() <= MAX_POOL_NAME_LEN,
            ErrorCode::InvalidPoolName
        );
        require!(config.fee_address != Pubkey::default(), ErrorCode::ZeroFeeAddress);
        require!(config.invest_fee <= MAX_FEE_PERCENT, ErrorCode::InvestFeeTooBig);
        require!(config.success_fee <= MAX_FEE_PERCENT, ErrorCode::SuccessFeeTooBig);
        require!(config.min_invest > 0, ErrorCode::ZeroMinInvest);
        Self::validate_token_list(&config.token_list)?;
        policy::validate_distribution(&config.distribution, config.token_list.len())?;
        Self::validate_native_wrap(&config.entry_asset, &config.native_wrap_asset)?;

        let token_count = config.token_list.len();
        Ok(Pool {
            owner,
            name: config.name,
            entry_asset: config.entry_asset,
            native_wrap_asset: config.native_wrap_asset,
            swap_router: config.swap_router,
            fee_address: config.fee_address,
            invest_fee: config.invest_fee,
            success_fee: config.success_fee,
            min_invest: config.min_invest,
            paused: false,
            token_list: config.token_list,
            distribution: config.distribution,
            pool_token_balances: vec![0; token_count],
            total_received_currency: 0,
            total_invest_fee: 0,
            total_success_fee: 0,
            total_manager_fee: 0,
            bump: 0,
        })
    }

    pub fn validate_token_list(tokens: &[Pubkey]) -> Result<()> {
        require!(
            !tokens.is_empty() && tokens.len() <= MAX_POOL_TOKENS,
            ErrorCode::InvalidTokenCount
        );
        let mut seen = HashSet::new();
        for token in tokens {
            require!(seen.insert(*token), ErrorCode::DuplicatePoolToken);
        }
        Ok(())
    }

    pub fn validate_native_wrap(entry_asset: &Pubkey, native_wrap_asset: &Pubkey) -> Result<()> {
        if *entry_asset == NATIVE_ASSET {
            require!(*native_wrap_asset != Pubkey::default(), ErrorCode::InvalidNativeWrap);
        } else {
            require!(
                *native_wrap_asset == Pubkey::default() || native_wrap_asset == entry_asset,
                ErrorCode::InvalidNativeWrap
            );
        }
        Ok(())
    }

    pub fn token_count(&self) -> usize {
        self.token_list.len()
    }

    /// Mint the pool actually swaps from and pays out of.
    pub fn swap_asset(&self) -> Pubkey {
        if self.entry_asset == NATIVE_ASSET {
            self.native_wrap_asset
        } else {
            self.entry_asset
        }
    }

    pub fn accepts_native(&self) -> bool {
        self.entry_asset == NATIVE_ASSET
            || (self.native_wrap_asset != Pubkey::default()
                && self.native_wrap_asset == self.entry_asset)
    }

    /// Mints the pool keeps vaults for: the swap asset, then every pool
    /// token not already listed.
    pub fn vault_mints(&self) -> Vec<Pubkey> {
        let mut mints = vec![self.swap_asset()];
        for token in &self.token_list {
            if !mints.contains(token) {
                mints.push(*token);
            }
        }
        mints
    }

    pub fn stage(&self) -> PoolTotals {
        PoolTotals {
            pool_token_balances: self.pool_token_balances.clone(),
            total_received_currency: self.total_received_currency,
            total_invest_fee: self.total_invest_fee,
            total_success_fee: self.total_success_fee,
        }
    }

    pub fn commit(&mut self, totals: PoolTotals) {
        self.pool_token_balances = totals.pool_token_balances;
        self.total_received_currency = totals.total_received_currency;
        self.total_invest_fee = totals.total_invest_fee;
        self.total_success_fee = totals.total_success_fee;
    }

    pub fn pool_data(&self) -> PoolData {
        PoolData {
            owner: self.owner,
            entry_asset: self.entry_asset,
            pool_tokens: self.token_list.clone(),
            pool_distribution: self.distribution.clone(),
            pool_tokens_balances: self.pool_token_balances.clone(),
            pool_size: self.token_list.len() as u8,
            fee_address: self.fee_address,
            invest_fee: self.invest_fee,
            success_fee: self.success_fee,
            total_received_currency: self.total_received_currency,
            total_success_fee: self.total_success_fee,
            total_manager_fee: self.total_manager_fee,
        }
    }

    pub fn pool_info(&self) -> PoolInfo {
        PoolInfo {
            name: self.name.clone(),
            entry_asset: self.entry_asset,
            native_wrap_asset: self.native_wrap_asset,
            swap_router: self.swap_router,
            fee_address: self.fee_address,
            invest_fee: self.invest_fee,
            success_fee: self.success_fee,
            min_invest: self.min_invest,
            paused: self.paused,
            total_invest_fee: self.total_invest_fee,
        }
    }
}

impl PoolTotals {
    pub fn credit_tokens(&mut self, amounts: &[u64]) -> Result<()> {
        require!(
            amounts.len() == self.pool_token_balances.len(),
            ErrorCode::InvalidTokenCount
        );
        for (balance, amount) in self.pool_token_balances.iter_mut().zip(amounts) {
            *balance = balance.checked_add(*amount).ok_or(ErrorCode::MathOverflow)?;
        }
        Ok(())
    }

    pub fn debit_tokens(&mut self, amounts: &[u64]) -> Result<()> {
        require!(
            amounts.len() == self.pool_token_balances.len(),
            ErrorCode::InvalidTokenCount
        );
        for (balance, amount) in self.pool_token_balances.iter_mut().zip(amounts) {
            *balance = balance.checked_sub(*amount).ok_or(ErrorCode::MathOverflow)?;
        }
        Ok(())
    }

    pub fn add_received(&mut self, amount: u64) -> Result<()> {
        self.total_received_currency = self
            .total_received_currency
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn sub_received(&mut self, amount: u64) -> Result<()> {
        self.total_received_currency = self
            .total_received_currency
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }
}

impl Investment {
    pub fn new(received_currency: u64, token_balances: Vec<u64>, input_is_native_token: bool) -> Self {
        Investment {
            active: true,
            received_currency,
            token_balances,
            rebalance_enabled: true,
            input_is_native_token,
        }
    }

    pub fn space(token_count: usize) -> usize {
        1 + 8 + (4 + 8 * token_count) + 1 + 1
    }
}

impl UserInvestments {
    pub fn space(investment_count: usize, token_count: usize) -> usize {
        8 + 32 + 32 + 1 + 4 + investment_count * Investment::space(token_count)
    }

    /// Reads the list stored at `info`. An address that was never opened
    /// holds no investments.
    pub fn load(info: &AccountInfo, program_id: &Pubkey) -> Result<Self> {
        if info.owner != program_id || info.data_is_empty() {
            return err!(ErrorCode::InvestmentNonExists);
        }
        let data = info.try_borrow_data()?;
        let mut data_slice: &[u8] = &data;
        UserInvestments::try_deserialize(&mut data_slice)
    }

    /// Writes the list back in place. Record count must be unchanged.
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data;
        self.try_serialize(&mut writer)
    }
}

impl InvestmentsPage {
    const HEADER_SIZE: usize = 8 + 8 + 4;

    /// Largest page whose encoding fits in return data.
    pub fn max_len(token_count: usize) -> usize {
        (MAX_RETURN_DATA_LEN - Self::HEADER_SIZE) / Investment::space(token_count)
    }
}
