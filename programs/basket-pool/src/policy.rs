//! Economic parameters of a pool: fee percentages, the minimum deposit, the
//! fee recipient and the target distribution. Setters are owner-only and
//! open only while the pool is paused, so a distribution can never change
//! underneath an in-flight deposit or rebalance.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::ErrorCode;
use crate::state::Pool;

/// Fee split and deposit kind resolved for one `invest` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvestQuote {
    pub amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub input_is_native_token: bool,
}

pub fn validate_distribution(distribution: &[u8], token_count: usize) -> Result<()> {
    require!(distribution.len() == token_count, ErrorCode::DistributionLengthMismatch);
    let total: u32 = distribution.iter().map(|weight| *weight as u32).sum();
    require!(total == DISTRIBUTION_TOTAL, ErrorCode::DistributionSumMismatch);
    Ok(())
}

/// `amount * percent / 100`, rounded down.
pub fn percent_of(amount: u64, percent: u8) -> Result<u64> {
    let value = (amount as u128)
        .checked_mul(percent as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / PERCENT_DENOMINATOR;
    u64::try_from(value).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Splits `amount` across the distribution. Each slice is rounded down and
/// the rounding remainder goes to the highest weight (first one on ties),
/// so the slices always sum to `amount`.
pub fn allocate(amount: u64, distribution: &[u8]) -> Result<Vec<u64>> {
    let mut slices = distribution
        .iter()
        .map(|weight| percent_of(amount, *weight))
        .collect::<Result<Vec<u64>>>()?;

    let allocated = slices
        .iter()
        .try_fold(0u64, |acc, slice| acc.checked_add(*slice))
        .ok_or(ErrorCode::MathOverflow)?;
    let remainder = amount.checked_sub(allocated).ok_or(ErrorCode::MathOverflow)?;

    if remainder > 0 {
        let heaviest = distribution
            .iter()
            .enumerate()
            .fold(0usize, |best, (index, weight)| {
                if *weight > distribution[best] { index } else { best }
            });
        slices[heaviest] = slices[heaviest]
            .checked_add(remainder)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    Ok(slices)
}

impl Pool {
    /// Validates a deposit and splits off the invest fee.
    ///
    /// `attached_value` is the native currency sent along with the call. A
    /// pool that accepts native deposits takes either a plain token deposit
    /// (nothing attached) or a native one where the attachment equals
    /// `amount` exactly.
    pub fn quote_invest(&self, amount: u64, attached_value: u64) -> Result<InvestQuote> {
        self.when_not_paused()?;

        let input_is_native_token = attached_value > 0;
        if input_is_native_token {
            require!(
                self.accepts_native() && attached_value == amount,
                ErrorCode::WrongValue
            );
        } else {
            require!(self.entry_asset != NATIVE_ASSET, ErrorCode::WrongValue);
        }
        require!(amount >= self.min_invest, ErrorCode::AmountTooSmall);

        let fee = percent_of(amount, self.invest_fee)?;
        let net_amount = amount.checked_sub(fee).ok_or(ErrorCode::MathOverflow)?;

        Ok(InvestQuote {
            amount,
            fee,
            net_amount,
            input_is_native_token,
        })
    }

    /// Success fee owed when `gross_out` is realized against a cost basis of
    /// `received_currency`. Losses and break-even owe nothing.
    pub fn success_fee_for(&self, gross_out: u64, received_currency: u64) -> Result<u64> {
        if gross_out <= received_currency {
            return Ok(0);
        }
        percent_of(gross_out - received_currency, self.success_fee)
    }

    pub fn set_fee_address(&mut self, caller: &Pubkey, fee_address: Pubkey) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        require!(fee_address != Pubkey::default(), ErrorCode::ZeroFeeAddress);
        require!(fee_address != self.fee_address, ErrorCode::FeeAddressAlreadySet);

        self.fee_address = fee_address;
        Ok(())
    }

    pub fn set_invest_fee(&mut self, caller: &Pubkey, invest_fee: u8) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        require!(invest_fee != self.invest_fee, ErrorCode::FeeAlreadySet);
        require!(invest_fee <= MAX_FEE_PERCENT, ErrorCode::InvestFeeTooBig);

        self.invest_fee = invest_fee;
        Ok(())
    }

    pub fn set_success_fee(&mut self, caller: &Pubkey, success_fee: u8) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        require!(success_fee != self.success_fee, ErrorCode::FeeAlreadySet);
        require!(success_fee <= MAX_FEE_PERCENT, ErrorCode::SuccessFeeTooBig);

        self.success_fee = success_fee;
        Ok(())
    }

    pub fn set_min_investment_limit(&mut self, caller: &Pubkey, min_invest: u64) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        require!(min_invest > 0, ErrorCode::ZeroMinInvest);

        self.min_invest = min_invest;
        Ok(())
    }

    /// Changes the target used by future deposits and rebalances. Existing
    /// holdings are untouched until their owners rebalance.
    pub fn set_pool_tokens_distributions(&mut self, caller: &Pubkey, distribution: Vec<u8>) -> Result<()> {
        self.only_owner(caller)?;
        self.when_paused()?;
        validate_distribution(&distribution, self.token_count())?;

        self.distribution = distribution;
        Ok(())
    }
}
