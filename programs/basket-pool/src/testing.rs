//! Fixtures and a priced in-memory router shared by the unit tests.

use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::state::{Pool, PoolConfig};
use crate::swap::{SwapGateway, SwapRequest};

/// Prices are quoted in entry-asset units per token, scaled by this factor.
pub const PRICE_SCALE: u64 = 1_000_000;

fn key(byte: u8) -> Pubkey {
    Pubkey::new_from_array([byte; 32])
}

pub fn owner() -> Pubkey {
    key(1)
}

pub fn investor_a() -> Pubkey {
    key(2)
}

pub fn investor_b() -> Pubkey {
    key(3)
}

pub fn fee_wallet() -> Pubkey {
    key(4)
}

pub fn router_program() -> Pubkey {
    key(5)
}

pub fn entry_mint() -> Pubkey {
    key(10)
}

pub fn wrapped_native_mint() -> Pubkey {
    key(11)
}

pub fn token_a() -> Pubkey {
    key(20)
}

pub fn token_b() -> Pubkey {
    key(21)
}

pub fn token_c() -> Pubkey {
    key(22)
}

pub fn config_fixture() -> PoolConfig {
    PoolConfig {
        name: "index".to_string(),
        entry_asset: entry_mint(),
        fee_address: fee_wallet(),
        invest_fee: 10,
        success_fee: 10,
        swap_router: router_program(),
        native_wrap_asset: Pubkey::default(),
        min_invest: 1,
        token_list: vec![token_a(), token_b(), token_c()],
        distribution: vec![50, 25, 25],
    }
}

pub fn pool_fixture() -> Pool {
    Pool::new(owner(), config_fixture()).unwrap()
}

pub fn native_pool_fixture(entry_asset: Pubkey) -> Pool {
    let mut config = config_fixture();
    config.entry_asset = entry_asset;
    config.native_wrap_asset = wrapped_native_mint();
    Pool::new(owner(), config).unwrap()
}

pub fn assert_fails_with<T: std::fmt::Debug>(result: Result<T>, code: ErrorCode) {
    match result {
        Err(Error::AnchorError(err)) => assert_eq!(
            err.error_code_number,
            u32::from(code),
            "expected {:?}, got {}",
            code,
            err.error_name
        ),
        other => panic!("expected {:?}, got {:?}", code, other),
    }
}

/// Router that settles every swap at a fixed price per mint. Mints without a
/// price trade at par with the entry asset.
#[derive(Debug, Default)]
pub struct MockRouter {
    pub prices: HashMap<Pubkey, u64>,
    pub failing: HashSet<Pubkey>,
    pub calls: Vec<SwapRequest>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, mint: Pubkey, price: u64) {
        self.prices.insert(mint, price);
    }

    /// Any swap touching `mint` fails from now on.
    pub fn fail_on(&mut self, mint: Pubkey) {
        self.failing.insert(mint);
    }

    fn price(&self, mint: &Pubkey) -> u128 {
        self.prices.get(mint).copied().unwrap_or(PRICE_SCALE) as u128
    }
}

impl SwapGateway for MockRouter {
    fn swap(&mut self, request: &SwapRequest) -> Result<u64> {
        self.calls.push(*request);
        require!(
            !self.failing.contains(&request.token_in) && !self.failing.contains(&request.token_out),
            ErrorCode::InvalidSwapSettlement
        );

        let value = request.amount_in as u128 * self.price(&request.token_in);
        let amount_out = u64::try_from(value / self.price(&request.token_out))
            .map_err(|_| error!(ErrorCode::MathOverflow))?;
        require!(amount_out >= request.min_amount_out, ErrorCode::SlippageExceeded);
        Ok(amount_out)
    }
}
