//! Property-based tests over random operation sequences.
//!
//! After every step the pool aggregates must equal the sum over active
//! records, the distribution must sum to 100, and a failed operation must
//! leave the pool and every record exactly as they were.

use anchor_lang::prelude::Pubkey;
use proptest::prelude::*;

use crate::constants::DISTRIBUTION_TOTAL;
use crate::ledger;
use crate::rebalancer;
use crate::state::{Investment, Pool};
use crate::testing::*;

const OWNERS: usize = 3;

#[derive(Clone, Debug)]
enum Op {
    Invest { owner: usize, amount: u64 },
    Rebalance { owner: usize, id: u64 },
    Toggle { owner: usize, id: u64 },
    Withdraw { owner: usize, id: u64 },
    Reprice { token: usize, price: u64 },
    Redistribute { weights: Vec<u8> },
    TogglePause,
    ToggleRouterFailure { token: usize },
}

fn tokens() -> [Pubkey; 3] {
    [token_a(), token_b(), token_c()]
}

fn weights_strategy() -> impl Strategy<Value = Vec<u8>> {
    (0u8..=100)
        .prop_flat_map(|a| (Just(a), 0u8..=(100 - a)))
        .prop_map(|(a, b)| vec![a, b, 100 - a - b])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let owner = 0..OWNERS;
    let id = 0u64..4;
    prop_oneof![
        4 => (owner.clone(), 0u64..2_000_000).prop_map(|(owner, amount)| Op::Invest { owner, amount }),
        2 => (owner.clone(), id.clone()).prop_map(|(owner, id)| Op::Rebalance { owner, id }),
        1 => (owner.clone(), id.clone()).prop_map(|(owner, id)| Op::Toggle { owner, id }),
        2 => (owner, id).prop_map(|(owner, id)| Op::Withdraw { owner, id }),
        2 => (0usize..3, PRICE_SCALE / 4..4 * PRICE_SCALE)
            .prop_map(|(token, price)| Op::Reprice { token, price }),
        1 => weights_strategy().prop_map(|weights| Op::Redistribute { weights }),
        1 => Just(Op::TogglePause),
        1 => (0usize..3).prop_map(|token| Op::ToggleRouterFailure { token }),
    ]
}

struct World {
    pool: Pool,
    investments: Vec<Vec<Investment>>,
    router: MockRouter,
}

impl World {
    fn new() -> Self {
        World {
            pool: pool_fixture(),
            investments: vec![Vec::new(); OWNERS],
            router: MockRouter::new(),
        }
    }

    fn record_is_inactive(&self, owner: usize, id: u64) -> bool {
        self.investments[owner]
            .get(id as usize)
            .map_or(false, |record| !record.active)
    }

    fn apply(&mut self, op: &Op) -> anchor_lang::Result<()> {
        let World { pool, investments, router } = self;
        match op {
            Op::Invest { owner, amount } => {
                ledger::invest(pool, &mut investments[*owner], router, *amount, 0, &[]).map(|_| ())
            }
            Op::Rebalance { owner, id } => {
                rebalancer::rebalance(pool, &mut investments[*owner], router, *id, &[]).map(|_| ())
            }
            Op::Toggle { owner, id } => {
                ledger::toggle_rebalance(pool, &mut investments[*owner], *id).map(|_| ())
            }
            Op::Withdraw { owner, id } => {
                ledger::withdraw(pool, &mut investments[*owner], router, *id, &[]).map(|_| ())
            }
            Op::Reprice { token, price } => {
                router.set_price(tokens()[*token], *price);
                Ok(())
            }
            Op::Redistribute { weights } => pool.set_pool_tokens_distributions(&owner(), weights.clone()),
            Op::TogglePause => {
                if pool.paused {
                    pool.unpause(&owner())
                } else {
                    pool.pause(&owner())
                }
            }
            Op::ToggleRouterFailure { token } => {
                let mint = tokens()[*token];
                if !router.failing.remove(&mint) {
                    router.fail_on(mint);
                }
                Ok(())
            }
        }
    }
}

fn check_invariants(world: &World) -> Result<(), TestCaseError> {
    let pool = &world.pool;
    let distribution_total: u32 = pool.distribution.iter().map(|w| *w as u32).sum();
    prop_assert_eq!(distribution_total, DISTRIBUTION_TOTAL);

    let active = world.investments.iter().flatten().filter(|record| record.active);
    let mut balances = vec![0u64; pool.token_count()];
    let mut received = 0u64;
    for record in active {
        for (sum, balance) in balances.iter_mut().zip(&record.token_balances) {
            *sum += *balance;
        }
        received += record.received_currency;
    }
    prop_assert_eq!(&pool.pool_token_balances, &balances);
    prop_assert_eq!(pool.total_received_currency, received);

    for record in world.investments.iter().flatten().filter(|record| !record.active) {
        prop_assert!(record.token_balances.iter().all(|balance| *balance == 0));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_aggregates_track_active_investments(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut world = World::new();

        for op in &ops {
            let pool_before = world.pool.clone();
            let investments_before = world.investments.clone();
            let closed_target = match op {
                Op::Rebalance { owner, id } | Op::Toggle { owner, id } | Op::Withdraw { owner, id } => {
                    world.record_is_inactive(*owner, *id)
                }
                _ => false,
            };

            let result = world.apply(op);

            if closed_target {
                prop_assert!(result.is_err(), "{:?} succeeded on a withdrawn investment", op);
            }
            if result.is_err() {
                prop_assert_eq!(&world.pool, &pool_before);
                prop_assert_eq!(&world.investments, &investments_before);
            }
            check_invariants(&world)?;
        }
    }

    #[test]
    fn prop_allocation_never_loses_units(
        amount in 0u64..u64::MAX,
        weights in weights_strategy(),
    ) {
        let slices = crate::policy::allocate(amount, &weights).unwrap();
        let total: u128 = slices.iter().map(|slice| *slice as u128).sum();
        prop_assert_eq!(total, amount as u128);
        for (slice, weight) in slices.iter().zip(&weights) {
            if *weight == 0 {
                prop_assert_eq!(*slice, 0);
            }
        }
    }

    #[test]
    fn prop_invest_fee_and_net_partition_the_deposit(amount in 1u64..u64::MAX / 2, fee in 0u8..=50) {
        let mut pool = pool_fixture();
        pool.invest_fee = fee;
        let quote = pool.quote_invest(amount, 0).unwrap();

        prop_assert_eq!(quote.fee + quote.net_amount, amount);
        prop_assert!(quote.fee <= amount / 2);
    }
}
