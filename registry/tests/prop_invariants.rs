//! Property tests: arbitrary call sequences never break registry invariants.

use std::sync::Arc;

use proptest::prelude::*;

use surety_nullables::NullClock;
use surety_registry::AirlineRegistry;
use surety_types::{AccountAddress, FundAmount, RegistryParams};

const ACCOUNTS: [&str; 8] = ["owner", "founder", "a1", "a2", "a3", "a4", "a5", "a6"];

#[derive(Clone, Debug)]
enum Op {
    Fund { who: usize, units: u64 },
    Register { candidate: usize, sponsor: usize },
    SetStatus { caller: usize, operational: bool },
}

fn arb_op() -> impl Strategy<Value = Op> {
    let idx = 0..ACCOUNTS.len();
    prop_oneof![
        (idx.clone(), 0u64..30).prop_map(|(who, units)| Op::Fund { who, units }),
        (idx.clone(), idx.clone())
            .prop_map(|(candidate, sponsor)| Op::Register { candidate, sponsor }),
        (idx, any::<bool>()).prop_map(|(caller, operational)| Op::SetStatus {
            caller,
            operational
        }),
    ]
}

fn addr(i: usize) -> AccountAddress {
    AccountAddress::new(ACCOUNTS[i])
}

fn new_registry() -> AirlineRegistry {
    AirlineRegistry::with_clock(
        AccountAddress::new("owner"),
        AccountAddress::new("founder"),
        RegistryParams::default(),
        Arc::new(NullClock::new(0)),
    )
}

fn apply(registry: &mut AirlineRegistry, op: &Op) -> bool {
    match *op {
        Op::Fund { who, units } => registry.fund(&addr(who), FundAmount::units(units)).is_ok(),
        Op::Register { candidate, sponsor } => registry
            .register_candidate(&addr(candidate), &addr(sponsor))
            .is_ok(),
        Op::SetStatus { caller, operational } => registry
            .set_operating_status(operational, &addr(caller))
            .is_ok(),
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut registry = new_registry();
        let mut last_count = registry.registered_count();

        for op in &ops {
            let before = registry.snapshot();
            let accepted = apply(&mut registry, op);
            if !accepted {
                // Failed calls never mutate.
                prop_assert_eq!(&registry.snapshot(), &before);
            }

            let count = registry.registered_count();
            prop_assert!(count >= last_count);
            prop_assert!(count <= last_count + 1);
            last_count = count;

            let registered = ACCOUNTS
                .iter()
                .filter(|a| registry.is_registered(&AccountAddress::new(**a)))
                .count() as u64;
            prop_assert_eq!(registered, count);

            let escrow: FundAmount = ACCOUNTS
                .iter()
                .map(|a| registry.contributed_balance(&AccountAddress::new(*a)))
                .sum();
            prop_assert_eq!(escrow, registry.total_escrowed());

            for proposal in registry.pending_proposals() {
                prop_assert!(proposal.vote_count() <= count);
                prop_assert!(!registry.is_registered(&proposal.candidate));
                for sponsor in &proposal.sponsor_votes {
                    prop_assert!(registry.is_registered(sponsor));
                    prop_assert!(registry.is_funded(sponsor));
                }
            }
        }
    }

    #[test]
    fn contributed_balance_is_sum_of_accepted_amounts(amounts in prop::collection::vec(10u64..1_000, 1..20)) {
        let mut registry = new_registry();
        let founder = AccountAddress::new("founder");
        for a in &amounts {
            registry.fund(&founder, FundAmount::units(*a)).unwrap();
            prop_assert!(registry.is_funded(&founder));
        }
        let expected: u64 = amounts.iter().sum();
        prop_assert_eq!(registry.contributed_balance(&founder), FundAmount::units(expected));
    }
}
