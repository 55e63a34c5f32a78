//! End-to-end admission scenarios against the public registry API.

use std::sync::Arc;

use surety_nullables::NullClock;
use surety_registry::{AdmissionMode, AdmissionOutcome, AirlineRegistry, RegistryError};
use surety_types::{AccountAddress, FundAmount, QuorumRule, RegistryParams};

fn addr(s: &str) -> AccountAddress {
    AccountAddress::new(s)
}

fn registry_with(params: RegistryParams) -> AirlineRegistry {
    AirlineRegistry::with_clock(
        addr("owner"),
        addr("founder"),
        params,
        Arc::new(NullClock::new(0)),
    )
}

fn registry() -> AirlineRegistry {
    registry_with(RegistryParams::default())
}

fn min_fund() -> FundAmount {
    RegistryParams::default().min_funding
}

/// Founder funds and bootstraps `others` into the registry, each funded.
fn bootstrap(registry: &mut AirlineRegistry, others: &[&str]) {
    registry.fund(&addr("founder"), min_fund()).unwrap();
    for a in others {
        registry.fund(&addr(a), min_fund()).unwrap();
        registry
            .register_candidate(&addr(a), &addr("founder"))
            .unwrap();
    }
}

// ── Access gate ──────────────────────────────────────────────────────────

#[test]
fn fresh_registry_is_operational() {
    assert!(registry().is_operational());
}

#[test]
fn non_owner_cannot_change_operating_status() {
    let mut r = registry();
    for who in ["founder", "someone", "frontend"] {
        let err = r.set_operating_status(false, &addr(who)).unwrap_err();
        assert_eq!(err.kind(), "unauthorized");
        assert!(r.is_operational());
    }
}

#[test]
fn owner_can_change_operating_status() {
    let mut r = registry();
    r.set_operating_status(false, &addr("owner")).unwrap();
    assert!(!r.is_operational());
    r.set_operating_status(true, &addr("owner")).unwrap();
    assert!(r.is_operational());
}

#[test]
fn paused_registry_blocks_funding_and_registration() {
    let mut r = registry();
    bootstrap(&mut r, &[]);
    r.set_operating_status(false, &addr("owner")).unwrap();

    assert_eq!(r.fund(&addr("a2"), min_fund()), Err(RegistryError::SystemPaused));
    assert_eq!(
        r.register_candidate(&addr("a2"), &addr("founder")),
        Err(RegistryError::SystemPaused)
    );
    assert!(!r.is_funded(&addr("a2")));
    assert!(!r.is_registered(&addr("a2")));
    assert_eq!(r.registered_count(), 1);
    assert_eq!(r.total_escrowed(), min_fund());
}

// ── Funding ──────────────────────────────────────────────────────────────

#[test]
fn unfunded_founder_cannot_register() {
    let mut r = registry();
    let result = r.register_candidate(&addr("a2"), &addr("founder"));
    assert!(matches!(result, Err(RegistryError::Unauthorized { .. })));
    assert!(!r.is_registered(&addr("a2")));
    assert!(r.participant(&addr("a2")).is_none());
}

#[test]
fn funding_marks_funded_and_escrows_exact_amount() {
    let mut r = registry();
    let before = r.total_escrowed();
    r.fund(&addr("founder"), min_fund()).unwrap();
    assert!(r.is_funded(&addr("founder")));
    assert_eq!(r.total_escrowed(), before + min_fund());
}

#[test]
fn funding_below_minimum_is_rejected() {
    let mut r = registry();
    let short = FundAmount::new(min_fund().raw() - 1);
    let err = r.fund(&addr("founder"), short).unwrap_err();
    assert_eq!(
        err,
        RegistryError::InsufficientAmount {
            needed: min_fund().raw(),
            provided: short.raw(),
        }
    );
    assert!(!r.is_funded(&addr("founder")));
    assert_eq!(r.total_escrowed(), FundAmount::ZERO);
}

#[test]
fn contributions_accumulate() {
    let mut r = registry();
    let amounts = [10u64, 15, 42];
    for a in amounts {
        r.fund(&addr("founder"), FundAmount::units(a)).unwrap();
    }
    assert_eq!(r.contributed_balance(&addr("founder")), FundAmount::units(67));
    assert!(r.is_funded(&addr("founder")));
}

// ── Admission ────────────────────────────────────────────────────────────

#[test]
fn bootstrap_admits_up_to_threshold_without_votes() {
    let mut r = registry();
    r.fund(&addr("founder"), min_fund()).unwrap();
    for (i, a) in ["a2", "a3", "a4"].iter().enumerate() {
        let outcome = r.register_candidate(&addr(a), &addr("founder")).unwrap();
        assert_eq!(
            outcome,
            AdmissionOutcome::Registered {
                candidate: addr(a),
                mode: AdmissionMode::Bootstrap,
                votes: 0,
            }
        );
        assert_eq!(r.registered_count(), i as u64 + 2);
    }
    assert_eq!(r.admission_mode(), AdmissionMode::Consensus);
}

/// Founder plus three bootstrapped airlines; the fifth needs votes.
#[test]
fn fifth_airline_requires_votes() {
    let mut r = registry();
    bootstrap(&mut r, &["a3", "a4", "a5"]);
    r.fund(&addr("a6"), min_fund()).unwrap();
    assert_eq!(r.registered_count(), 4);

    let outcome = r.register_candidate(&addr("a6"), &addr("founder")).unwrap();
    assert!(!outcome.is_registered());
    assert!(!r.is_registered(&addr("a6")));

    // quorum(4) = 2: the second distinct sponsor admits.
    let outcome = r.register_candidate(&addr("a6"), &addr("a3")).unwrap();
    assert!(outcome.is_registered());
    assert!(r.is_registered(&addr("a6")));
    assert_eq!(r.registered_count(), 5);

    // Later votes hit an already-registered airline.
    assert_eq!(
        r.register_candidate(&addr("a6"), &addr("a4")),
        Err(RegistryError::AlreadyRegistered("a6".into()))
    );
    assert_eq!(
        r.register_candidate(&addr("a6"), &addr("a3")),
        Err(RegistryError::AlreadyRegistered("a6".into()))
    );
    assert_eq!(r.registered_count(), 5);
}

#[test]
fn sponsor_votes_only_once_per_candidate() {
    let mut r = registry();
    bootstrap(&mut r, &["a3", "a4", "a5"]);
    r.register_candidate(&addr("a6"), &addr("a3")).unwrap();
    let err = r.register_candidate(&addr("a6"), &addr("a3")).unwrap_err();
    assert_eq!(err.kind(), "duplicate_vote");
    assert_eq!(r.vote_count(&addr("a6")), 1);
}

#[test]
fn unfunded_registered_airline_cannot_vote() {
    let mut r = registry();
    r.fund(&addr("founder"), min_fund()).unwrap();
    for a in ["a2", "a3", "a4"] {
        r.register_candidate(&addr(a), &addr("founder")).unwrap();
    }
    let err = r.register_candidate(&addr("a6"), &addr("a2")).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized { .. }));
    assert_eq!(r.vote_count(&addr("a6")), 0);
    assert!(r.proposal(&addr("a6")).is_none());
}

#[test]
fn strict_majority_needs_three_of_four() {
    let mut r = registry_with(RegistryParams {
        quorum_rule: QuorumRule::StrictMajority,
        ..RegistryParams::default()
    });
    bootstrap(&mut r, &["a3", "a4", "a5"]);
    assert_eq!(r.current_quorum(), 3);

    for sponsor in ["founder", "a3"] {
        let outcome = r.register_candidate(&addr("a6"), &addr(sponsor)).unwrap();
        assert!(!outcome.is_registered());
    }
    let outcome = r.register_candidate(&addr("a6"), &addr("a4")).unwrap();
    assert!(outcome.is_registered());
}

#[test]
fn vote_set_never_exceeds_registered_count() {
    let mut r = registry_with(RegistryParams {
        consensus_threshold: 2,
        quorum_rule: QuorumRule::StrictMajority,
        ..RegistryParams::default()
    });
    bootstrap(&mut r, &["a2"]);
    r.register_candidate(&addr("c1"), &addr("founder")).unwrap();
    for p in r.pending_proposals() {
        assert!(p.vote_count() <= r.registered_count());
    }
}

#[test]
fn custom_threshold_changes_bootstrap_size() {
    let mut r = registry_with(RegistryParams {
        consensus_threshold: 2,
        ..RegistryParams::default()
    });
    bootstrap(&mut r, &["a2"]);
    assert_eq!(r.admission_mode(), AdmissionMode::Consensus);
    let outcome = r.register_candidate(&addr("a3"), &addr("founder")).unwrap();
    // quorum(2) = 1 under at-least-half.
    assert!(outcome.is_registered());
}
