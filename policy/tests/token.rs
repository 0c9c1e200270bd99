//! Token policy integration tests
//!
//! Exercises the check order around the ledger: roles, pause, sanctions,
//! allowances, then the core operation under a host-driven clock.

use autofee_core::{Address, LedgerError, ManualTimeSource, TimeSource, SCALE, U256};
use autofee_policy::*;
use std::sync::Arc;
use tempfile::tempdir;

const DAY: u64 = 86_400;
const T0: u64 = 1_700_000_000;

struct Fixture {
    token: AutoFeeToken<Arc<ManualTimeSource>, StaticSanctionsList>,
    clock: Arc<ManualTimeSource>,
    owner: Address,
    minter: Address,
    updater: Address,
}

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

fn setup(fee: u64, sanctioned: &[Address]) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = TokenConfig::from_toml_str(&format!(
        "[token]\nname = \"Auto Fee Dollar\"\nsymbol = \"AFD\"\n\
         [ledger]\nperiod_length = {}\ninitial_anchor_time = {}\nfee_per_period = {}\n",
        DAY, T0, fee
    ))
    .expect("config");

    let clock = Arc::new(ManualTimeSource::new(T0));
    let owner = addr(1);
    let minter = addr(2);
    let updater = addr(3);
    let sanctions: StaticSanctionsList = sanctioned.iter().copied().collect();
    let mut token =
        AutoFeeToken::new(config, owner, Arc::clone(&clock), sanctions).expect("token");

    token.grant_role(&owner, Role::Minter, minter).unwrap();
    token.grant_role(&owner, Role::Burner, minter).unwrap();
    token.grant_role(&owner, Role::Pauser, owner).unwrap();
    token.grant_role(&owner, Role::MultiplierUpdater, updater).unwrap();

    Fixture {
        token,
        clock,
        owner,
        minter,
        updater,
    }
}

#[test]
fn test_metadata() {
    let f = setup(0, &[]);
    assert_eq!(f.token.name(), "Auto Fee Dollar");
    assert_eq!(f.token.symbol(), "AFD");
    assert_eq!(f.token.decimals(), 18);
}

#[test]
fn test_mint_requires_minter() {
    let mut f = setup(0, &[]);
    let alice = addr(10);
    let err = f.token.mint(&alice, &alice, U256::from(5)).unwrap_err();
    assert!(matches!(
        err,
        PolicyError::MissingRole {
            role: Role::Minter,
            ..
        }
    ));
    f.token.mint(&f.minter, &alice, U256::from(5)).unwrap();
    assert_eq!(f.token.balance_of(&alice).unwrap(), U256::from(5));
}

#[test]
fn test_pause_blocks_value_movement() {
    let mut f = setup(0, &[]);
    let alice = addr(10);
    let bob = addr(11);
    f.token.mint(&f.minter, &alice, U256::from(100)).unwrap();

    f.token.pause(&f.owner).unwrap();
    assert!(matches!(
        f.token.transfer(&alice, &bob, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.mint(&f.minter, &alice, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.approve(&alice, bob, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.burn(&f.minter, &alice, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.transfer_from(&bob, &alice, &bob, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.transfer_shares(&alice, &bob, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert!(matches!(
        f.token.transfer_shares_from(&bob, &alice, &bob, U256::from(1)),
        Err(PolicyError::Paused)
    ));
    assert_eq!(f.token.balance_of(&alice).unwrap(), U256::from(100));

    f.token.unpause(&f.owner).unwrap();
    f.token.transfer(&alice, &bob, U256::from(1)).unwrap();

    // Only pausers may pause
    assert!(matches!(
        f.token.pause(&alice),
        Err(PolicyError::MissingRole { .. })
    ));
}

#[test]
fn test_sanctioned_accounts_cannot_send_or_receive() {
    let bad = addr(66);
    let mut f = setup(0, &[bad]);
    let alice = addr(10);
    f.token.mint(&f.minter, &alice, U256::from(100)).unwrap();

    assert!(matches!(
        f.token.transfer(&alice, &bad, U256::from(1)),
        Err(PolicyError::Sanctioned(a)) if a == bad
    ));
    assert!(matches!(
        f.token.mint(&f.minter, &bad, U256::from(1)),
        Err(PolicyError::Sanctioned(_))
    ));
    assert_eq!(f.token.balance_of(&alice).unwrap(), U256::from(100));
}

#[test]
fn test_sanctioned_minter_and_burner_are_rejected() {
    let alice = addr(10);
    let minter = addr(2);
    let mut f = setup(0, &[minter]);
    assert_eq!(f.minter, minter);

    assert!(matches!(
        f.token.mint(&minter, &alice, U256::from(5)),
        Err(PolicyError::Sanctioned(a)) if a == minter
    ));
    assert!(matches!(
        f.token.burn(&minter, &alice, U256::from(5)),
        Err(PolicyError::Sanctioned(a)) if a == minter
    ));
    assert_eq!(f.token.total_shares(), U256::zero());
}

#[test]
fn test_burn_from_sanctioned_holder_is_rejected() {
    let bad = addr(66);
    let mut f = setup(0, &[bad]);
    assert!(matches!(
        f.token.burn(&f.minter, &bad, U256::zero()),
        Err(PolicyError::Sanctioned(a)) if a == bad
    ));
}

#[test]
fn test_transfer_from_spends_allowance_after_success() {
    let mut f = setup(0, &[]);
    let alice = addr(10);
    let spender = addr(12);
    let bob = addr(11);
    f.token.mint(&f.minter, &alice, U256::from(100)).unwrap();
    f.token.approve(&alice, spender, U256::from(60)).unwrap();

    // Ledger rejects, allowance untouched
    f.token.approve(&alice, spender, U256::from(500)).unwrap();
    let err = f
        .token
        .transfer_from(&spender, &alice, &bob, U256::from(200))
        .unwrap_err();
    assert!(matches!(
        err,
        PolicyError::Ledger(LedgerError::InsufficientShares { .. })
    ));
    assert_eq!(f.token.allowance(&alice, &spender), U256::from(500));

    f.token.approve(&alice, spender, U256::from(60)).unwrap();
    f.token
        .transfer_from(&spender, &alice, &bob, U256::from(40))
        .unwrap();
    assert_eq!(f.token.allowance(&alice, &spender), U256::from(20));
    assert_eq!(f.token.balance_of(&bob).unwrap(), U256::from(40));

    assert!(matches!(
        f.token.transfer_from(&spender, &alice, &bob, U256::from(21)),
        Err(PolicyError::InsufficientAllowance { .. })
    ));
}

#[test]
fn test_transfer_shares_from_charges_underlying_value() {
    let mut f = setup(0, &[]);
    let alice = addr(10);
    let spender = addr(12);
    let bob = addr(11);
    f.token.mint(&f.minter, &alice, U256::from(1_000)).unwrap();

    // Halve the multiplier: 100 shares are now worth 50 tokens
    f.token
        .set_multiplier(&f.updater, SCALE / 2u64, SCALE)
        .unwrap();
    f.token.approve(&alice, spender, U256::from(50)).unwrap();
    let amount = f
        .token
        .transfer_shares_from(&spender, &alice, &bob, U256::from(100))
        .unwrap();
    assert_eq!(amount, U256::from(50));
    assert_eq!(f.token.allowance(&alice, &spender), U256::zero());
    assert_eq!(f.token.shares_of(&bob), U256::from(100));
}

#[test]
fn test_balances_decay_with_host_time() {
    // 1% per day
    let mut f = setup(10_000_000_000_000_000, &[]);
    let alice = addr(10);
    f.token.mint(&f.minter, &alice, SCALE).unwrap();

    f.clock.advance(2 * DAY);
    assert_eq!(
        f.token.balance_of(&alice).unwrap(),
        U256::from(980_100_000_000_000_000u64)
    );
    let view = f.token.current_multiplier().unwrap();
    assert_eq!(view.periods_elapsed, 2);
    assert_eq!(f.token.total_supply().unwrap(), f.token.balance_of(&alice).unwrap());
}

#[test]
fn test_override_requires_updater_and_locks_config() {
    let mut f = setup(0, &[]);
    let now = f.clock.now();
    let relative = U256::from(1_100_000_000_000_000_000u128);

    assert!(matches!(
        f.token
            .schedule_multiplier_override(&f.owner, relative, now + 50, SCALE),
        Err(PolicyError::MissingRole {
            role: Role::MultiplierUpdater,
            ..
        })
    ));
    f.token
        .schedule_multiplier_override(&f.updater, relative, now + 50, SCALE)
        .unwrap();

    assert!(matches!(
        f.token.update_fee_per_period(&f.owner, U256::from(1)),
        Err(PolicyError::Ledger(LedgerError::ConfigurationLocked { .. }))
    ));

    f.clock.advance(50);
    assert_eq!(f.token.current_multiplier().unwrap().multiplier, relative);
    f.token.update_fee_per_period(&f.owner, U256::from(1)).unwrap();
    assert_eq!(f.token.ledger().clock().unwrap().last_multiplier(), relative);
}

#[test]
fn test_configuration_requires_owner() {
    let mut f = setup(0, &[]);
    assert!(matches!(
        f.token.set_period_length(&f.minter, 60),
        Err(PolicyError::MissingRole {
            role: Role::Owner,
            ..
        })
    ));
    f.token.set_period_length(&f.owner, 3_600).unwrap();
    f.token.set_last_period_anchor(&f.owner, T0 + 10).unwrap();
    let clock = f.token.ledger().clock().unwrap();
    assert_eq!(clock.period_length(), 3_600);
    assert_eq!(clock.last_period_anchor(), T0 + 10);
}

#[test]
fn test_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("token.toml");
    std::fs::write(
        &path,
        "[token]\nname = \"File Token\"\nsymbol = \"FT\"\n\
         [ledger]\nperiod_length = 60\ninitial_anchor_time = 1\n",
    )
    .unwrap();

    let token = AutoFeeToken::from_config_file(
        &path,
        addr(1),
        ManualTimeSource::new(1),
        StaticSanctionsList::new(),
    )
    .unwrap();
    assert_eq!(token.symbol(), "FT");
    assert_eq!(token.ledger().clock().unwrap().period_length(), 60);

    let missing = AutoFeeToken::from_config_file(
        dir.path().join("missing.toml"),
        addr(1),
        ManualTimeSource::new(1),
        StaticSanctionsList::new(),
    );
    assert!(matches!(missing, Err(PolicyError::Config(_))));
}
