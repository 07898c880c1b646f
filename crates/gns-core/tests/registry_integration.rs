//! Mint and update flows against the scripted wallet.

mod common;

use common::{OTHER_CHAIN, alice, bob, ready_session, session_with};
use gns_core::mock::{GatewayCall, MockGateway};
use gns_core::models::{DomainDraft, MintPhase};
use gns_core::{GnsError, NamePolicy, RegistryConfig};

#[tokio::test]
async fn test_price_schedule() {
    let (_, session, _) = ready_session().await;
    let registry = session.registry();

    assert_eq!(registry.price_for("abc").unwrap().to_string(), "0.5");
    assert_eq!(registry.price_for("abcd").unwrap().to_string(), "0.3");
    assert_eq!(registry.price_for("abcde").unwrap().to_string(), "0.1");
    assert_eq!(registry.price_for("abcdefgh").unwrap().to_string(), "0.1");
}

#[tokio::test]
async fn test_configured_upper_bound() {
    let gateway = MockGateway::new(alice(), common::TARGET_CHAIN);
    let config = RegistryConfig {
        names: NamePolicy {
            min_len: 3,
            max_len: Some(5),
        },
        ..RegistryConfig::default()
    };
    let (session, _) = session_with(&gateway, config);

    assert!(matches!(
        session.registry().price_for("abcdef"),
        Err(GnsError::InvalidDomainLength { len: 6, .. })
    ));
}

#[tokio::test]
async fn test_short_names_issue_no_chain_calls() {
    let (gateway, session, _) = ready_session().await;

    for name in ["", "a", "ab"] {
        session.set_draft_name(name);
        session.set_draft_record("record");
        let err = session.registry().mint().await.unwrap_err();
        assert!(
            matches!(err, GnsError::InvalidDomainLength { .. }),
            "{name:?} gave {err:?}"
        );
    }

    assert!(gateway.calls().is_empty());
    assert_eq!(session.mint_phase(), MintPhase::Idle);
}

#[tokio::test]
async fn test_mint_registers_then_sets_record() {
    let (gateway, session, _) = ready_session().await;
    session.set_draft_name("abc");
    session.set_draft_record("gang gang");

    let outcome = session.registry().mint().await.unwrap();

    assert_eq!(outcome.name, "abc");
    assert_eq!(outcome.price.to_string(), "0.5");
    let writes: Vec<_> = gateway
        .calls()
        .into_iter()
        .filter(|c| matches!(c, GatewayCall::Register { .. } | GatewayCall::SetRecord { .. }))
        .collect();
    assert_eq!(
        writes,
        vec![
            GatewayCall::Register {
                from: alice(),
                name: "abc".into(),
                value: outcome.price.to_wei(),
            },
            GatewayCall::SetRecord {
                from: alice(),
                name: "abc".into(),
                record: "gang gang".into(),
            },
        ]
    );
    assert_eq!(gateway.record_of("abc").as_deref(), Some("gang gang"));
    assert_eq!(session.draft(), DomainDraft::default());
    assert_eq!(session.mint_phase(), MintPhase::Complete { name: "abc".into() });
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_failed_registration_never_sets_record() {
    let (gateway, session, _) = ready_session().await;
    gateway.revert_next_register();
    session.set_draft_name("abc");
    session.set_draft_record("gang gang");

    let err = session.registry().mint().await.unwrap_err();

    assert!(matches!(err, GnsError::TransactionFailed(_)));
    assert_eq!(gateway.count(|c| matches!(c, GatewayCall::SetRecord { .. })), 0);
    assert_eq!(session.draft().name, "abc");
    assert_eq!(session.draft().record, "gang gang");
    assert!(matches!(session.mint_phase(), MintPhase::Failed { .. }));
}

#[tokio::test]
async fn test_taken_name_reverts() {
    let (gateway, session, _) = ready_session().await;
    gateway.seed_domain("abc", "", bob());
    session.set_draft_name("abc");

    let err = session.registry().mint().await.unwrap_err();

    assert!(matches!(err, GnsError::TransactionFailed(_)));
    assert_eq!(gateway.count(|c| matches!(c, GatewayCall::SetRecord { .. })), 0);
}

#[tokio::test]
async fn test_record_failure_is_reported_divergence() {
    let (gateway, session, _) = ready_session().await;
    gateway.revert_next_set_record();
    session.set_draft_name("abcd");
    session.set_draft_record("lost");

    let err = session.registry().mint().await.unwrap_err();

    assert!(matches!(err, GnsError::PartialMintDivergence { ref name, .. } if name == "abcd"));
    assert!(gateway.is_registered("abcd"));
    assert_eq!(gateway.record_of("abcd").as_deref(), Some(""));
    assert_eq!(session.draft().name, "abcd");
    assert!(matches!(session.mint_phase(), MintPhase::Diverged { .. }));
}

#[tokio::test]
async fn test_rejected_prompt_keeps_draft() {
    let (gateway, session, _) = ready_session().await;
    gateway.reject_next_send();
    session.set_draft_name("abc");
    session.set_draft_record("r");

    let err = session.registry().mint().await.unwrap_err();

    assert_eq!(err, GnsError::UserRejected);
    assert!(!gateway.is_registered("abc"));
    assert_eq!(session.draft().name, "abc");
}

#[tokio::test]
async fn test_wrong_network_blocks_writes() {
    let (gateway, session, _) = ready_session().await;
    session.network_guard().apply_chain_changed(OTHER_CHAIN);
    session.set_draft_name("abc");
    session.set_draft_record("r");

    let mint = session.registry().mint().await.unwrap_err();
    let update = session.registry().update().await.unwrap_err();

    assert!(matches!(mint, GnsError::NetworkMismatch { .. }));
    assert!(matches!(update, GnsError::NetworkMismatch { .. }));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_disconnected_blocks_writes() {
    let gateway = MockGateway::new(alice(), common::TARGET_CHAIN);
    let (session, _) = common::session(&gateway);
    session.start().await;
    gateway.clear_calls();
    session.set_draft_name("abc");

    assert_eq!(session.registry().mint().await, Err(GnsError::NotConnected));
    assert!(gateway.contract_calls().is_empty());
}

#[tokio::test]
async fn test_second_mutation_refused_while_pending() {
    let (gateway, session, _) = ready_session().await;
    session.set_draft_name("abc");
    session.set_draft_record("r");
    let registry = session.registry();

    let release = gateway.hold_next_receipt();
    let contender = async {
        assert!(registry.is_busy());
        let refused = registry.update().await;
        release.send(()).unwrap();
        refused
    };
    let (minted, refused) = futures::join!(registry.mint(), contender);

    assert!(minted.is_ok());
    assert_eq!(refused, Err(GnsError::Busy));
    assert_eq!(gateway.count(|c| matches!(c, GatewayCall::Register { .. })), 1);
    assert_eq!(gateway.count(|c| matches!(c, GatewayCall::SetRecord { .. })), 1);
    assert!(!registry.is_busy());
}

#[tokio::test]
async fn test_network_change_mid_mint_blocks_record() {
    let (gateway, session, _) = ready_session().await;
    session.set_draft_name("abc");
    session.set_draft_record("r");

    let release = gateway.hold_next_receipt();
    let switch_away = async {
        session.network_guard().apply_chain_changed(OTHER_CHAIN);
        release.send(()).unwrap();
    };
    let (minted, ()) = futures::join!(session.registry().mint(), switch_away);

    assert!(matches!(minted, Err(GnsError::PartialMintDivergence { .. })));
    assert!(gateway.is_registered("abc"));
    assert_eq!(gateway.count(|c| matches!(c, GatewayCall::SetRecord { .. })), 0);
}

#[tokio::test]
async fn test_owner_updates_record() {
    let (gateway, session, _) = ready_session().await;
    gateway.seed_domain("abc", "old", alice());
    session.refresh().await;

    session.begin_edit("abc");
    assert_eq!(
        session.draft(),
        DomainDraft {
            name: "abc".into(),
            record: "old".into(),
            editing: true,
        }
    );
    session.set_draft_name("other");
    session.set_draft_record("new");
    assert_eq!(session.draft().name, "abc");

    session.registry().update().await.unwrap();

    assert_eq!(gateway.record_of("abc").as_deref(), Some("new"));
    assert_eq!(session.draft(), DomainDraft::default());
}

#[tokio::test]
async fn test_edit_requires_ownership() {
    let (gateway, session, _) = ready_session().await;
    gateway.seed_domain("wxyz", "theirs", bob());
    session.refresh().await;

    let notice = session.begin_edit("wxyz");

    assert!(notice.message.contains("not owned"));
    assert!(!session.draft().editing);
    assert!(
        session
            .registry()
            .begin_edit("nope", &session.records())
            .is_err()
    );
}

#[tokio::test]
async fn test_contract_rejects_non_owner_update() {
    let (gateway, session, _) = ready_session().await;
    gateway.seed_domain("wxyz", "theirs", bob());
    session.set_draft_name("wxyz");
    session.set_draft_record("mine now");

    let err = session.registry().update().await.unwrap_err();

    assert!(matches!(err, GnsError::TransactionFailed(_)));
    assert_eq!(gateway.record_of("wxyz").as_deref(), Some("theirs"));
    assert_eq!(session.draft().record, "mine now");
}

#[tokio::test]
async fn test_update_requires_both_fields() {
    let (gateway, session, _) = ready_session().await;
    session.set_draft_name("abc");

    assert_eq!(
        session.registry().update().await,
        Err(GnsError::EmptyField("Record"))
    );
    assert!(gateway.calls().is_empty());
}
