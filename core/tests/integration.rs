//! End-to-end tests against the live mock server.
//!
//! Each test starts the mock server on a random port and drives it through
//! `ApiClient` over real HTTP, so request building, the ureq transport and
//! response parsing are all exercised together.

use std::net::SocketAddr;

use mock_server::{AppState, ServerConfig};
use rivalquest_core::{
    ApiClient, ApiError, PersonalityType, Plan, RivalQuestClient, TierLimits, UreqTransport,
};

const WEBHOOK_SECRET: &str = "sk_test_integration";

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let state = AppState::new(ServerConfig::default().with_secret(WEBHOOK_SECRET));
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    addr
}

fn api(addr: SocketAddr, user: &str) -> ApiClient<UreqTransport> {
    let client = RivalQuestClient::new(&format!("http://{addr}")).with_auth_token(user);
    ApiClient::new(client, UreqTransport::default())
}

#[test]
fn health_needs_no_token() {
    let addr = start_server();
    let anonymous = ApiClient::new(
        RivalQuestClient::new(&format!("http://{addr}")),
        UreqTransport::default(),
    );
    assert_eq!(anonymous.check_health().unwrap().status, "healthy");

    let err = anonymous.list_quests().unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized), "got {err:?}");
}

#[test]
fn quest_lifecycle() {
    let addr = start_server();
    let api = api(addr, "hero");

    let created = api.create_quest("Exercise for 30 minutes").unwrap();
    let quest = created.quest;
    assert_eq!(quest.title, "Exercise for 30 minutes");
    assert!(!quest.completed_today);

    let list = api.list_quests().unwrap();
    assert_eq!(list.total_count, 1);
    assert_eq!(list.limits(), TierLimits::FREE);
    assert!(list.can_complete_more());

    let done = api.complete_today(quest.id).unwrap();
    assert!(done.quest.completed_today);
    assert_eq!(done.quest.current_streak, 1);
    assert_eq!(done.daily_completions_used, 1);
    assert_eq!(done.daily_completions_limit, 5);

    let err = api.complete_today(quest.id).unwrap_err();
    assert!(matches!(err, ApiError::AlreadyCompleted { .. }), "got {err:?}");

    api.delete_quest(quest.id).unwrap();
    let err = api.delete_quest(quest.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }), "got {err:?}");
    assert!(api.list_quests().unwrap().quests.is_empty());
}

#[test]
fn blank_title_is_a_validation_error() {
    let addr = start_server();
    let err = api(addr, "hero").create_quest("   ").unwrap_err();
    let issues = err.validation_issues();
    assert_eq!(issues.len(), 1, "got {err:?}");
    assert_eq!(issues[0].field(), Some("title"));
    assert!(!err.is_upgrade_prompt());
}

#[test]
fn free_tier_daily_limit_is_an_upgrade_prompt() {
    let addr = start_server();
    let api = api(addr, "hero");

    let ids: Vec<i64> = (0..6)
        .map(|i| api.create_quest(&format!("Quest {i}")).unwrap().quest.id)
        .collect();
    for id in &ids[..5] {
        api.complete_today(*id).unwrap();
    }

    let err = api.complete_today(ids[5]).unwrap_err();
    assert!(err.is_upgrade_prompt(), "got {err:?}");

    let list = api.list_quests().unwrap();
    assert_eq!(list.daily_completions_used, 5);
    assert!(!list.can_complete_more());

    let quota = api.get_quota_status().unwrap();
    assert_eq!(quota.current_quest_count, 6);
    assert!(quota.can_create_quest);
    assert!(!quota.has_quest_ceiling());
}

#[test]
fn rival_slots_follow_the_tier() {
    let addr = start_server();
    let api = api(addr, "hero");

    let none = api.get_rival().unwrap();
    assert!(!none.has_rival && none.rival.is_none());

    let first = api.generate_rival(None).unwrap();
    assert_eq!(first.rival.personality_type, PersonalityType::Competitive);
    assert!(first.rival.is_active);
    assert_eq!(api.get_rival().unwrap().rival.unwrap().id, first.rival.id);

    let err = api.generate_rival(Some(PersonalityType::Trickster)).unwrap_err();
    assert!(err.is_upgrade_prompt(), "got {err:?}");

    let rivals = api.list_rivals().unwrap();
    assert_eq!(rivals.slots_used, 1);
    assert!(!rivals.can_generate_more());
}

#[test]
fn upgrade_unlocks_premium_limits() {
    let addr = start_server();
    let api = api(addr, "champion");

    assert!(!api.get_subscription_status().unwrap().is_premium);

    let init = api
        .initialize_payment("champion@example.com", Plan::Monthly, None)
        .unwrap();
    assert!(!init.access_code.is_empty());

    let verified = api.verify_payment(&init.reference).unwrap();
    assert_eq!(verified.status, "success");
    assert_eq!(verified.transaction_data["amount"], Plan::Monthly.pricing().amount_minor);
    assert!(verified.subscription_status.unwrap().is_premium);

    let status = api.get_subscription_status().unwrap();
    assert_eq!(status.subscription_type.as_deref(), Some("monthly"));

    for i in 0..6 {
        let id = api.create_quest(&format!("Quest {i}")).unwrap().quest.id;
        api.complete_today(id).unwrap();
    }
    let list = api.list_quests().unwrap();
    assert_eq!(list.limits(), TierLimits::PREMIUM);
    assert!(list.can_complete_more());

    for personality in PersonalityType::ALL {
        api.generate_rival(Some(personality)).unwrap();
    }
    let rivals = api.list_rivals().unwrap();
    assert_eq!(rivals.max_slots, 5);
    assert_eq!(rivals.total_count, 5);
}

#[test]
fn malformed_reference_never_reaches_the_server() {
    let addr = start_server();
    let err = api(addr, "hero").verify_payment("bad ref/..").unwrap_err();
    assert_eq!(err.validation_issues()[0].field(), Some("reference"));
}

#[test]
fn reference_for_pipe_subject_round_trips() {
    let addr = start_server();
    let api = api(addr, "auth0|abc123");

    let init = api
        .initialize_payment("hero@example.com", Plan::Monthly, None)
        .unwrap();
    assert!(init.reference.starts_with("rq_auth0|abc123_monthly_"));

    let verified = api.verify_payment(&init.reference).unwrap();
    assert_eq!(verified.transaction_data["reference"], init.reference.as_str());
    assert!(api.get_subscription_status().unwrap().is_premium);
}

#[test]
fn foreign_payment_reference_is_not_found() {
    let addr = start_server();
    let init = api(addr, "alice")
        .initialize_payment("alice@example.com", Plan::Annual, None)
        .unwrap();

    let err = api(addr, "mallory").verify_payment(&init.reference).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }), "got {err:?}");
}

#[test]
fn webhook_signature_is_checked() {
    let addr = start_server();
    let api = api(addr, "hero");
    let payload = r#"{"event":"charge.success","data":{"reference":"rq_unknown"}}"#;

    let err = api.paystack_webhook(payload, Some("deadbeef")).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 400, .. }), "got {err:?}");

    let signature = mock_server::sign_webhook(WEBHOOK_SECRET, payload.as_bytes()).unwrap();
    let ack = api.paystack_webhook(payload, Some(&signature)).unwrap();
    assert_eq!(ack["status"], "success");
}

#[test]
fn users_are_isolated() {
    let addr = start_server();
    let alice = api(addr, "alice");
    let bob = api(addr, "bob");

    let quest = alice.create_quest("Alice only").unwrap().quest;
    assert!(bob.list_quests().unwrap().quests.is_empty());

    let err = bob.complete_today(quest.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }), "got {err:?}");
}

#[test]
fn concurrent_clients_share_the_server() {
    let addr = start_server();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let api = api(addr, &format!("user-{i}"));
                let quest = api.create_quest("Parallel quest").unwrap().quest;
                api.complete_today(quest.id).unwrap();
                api.list_quests().unwrap()
            })
        })
        .collect();

    for handle in handles {
        let list = handle.join().unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.daily_completions_used, 1);
    }
}
