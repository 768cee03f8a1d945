//! Verification-service behavior against stub portal adapters: retry
//! semantics, resource-release accounting, skipped insurers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use eligibility_engine::providers::{EligibilityProvider, ProviderRegistry};
use eligibility_engine::{
    Config, Credential, EligibilityError, EligibilityQuery, EligibilityResult, EligibilityService,
    EligibilityStatus, RunStatus,
};

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        jet_base_url: "https://jet.example.test/JET".into(),
        jet_landing_url: "https://jet.example.test/JET/Landing.aspx".into(),
        nextcare_login_url: "https://pulse.example.test/Login2.aspx".into(),
        chrome_path: None,
        headless: true,
        proxy_url: None,
        element_timeout_ms: 1_000,
        network_idle_timeout_ms: 1_000,
        settle_delay_ms: 0,
        retry_max: 2,
        retry_backoff_ms: 0,
        artifact_dir: "./artifacts".into(),
        max_concurrent_runs: 5,
    })
}

fn eligible_record(emirates_id: &str) -> EligibilityResult {
    EligibilityResult {
        status: RunStatus::Success,
        is_eligible: EligibilityStatus::Eligible,
        reference_no: "12345".into(),
        request_date: "01/01/2025".into(),
        effective_from: "01/01/2025".into(),
        effective_to: "31/12/2025".into(),
        effective_at: "XYZ Clinic".into(),
        coverage_details: "OP consultation covered".into(),
        notes: "Valid member for Service Provider".into(),
        emirates_id: emirates_id.to_string(),
        member_policy_details: Default::default(),
    }
}

/// Stub adapter with the same session shape as the real ones: every check
/// opens one browser and releases it exactly once on every exit path.
struct StubProvider {
    fail_first: u32,
    active: bool,
    opened: AtomicU32,
    released: AtomicU32,
}

impl StubProvider {
    fn new(fail_first: u32) -> Arc<Self> {
        Arc::new(Self {
            fail_first,
            active: true,
            opened: AtomicU32::new(0),
            released: AtomicU32::new(0),
        })
    }

    fn inactive() -> Arc<Self> {
        Arc::new(Self {
            fail_first: 0,
            active: false,
            opened: AtomicU32::new(0),
            released: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl EligibilityProvider for StubProvider {
    fn name(&self) -> &str {
        "Stub"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn inactive_reason(&self) -> Option<String> {
        (!self.active).then(|| "stub disabled".to_string())
    }

    async fn check(
        &self,
        _credential: &Credential,
        query: &EligibilityQuery,
    ) -> Result<EligibilityResult, EligibilityError> {
        let attempt = self.opened.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = if attempt <= self.fail_first {
            Err(EligibilityError::Extraction("result container missing".into()))
        } else {
            Ok(eligible_record(query.emirates_id()))
        };

        self.released.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

fn service_with(stub: Arc<StubProvider>) -> EligibilityService {
    let registry = Arc::new(ProviderRegistry::with_providers(vec![
        stub as Arc<dyn EligibilityProvider>,
    ]));
    EligibilityService::new(test_config(), registry)
}

fn stub_query() -> EligibilityQuery {
    EligibilityQuery::new("784199012345671", "501234567", "STUB").unwrap()
}

#[tokio::test]
async fn returns_attempt_two_result_after_transient_failure() {
    let stub = StubProvider::new(1);
    let service = service_with(stub.clone());

    let result = service
        .verify(&Credential::new("user", "pass"), &stub_query())
        .await
        .expect("second attempt should succeed");

    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.is_eligible, EligibilityStatus::Eligible);
    assert_eq!(stub.opened.load(Ordering::SeqCst), 2);
    assert_eq!(stub.released.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn surfaces_typed_failure_when_all_attempts_fail() {
    let stub = StubProvider::new(u32::MAX);
    let service = service_with(stub.clone());

    let result = service
        .verify(&Credential::new("user", "pass"), &stub_query())
        .await;

    match result {
        Err(EligibilityError::AttemptsExhausted { attempts, last }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(*last, EligibilityError::Extraction(_)));
        }
        other => panic!("expected AttemptsExhausted, got {:?}", other.map(|r| r.status)),
    }

    // One release per attempt, even though every attempt failed.
    assert_eq!(stub.opened.load(Ordering::SeqCst), 2);
    assert_eq!(stub.released.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_insurer_is_skipped_without_navigation() {
    let stub = StubProvider::new(0);
    let service = service_with(stub.clone());

    let query = EligibilityQuery::new("784199012345671", "501234567", "DAMAN").unwrap();
    let result = service
        .verify(&Credential::new("user", "pass"), &query)
        .await
        .expect("unknown insurer must not be an error");

    assert_eq!(result.status, RunStatus::Skipped);
    assert_eq!(result.is_eligible, EligibilityStatus::Unknown);
    assert!(result.notes.contains("DAMAN"));
    assert_eq!(stub.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn inactive_adapter_is_rejected_before_navigation() {
    let stub = StubProvider::inactive();
    let service = service_with(stub.clone());

    let result = service
        .verify(&Credential::new("user", "pass"), &stub_query())
        .await;

    assert!(matches!(result, Err(EligibilityError::ProviderInactive(_))));
    assert_eq!(stub.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_query_never_reaches_a_browser() {
    // Construction itself rejects the identifiers, so no adapter is ever
    // consulted for these.
    assert!(matches!(
        EligibilityQuery::new("784123", "501234567", "STUB"),
        Err(EligibilityError::Validation(_))
    ));
    assert!(matches!(
        EligibilityQuery::new("784199012345671", "601234567", "STUB"),
        Err(EligibilityError::Validation(_))
    ));
}

#[tokio::test]
async fn successful_result_is_never_partially_labeled() {
    let stub = StubProvider::new(0);
    let service = service_with(stub);

    let result = service
        .verify(&Credential::new("user", "pass"), &stub_query())
        .await
        .unwrap();

    assert_eq!(result.status, RunStatus::Success);
    assert!(matches!(
        result.is_eligible,
        EligibilityStatus::Eligible | EligibilityStatus::NotEligible | EligibilityStatus::Unknown
    ));
    assert_eq!(result.emirates_id, "784199012345671");
}
