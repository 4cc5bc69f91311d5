//! Service orchestration tests for sign-in, token resolution, and account
//! creation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::identity::{
    adapters::memory::InMemoryUserAccountRepository,
    domain::{AccessRole, EmailAddress, IdentityDomainError, PasswordHash, UserAccount, UserId},
    ports::{UserAccountRepository, UserAccountRepositoryError, UserAccountRepositoryResult},
    services::{AuthService, AuthServiceError, CreateUserRequest, TokenCodec},
};
use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = AuthService<InMemoryUserAccountRepository, DefaultClock>;

fn codec() -> TokenCodec {
    TokenCodec::new(b"service-test-secret", TimeDelta::hours(12)).expect("valid codec")
}

#[fixture]
fn service() -> TestService {
    AuthService::new(
        Arc::new(InMemoryUserAccountRepository::new()),
        Arc::new(DefaultClock),
        codec(),
    )
}

fn admin_request() -> CreateUserRequest {
    CreateUserRequest::new("Pai Benedito", "admin@terreiro.org", "oxala-123")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_creates_admin_then_refuses_second_call(service: TestService) {
    let admin = service
        .bootstrap_admin(admin_request())
        .await
        .expect("first bootstrap succeeds");
    assert_eq!(admin.role(), AccessRole::Admin);

    let second = service
        .bootstrap_admin(CreateUserRequest::new(
            "Outra Pessoa",
            "other@terreiro.org",
            "secret1",
        ))
        .await;
    assert!(matches!(second, Err(AuthServiceError::AlreadyBootstrapped)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_forces_admin_role(service: TestService) {
    let account = service
        .bootstrap_admin(admin_request().with_role(AccessRole::User))
        .await
        .expect("bootstrap succeeds");
    assert_eq!(account.role(), AccessRole::Admin);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_issues_token_that_resolves_to_account(service: TestService) {
    let admin = service
        .bootstrap_admin(admin_request())
        .await
        .expect("bootstrap succeeds");

    let outcome = service
        .login(" ADMIN@terreiro.org ", "oxala-123")
        .await
        .expect("login succeeds");
    assert_eq!(outcome.identity, admin.identity());

    let resolved = service
        .resolve(outcome.token.as_str())
        .await
        .expect("token resolves");
    assert_eq!(resolved.user_id(), admin.id());
    assert!(resolved.is_admin());
}

#[rstest]
#[case("admin@terreiro.org", "wrong-password")]
#[case("unknown@terreiro.org", "oxala-123")]
#[case("not-an-email", "oxala-123")]
#[tokio::test(flavor = "multi_thread")]
async fn authenticate_rejects_bad_credentials_uniformly(
    service: TestService,
    #[case] email: &str,
    #[case] password: &str,
) {
    service
        .bootstrap_admin(admin_request())
        .await
        .expect("bootstrap succeeds");

    let result = service.authenticate(email, password).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

fn one_verification() -> Duration {
    (0..3)
        .map(|_| {
            let started = Instant::now();
            assert!(!PasswordHash::decoy().verify("oxala-123"));
            started.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[rstest]
#[case("unknown@terreiro.org")]
#[case("not-an-email")]
#[tokio::test(flavor = "multi_thread")]
async fn missing_account_still_pays_for_a_verification(
    service: TestService,
    #[case] email: &str,
) {
    service
        .bootstrap_admin(admin_request())
        .await
        .expect("bootstrap succeeds");
    let baseline = one_verification();

    let started = Instant::now();
    let result = service.authenticate(email, "oxala-123").await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    assert!(
        elapsed >= baseline / 4,
        "rejection took {elapsed:?}, one verification takes {baseline:?}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_rejects_garbage_tokens(service: TestService) {
    let result = service.resolve("garbage").await;
    assert!(matches!(result, Err(AuthServiceError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_rejects_token_for_unknown_account(service: TestService) {
    let stranger = crate::identity::domain::Identity::new(UserId::new(), AccessRole::Admin);
    let token = service.issue_token(&stranger).expect("token issues");

    assert_eq!(service.verify_token(token.as_str()), Some(stranger));
    let result = service.resolve(token.as_str()).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_user_rejects_duplicate_email(service: TestService) {
    service
        .create_user(CreateUserRequest::new("Recepção", "desk@terreiro.org", "secret1"))
        .await
        .expect("first user is created");

    let result = service
        .create_user(CreateUserRequest::new("Recepção 2", "DESK@terreiro.org", "secret2"))
        .await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Repository(
            UserAccountRepositoryError::DuplicateEmail(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_user_propagates_validation_errors(service: TestService) {
    let result = service
        .create_user(CreateUserRequest::new("Recepção", "desk@terreiro.org", "123"))
        .await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Domain(
            IdentityDomainError::PasswordTooShort { .. }
        ))
    ));
}

mockall::mock! {
    Accounts {}

    #[async_trait]
    impl UserAccountRepository for Accounts {
        async fn store(&self, account: &UserAccount) -> UserAccountRepositoryResult<()>;
        async fn find_by_id(&self, id: UserId) -> UserAccountRepositoryResult<Option<UserAccount>>;
        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> UserAccountRepositoryResult<Option<UserAccount>>;
        async fn count(&self) -> UserAccountRepositoryResult<u64>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_surfaces_repository_failures() {
    let mut accounts = MockAccounts::new();
    accounts.expect_find_by_email().returning(|_| {
        Err(UserAccountRepositoryError::persistence(
            std::io::Error::other("connection reset"),
        ))
    });
    let failing = AuthService::new(Arc::new(accounts), Arc::new(DefaultClock), codec());

    let result = failing.login("admin@terreiro.org", "oxala-123").await;
    assert!(matches!(
        result,
        Err(AuthServiceError::Repository(
            UserAccountRepositoryError::Persistence(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_does_not_store_when_accounts_exist() {
    let mut accounts = MockAccounts::new();
    accounts.expect_count().returning(|| Ok(1));
    accounts.expect_store().never();
    let guarded = AuthService::new(Arc::new(accounts), Arc::new(DefaultClock), codec());

    let result = guarded.bootstrap_admin(admin_request()).await;
    assert!(matches!(result, Err(AuthServiceError::AlreadyBootstrapped)));
}
