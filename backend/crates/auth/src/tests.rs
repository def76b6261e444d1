//! Use-case and router tests for the auth crate.
//! All run against the in-memory store with cheap Argon2 parameters.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use platform::password::{
        ClearTextPassword, HashParams, HashedPassword, PasswordHashError, PasswordHashing,
    };

    use crate::application::config::AuthConfig;
    use crate::application::token::TokenService;
    use crate::application::{SignInInput, SignUpInput};
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
    use crate::error::AuthResult;
    use crate::infra::memory::InMemoryUserRepository;

    pub const TEST_SECRET: &[u8] = b"test_secret_key_1234567890";
    pub const PASSWORD: &str = "correct horse battery";

    pub fn test_config() -> AuthConfig {
        AuthConfig::new(TEST_SECRET.to_vec()).with_hash_params(HashParams {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
    }

    pub fn hasher() -> Arc<dyn PasswordHashing> {
        Arc::new(test_config().password_hasher().unwrap())
    }

    pub fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(&test_config()).unwrap())
    }

    pub fn sign_up_input(email: &str, role: Option<&str>) -> SignUpInput {
        SignUpInput {
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            role: role.map(str::to_string),
        }
    }

    pub fn sign_in_input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Wraps the test hasher and counts hash and verify calls separately
    #[derive(Clone)]
    pub struct CountingHasher {
        inner: Arc<dyn PasswordHashing>,
        pub hashes: Arc<AtomicUsize>,
        pub verifies: Arc<AtomicUsize>,
    }

    impl CountingHasher {
        pub fn new() -> Self {
            Self {
                inner: hasher(),
                hashes: Arc::default(),
                verifies: Arc::default(),
            }
        }

        pub fn hashes(&self) -> usize {
            self.hashes.load(Ordering::SeqCst)
        }

        pub fn verifies(&self) -> usize {
            self.verifies.load(Ordering::SeqCst)
        }
    }

    impl PasswordHashing for CountingHasher {
        fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
            self.hashes.fetch_add(1, Ordering::SeqCst);
            self.inner.hash(password)
        }

        fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(password, hashed)
        }
    }

    /// Wraps the in-memory store and counts every call that reaches it
    #[derive(Clone, Default)]
    pub struct CountingRepo {
        pub inner: InMemoryUserRepository,
        pub calls: Arc<AtomicUsize>,
    }

    impl CountingRepo {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl UserRepository for CountingRepo {
        async fn create(&self, user: &User) -> AuthResult<()> {
            self.hit();
            self.inner.create(user).await
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            self.hit();
            self.inner.find_by_email(email).await
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            self.hit();
            self.inner.find_by_id(user_id).await
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            self.hit();
            self.inner.list().await
        }

        async fn update_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<()> {
            self.hit();
            self.inner.update_role(user_id, role).await
        }
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::SignUpUseCase;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, user_role::UserRole};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryUserRepository;
    use platform::password::ClearTextPassword;

    fn use_case(repo: &InMemoryUserRepository) -> SignUpUseCase<InMemoryUserRepository> {
        SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens())
    }

    #[tokio::test]
    async fn test_sign_up_returns_profile_and_valid_token() {
        let repo = InMemoryUserRepository::new();
        let output = use_case(&repo)
            .execute(sign_up_input("new@example.com", None))
            .await
            .unwrap();

        assert_eq!(output.user.email.as_str(), "new@example.com");
        assert_eq!(output.user.role, UserRole::Viewer);

        let claims = tokens().validate(&output.token).unwrap();
        assert_eq!(claims.sub, output.user.id.as_str());
        assert_eq!(claims.role, UserRole::Viewer);
        assert_eq!(claims.exp, output.expires_at.timestamp());
    }

    #[tokio::test]
    async fn test_stored_hash_is_not_the_password() {
        let repo = InMemoryUserRepository::new();
        use_case(&repo)
            .execute(sign_up_input("hash@example.com", Some("analyst")))
            .await
            .unwrap();

        let stored = repo
            .find_by_email(&Email::new("hash@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.role, UserRole::Analyst);
        assert_ne!(stored.password_hash.as_phc_string(), PASSWORD);
        assert!(stored.password_hash.as_phc_string().starts_with("$argon2id$"));
        assert!(hasher().verify(
            &ClearTextPassword::for_verification(PASSWORD.to_string()),
            &stored.password_hash
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_and_store_unchanged() {
        let repo = InMemoryUserRepository::new();
        let first = use_case(&repo)
            .execute(sign_up_input("dup@example.com", None))
            .await
            .unwrap();

        let result = use_case(&repo)
            .execute(sign_up_input("dup@example.com", Some("admin")))
            .await;
        assert!(matches!(result, Err(AuthError::EmailExists)));

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(&first.user.id).await.unwrap().unwrap();
        assert_eq!(stored.role, UserRole::Viewer);
    }

    #[tokio::test]
    async fn test_invalid_role_rejected_before_store_access() {
        let repo = CountingRepo::default();
        let use_case = SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens());

        let result = use_case
            .execute(sign_up_input("role@example.com", Some("superuser")))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidRole(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let repo = InMemoryUserRepository::new();
        let uc = use_case(&repo);

        let mut input = sign_up_input("not-an-email", None);
        assert!(matches!(uc.execute(input).await, Err(AuthError::Validation(_))));

        input = sign_up_input("short@example.com", None);
        input.password = "short".to_string();
        assert!(matches!(uc.execute(input).await, Err(AuthError::Validation(_))));

        input = sign_up_input("blank@example.com", None);
        input.full_name = "   ".to_string();
        assert!(matches!(uc.execute(input).await, Err(AuthError::Validation(_))));

        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_role_defaults_to_viewer() {
        let repo = InMemoryUserRepository::new();
        let output = use_case(&repo)
            .execute(sign_up_input("empty-role@example.com", Some("")))
            .await
            .unwrap();
        assert_eq!(output.user.role, UserRole::Viewer);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sign_ups_with_same_email() {
        let repo = InMemoryUserRepository::new();
        let use_case = Arc::new(use_case(&repo));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let uc = use_case.clone();
                tokio::spawn(
                    async move { uc.execute(sign_up_input("race@example.com", None)).await },
                )
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AuthError::EmailExists) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.len().await, 1);
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use chrono::{TimeDelta, Utc};

    use super::support::*;
    use crate::application::{DecoyHash, SignInUseCase, SignUpUseCase};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryUserRepository;

    async fn seeded() -> (InMemoryUserRepository, SignInUseCase<InMemoryUserRepository>) {
        let repo = InMemoryUserRepository::new();
        SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens())
            .execute(sign_up_input("login@example.com", Some("manager")))
            .await
            .unwrap();
        let sign_in = SignInUseCase::new(Arc::new(repo.clone()), hasher(), tokens());
        (repo, sign_in)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (_repo, sign_in) = seeded().await;
        let output = sign_in
            .execute(sign_in_input("login@example.com", PASSWORD))
            .await
            .unwrap();

        let claims = tokens().validate(&output.token).unwrap();
        assert_eq!(claims.email, "login@example.com");
        assert_eq!(claims.sub, output.user.id.as_str());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_repo, sign_in) = seeded().await;

        let wrong_password = sign_in
            .execute(sign_in_input("login@example.com", "wrong password!"))
            .await
            .unwrap_err();
        let unknown_email = sign_in
            .execute(sign_in_input("nobody@example.com", PASSWORD))
            .await
            .unwrap_err();
        let malformed = sign_in
            .execute(sign_in_input("garbage", PASSWORD))
            .await
            .unwrap_err();

        for err in [&wrong_password, &unknown_email, &malformed] {
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_unknown_email_pays_for_a_verify() {
        let (repo, _) = seeded().await;
        let counting = CountingHasher::new();
        let sign_in = SignInUseCase::new(Arc::new(repo), Arc::new(counting.clone()), tokens());

        let err = sign_in
            .execute(sign_in_input("login@example.com", "wrong password!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(counting.verifies(), 1);

        for email in ["nobody@example.com", "ghost@example.com", "garbage"] {
            let err = sign_in
                .execute(sign_in_input(email, PASSWORD))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
        assert_eq!(counting.verifies(), 4);
        // The decoy is hashed once and reused
        assert_eq!(counting.hashes(), 1);
    }

    #[tokio::test]
    async fn test_decoy_is_shared_between_use_cases() {
        let (repo, _) = seeded().await;
        let counting = CountingHasher::new();
        let decoy = Arc::new(DecoyHash::new());

        for _ in 0..2 {
            let sign_in =
                SignInUseCase::new(Arc::new(repo.clone()), Arc::new(counting.clone()), tokens())
                    .with_decoy(decoy.clone());
            assert!(
                sign_in
                    .execute(sign_in_input("nobody@example.com", PASSWORD))
                    .await
                    .is_err()
            );
        }
        assert_eq!(counting.hashes(), 1);
        assert_eq!(counting.verifies(), 2);
    }

    #[tokio::test]
    async fn test_token_lifetime() {
        let (_repo, sign_in) = seeded().await;
        let output = sign_in
            .execute(sign_in_input("login@example.com", PASSWORD))
            .await
            .unwrap();

        let svc = tokens();
        let now = Utc::now();
        assert!(svc.validate_at(&output.token, now + TimeDelta::minutes(1)).is_ok());
        assert!(matches!(
            svc.validate_at(&output.token, now + TimeDelta::hours(25)),
            Err(AuthError::InvalidToken)
        ));
    }
}

#[cfg(test)]
mod admin_use_case_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::token::AuthContext;
    use crate::application::{
        CurrentUserUseCase, ListUsersUseCase, SignUpUseCase, UpdateRoleUseCase,
    };
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryUserRepository;

    #[tokio::test]
    async fn test_update_role() {
        let repo = InMemoryUserRepository::new();
        let user = SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens())
            .register(sign_up_input("promote@example.com", None))
            .await
            .unwrap();

        let uc = UpdateRoleUseCase::new(Arc::new(repo.clone()));
        assert_eq!(uc.execute(&user.id, "manager").await.unwrap(), UserRole::Manager);
        assert_eq!(
            repo.find_by_id(&user.id).await.unwrap().unwrap().role,
            UserRole::Manager
        );

        assert!(matches!(
            uc.execute(&user.id, "owner").await,
            Err(AuthError::InvalidRole(_))
        ));
        assert!(matches!(
            uc.execute(&UserId::from_string("missing"), "admin").await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_users_newest_first() {
        let repo = InMemoryUserRepository::new();
        let sign_up = SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens());
        for email in ["one@example.com", "two@example.com", "three@example.com"] {
            sign_up.register(sign_up_input(email, None)).await.unwrap();
        }

        let users = ListUsersUseCase::new(Arc::new(repo)).execute().await.unwrap();
        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["three@example.com", "two@example.com", "one@example.com"]);
    }

    #[tokio::test]
    async fn test_current_user() {
        let repo = InMemoryUserRepository::new();
        let user = SignUpUseCase::new(Arc::new(repo.clone()), hasher(), tokens())
            .register(sign_up_input("me@example.com", None))
            .await
            .unwrap();

        let uc = CurrentUserUseCase::new(Arc::new(repo));
        let ctx = AuthContext {
            user_id: user.id.clone(),
            role: user.role,
            email: user.email.as_str().to_string(),
        };
        assert_eq!(uc.execute(&ctx).await.unwrap().id, user.id);

        let ghost = AuthContext {
            user_id: UserId::from_string("ghost"),
            ..ctx
        };
        assert!(matches!(uc.execute(&ghost).await, Err(AuthError::UserNotFound)));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Router, middleware};
    use chrono::{TimeDelta, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::handlers::AuthAppState;
    use crate::presentation::middleware::require_auth;
    use crate::presentation::router::api_router;

    fn state() -> AuthAppState<InMemoryUserRepository> {
        AuthAppState::new(InMemoryUserRepository::new(), &test_config()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn sign_up(app: &Router, email: &str, role: &str) -> Value {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/auth/signup",
                None,
                json!({
                    "fullName": "Router Test",
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_sign_up_and_login_over_http() {
        let app = api_router(state());

        let body = sign_up(&app, "http@example.com", "viewer").await;
        assert_eq!(body["user"]["email"], "http@example.com");
        assert_eq!(body["user"]["fullName"], "Router Test");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["token"].is_string());
        assert!(body["expiresAt"].is_string());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({ "email": "http@example.com", "password": PASSWORD }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();

        let bearer = format!("Bearer {token}");
        let (status, me) = send(&app, get_request("/auth/me", Some(&bearer))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "http@example.com");
        assert_eq!(me["role"], "viewer");
    }

    #[tokio::test]
    async fn test_error_statuses_over_http() {
        let app = api_router(state());
        sign_up(&app, "taken@example.com", "viewer").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/auth/signup",
                None,
                json!({ "fullName": "X", "email": "taken@example.com", "password": PASSWORD }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/signup",
                None,
                json!({
                    "fullName": "X",
                    "email": "r@example.com",
                    "password": PASSWORD,
                    "role": "root"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({ "email": "taken@example.com", "password": "nope-nope-nope" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_role() {
        let app = api_router(state());

        let (status, _) = send(&app, get_request("/admin/overview", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let viewer = sign_up(&app, "viewer@example.com", "viewer").await;
        let viewer_auth = format!("Bearer {}", viewer["token"].as_str().unwrap());
        let (status, _) = send(&app, get_request("/admin/overview", Some(&viewer_auth))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, get_request("/admin/users", Some(&viewer_auth))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = sign_up(&app, "admin@example.com", "admin").await;
        let admin_auth = format!("Bearer {}", admin["token"].as_str().unwrap());
        let (status, body) = send(&app, get_request("/admin/overview", Some(&admin_auth))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "admin access granted");
    }

    #[tokio::test]
    async fn test_admin_user_management() {
        let app = api_router(state());
        let admin = sign_up(&app, "boss@example.com", "admin").await;
        let token = admin["token"].as_str().unwrap().to_string();

        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/admin/users",
                Some(&token),
                json!({ "fullName": "Staff", "email": "staff@example.com", "password": PASSWORD }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["role"], "viewer");
        assert!(created.get("token").is_none());
        let staff_id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            json_request(
                "PUT",
                &format!("/admin/users/{staff_id}/role"),
                Some(&token),
                json!({ "role": "analyst" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, json!({ "id": staff_id, "role": "analyst" }));

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                "/admin/users/does-not-exist/role",
                Some(&token),
                json!({ "role": "analyst" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let bearer = format!("Bearer {token}");
        let (status, list) = send(&app, get_request("/admin/users", Some(&bearer))).await;
        assert_eq!(status, StatusCode::OK);
        let users = list["users"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["email"], "staff@example.com");
        assert_eq!(users[0]["role"], "analyst");
    }

    #[tokio::test]
    async fn test_require_auth_blocks_handler() {
        let state = state();
        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();

        let app = Router::new()
            .route(
                "/protected",
                get(move || {
                    let flag = flag.clone();
                    async move {
                        flag.store(true, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(state.tokens.clone(), require_auth));

        let user = crate::application::SignUpUseCase::new(
            state.repo.clone(),
            state.hasher.clone(),
            state.tokens.clone(),
        )
        .register(sign_up_input("expired@example.com", None))
        .await
        .unwrap();
        let expired = state
            .tokens
            .issue_at(&user, Utc::now() - TimeDelta::hours(25))
            .unwrap();

        for authorization in [
            None,
            Some("Basic dXNlcjpwYXNz".to_string()),
            Some("Bearer not-a-token".to_string()),
            Some(format!("Bearer {}", expired.token)),
        ] {
            let (status, _) = send(&app, get_request("/protected", authorization.as_deref())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
        assert!(!reached.load(Ordering::SeqCst));

        let valid = state.tokens.issue(&user).unwrap();
        let response = app
            .clone()
            .oneshot(get_request("/protected", Some(&format!("Bearer {}", valid.token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(reached.load(Ordering::SeqCst));
    }
}
