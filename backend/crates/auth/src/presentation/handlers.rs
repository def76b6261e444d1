//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use platform::password::PasswordHashing;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{AuthContext, TokenService};
use crate::application::{
    CurrentUserUseCase, DecoyHash, ListUsersUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, UpdateRoleUseCase,
};
use crate::domain::entity::user::UserProfile;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, MessageResponse, RoleUpdatedResponse, SignInRequest, SignUpRequest,
    UpdateRoleRequest, UserResponse, UsersResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub hasher: Arc<dyn PasswordHashing>,
    pub tokens: Arc<TokenService>,
    /// Built on the first sign-in for an unknown email
    pub decoy: Arc<DecoyHash>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Wire the store to the hasher and token service described by `config`
    pub fn new(repo: R, config: &AuthConfig) -> AuthResult<Self> {
        Ok(Self {
            repo: Arc::new(repo),
            hasher: Arc::new(config.password_hasher()?),
            tokens: Arc::new(TokenService::new(config)?),
            decoy: Arc::new(DecoyHash::new()),
        })
    }

    fn sign_up_use_case(&self) -> SignUpUseCase<R> {
        SignUpUseCase::new(self.repo.clone(), self.hasher.clone(), self.tokens.clone())
    }

    fn sign_in_use_case(&self) -> SignInUseCase<R> {
        SignInUseCase::new(self.repo.clone(), self.hasher.clone(), self.tokens.clone())
            .with_decoy(self.decoy.clone())
    }
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/v1/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let output = state.sign_up_use_case().execute(req.into()).await?;

    Ok((StatusCode::CREATED, Json(output.into())))
}

/// POST /api/v1/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = state.sign_in_use_case();

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(output.into()))
}

/// GET /api/v1/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let profile = CurrentUserUseCase::new(state.repo.clone()).execute(&ctx).await?;

    Ok(Json(profile.into()))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/v1/admin/overview
pub async fn admin_overview() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "admin access granted",
    })
}

/// GET /api/v1/admin/users
pub async fn list_users<R>(State(state): State<AuthAppState<R>>) -> AuthResult<Json<UsersResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone()).execute().await?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/admin/users
pub async fn create_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<UserResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = state.sign_up_use_case().register(req.into()).await?;

    tracing::info!(admin_id = %ctx.user_id, user_id = %user.id, "User created by admin");

    Ok((StatusCode::CREATED, Json(UserProfile::from(user).into())))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn update_role<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> AuthResult<Json<RoleUpdatedResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = UserId::from_string(id);
    let role = UpdateRoleUseCase::new(state.repo.clone())
        .execute(&user_id, &req.role)
        .await?;

    Ok(Json(RoleUpdatedResponse {
        id: user_id.into_string(),
        role,
    }))
}
