use tracing::instrument;

use activecenter_auth::{Principal, Role, create_access_token};
use activecenter_config::JwtConfig;
use activecenter_core::{AppError, hash_password, verify_password};
use activecenter_db::{Criteria, Repository};
use activecenter_models::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};

pub struct AuthService;

/// Emails are stored and looked up in lowercase.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    #[instrument(skip(repo, dto), fields(email = %dto.email))]
    pub async fn register_user(
        repo: &dyn Repository<User>,
        dto: RegisterRequest,
    ) -> Result<UserResponse, AppError> {
        let email = normalize_email(&dto.email);

        if repo.find_one(Criteria::Key(&email)).await?.is_some() {
            return Err(AppError::bad_request("Email already exists"));
        }

        let password_hash = hash_password(&dto.password)?;

        let mut user = User::new(dto.name, email, password_hash, Role::User);
        user.phone = dto.phone;
        user.address = dto.address;

        let user = repo.save(user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Wrong email and wrong password fail identically. A banned account is
    /// only reported once its password has been verified.
    #[instrument(skip(repo, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        repo: &dyn Repository<User>,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&dto.email);

        let user = repo
            .find_one(Criteria::Key(&email))
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        if user.is_banned() {
            tracing::warn!(user_id = %user.id, "Banned user attempted login");
            return Err(AppError::forbidden("This account has been banned"));
        }

        let access_token =
            create_access_token(user.id, &user.email, user.role, user.status, jwt_config)?;

        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    #[instrument(skip(repo))]
    pub async fn current_user(
        repo: &dyn Repository<User>,
        principal: &Principal,
    ) -> Result<UserResponse, AppError> {
        let user = repo
            .find_one(Criteria::Id(principal.id))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(user.into())
    }
}
