use tracing::instrument;
use uuid::Uuid;

use activecenter_auth::Principal;
use activecenter_core::{AppError, paginate};
use activecenter_db::{Criteria, Repository};
use activecenter_models::{
    BanStatusResponse, RoleResponse, UpdateProfileDto, User, UserFilterParams, UserResponse,
};

pub struct UserService;

impl UserService {
    #[instrument(skip(repo))]
    pub async fn get_users(
        repo: &dyn Repository<User>,
        filters: &UserFilterParams,
    ) -> Result<Vec<UserResponse>, AppError> {
        let candidates = repo.find(&filters.filter()).await?;
        Ok(paginate(candidates, filters.pagination.page_request())
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    async fn find_user(repo: &dyn Repository<User>, id: Uuid) -> Result<User, AppError> {
        repo.find_one(Criteria::Id(id))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Members may read only their own record; admins may read any.
    #[instrument(skip(repo))]
    pub async fn get_user(
        repo: &dyn Repository<User>,
        caller: &Principal,
        id: Uuid,
    ) -> Result<UserResponse, AppError> {
        if !caller.can_access(id) {
            return Err(AppError::forbidden("You can only view your own profile"));
        }

        Ok(Self::find_user(repo, id).await?.into())
    }

    #[instrument(skip(repo))]
    pub async fn update_profile(
        repo: &dyn Repository<User>,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<UserResponse, AppError> {
        let mut user = Self::find_user(repo, user_id).await?;

        if let Some(name) = dto.name {
            user.name = name;
        }
        if dto.phone.is_some() {
            user.phone = dto.phone;
        }
        if dto.address.is_some() {
            user.address = dto.address;
        }
        user.updated_at = chrono::Utc::now();

        Ok(repo.save(user).await?.into())
    }

    /// Flips between `active` and `banned`.
    #[instrument(skip(repo))]
    pub async fn toggle_ban(
        repo: &dyn Repository<User>,
        caller: &Principal,
        id: Uuid,
    ) -> Result<BanStatusResponse, AppError> {
        if caller.id == id {
            return Err(AppError::bad_request("You cannot ban yourself"));
        }

        let mut user = Self::find_user(repo, id).await?;
        user.status = user.status.toggled();
        user.updated_at = chrono::Utc::now();

        let user = repo.save(user).await?;
        tracing::info!(user_id = %user.id, status = %user.status, "User ban toggled");
        Ok(BanStatusResponse {
            id: user.id,
            status: user.status,
        })
    }

    /// Flips between `user` and `admin`.
    #[instrument(skip(repo))]
    pub async fn toggle_admin(
        repo: &dyn Repository<User>,
        caller: &Principal,
        id: Uuid,
    ) -> Result<RoleResponse, AppError> {
        if caller.id == id {
            return Err(AppError::bad_request("You cannot change your own role"));
        }

        let mut user = Self::find_user(repo, id).await?;
        user.role = user.role.toggled();
        user.updated_at = chrono::Utc::now();

        let user = repo.save(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User role toggled");
        Ok(RoleResponse {
            id: user.id,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activecenter_auth::{Role, UserStatus};
    use activecenter_core::ErrorKind;
    use activecenter_db::InMemoryRepository;

    async fn seed(repo: &InMemoryRepository<User>, email: &str, role: Role) -> User {
        let user = User::new(
            "Member".to_string(),
            email.to_string(),
            "hash".to_string(),
            role,
        );
        repo.save(user).await.unwrap()
    }

    fn principal(user: &User) -> Principal {
        Principal {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            status: user.status,
        }
    }

    #[tokio::test]
    async fn test_member_reads_only_self() {
        let repo = InMemoryRepository::<User>::new();
        let alice = seed(&repo, "alice@club.test", Role::User).await;
        let bob = seed(&repo, "bob@club.test", Role::User).await;

        let own = UserService::get_user(&repo, &principal(&alice), alice.id)
            .await
            .unwrap();
        assert_eq!(own.id, alice.id);

        let err = UserService::get_user(&repo, &principal(&alice), bob.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_admin_reads_anyone_and_missing_is_not_found() {
        let repo = InMemoryRepository::<User>::new();
        let admin = seed(&repo, "admin@club.test", Role::Admin).await;
        let bob = seed(&repo, "bob@club.test", Role::User).await;

        assert!(UserService::get_user(&repo, &principal(&admin), bob.id).await.is_ok());

        let err = UserService::get_user(&repo, &principal(&admin), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_toggle_ban_round_trip() {
        let repo = InMemoryRepository::<User>::new();
        let admin = seed(&repo, "admin@club.test", Role::Admin).await;
        let bob = seed(&repo, "bob@club.test", Role::User).await;

        let first = UserService::toggle_ban(&repo, &principal(&admin), bob.id)
            .await
            .unwrap();
        assert_eq!(first.status, UserStatus::Banned);

        let second = UserService::toggle_ban(&repo, &principal(&admin), bob.id)
            .await
            .unwrap();
        assert_eq!(second.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_or_ban_self() {
        let repo = InMemoryRepository::<User>::new();
        let admin = seed(&repo, "admin@club.test", Role::Admin).await;

        let err = UserService::toggle_admin(&repo, &principal(&admin), admin.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);

        let err = UserService::toggle_ban(&repo, &principal(&admin), admin.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn test_toggle_admin_promotes() {
        let repo = InMemoryRepository::<User>::new();
        let admin = seed(&repo, "admin@club.test", Role::Admin).await;
        let bob = seed(&repo, "bob@club.test", Role::User).await;

        let response = UserService::toggle_admin(&repo, &principal(&admin), bob.id)
            .await
            .unwrap();
        assert_eq!(response.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_unset_fields() {
        let repo = InMemoryRepository::<User>::new();
        let bob = seed(&repo, "bob@club.test", Role::User).await;

        let updated = UserService::update_profile(
            &repo,
            bob.id,
            UpdateProfileDto {
                name: None,
                phone: Some("611000111".to_string()),
                address: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Member");
        assert_eq!(updated.phone.as_deref(), Some("611000111"));
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let repo = InMemoryRepository::<User>::new();
        seed(&repo, "admin@club.test", Role::Admin).await;
        for i in 0..6 {
            seed(&repo, &format!("member{}@club.test", i), Role::User).await;
        }

        let params: UserFilterParams = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        let page = UserService::get_users(&repo, &params).await.unwrap();
        assert_eq!(page.len(), 5);
        assert!(page.iter().all(|u| u.role == Role::User));
    }
}
