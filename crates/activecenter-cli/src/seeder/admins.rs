use activecenter_auth::Role;
use activecenter_core::{AppError, hash_password};
use activecenter_db::Repository;
use activecenter_models::{RegisterRequest, User};
use validator::Validate;

/// Creates an administrator account.
///
/// The input goes through the same validation as public registration.
/// A taken email is rejected as a validation failure.
pub async fn create_admin(
    repo: &dyn Repository<User>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: email.trim().to_lowercase(),
        password: password.to_string(),
        phone: None,
        address: None,
    };
    request.validate()?;

    let password_hash = hash_password(&request.password)?;
    let admin = User::new(request.name, request.email, password_hash, Role::Admin);

    Ok(repo.save(admin).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use activecenter_core::{ErrorKind, verify_password};
    use activecenter_db::InMemoryRepository;

    #[tokio::test]
    async fn test_create_admin() {
        let repo = InMemoryRepository::<User>::new();
        let admin = create_admin(&repo, " Club Admin ", "Admin@Club.test", "changeme123")
            .await
            .unwrap();

        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "Club Admin");
        assert_eq!(admin.email, "admin@club.test");
        assert!(verify_password("changeme123", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_email() {
        let repo = InMemoryRepository::<User>::new();
        create_admin(&repo, "One", "admin@club.test", "changeme123")
            .await
            .unwrap();

        let err = create_admin(&repo, "Two", "admin@club.test", "changeme123")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn test_create_admin_rejects_short_password() {
        let repo = InMemoryRepository::<User>::new();
        let err = create_admin(&repo, "Admin", "admin@club.test", "short")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }
}
