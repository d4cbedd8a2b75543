use tracing::instrument;
use uuid::Uuid;

use activecenter_core::{AppError, FileStorage, ImageUpload, discard_image, paginate};
use activecenter_db::{Criteria, Repository};
use activecenter_models::{CreateSpaceDto, Space, SpaceFilterParams, UpdateSpaceDto};

pub struct SpaceService;

impl SpaceService {
    #[instrument(skip(repo))]
    pub async fn list_spaces(
        repo: &dyn Repository<Space>,
        filters: &SpaceFilterParams,
    ) -> Result<Vec<Space>, AppError> {
        let candidates = repo.find(&filters.filter()).await?;
        Ok(paginate(candidates, filters.pagination.page_request()))
    }

    #[instrument(skip(repo))]
    pub async fn get_space_by_id(repo: &dyn Repository<Space>, id: Uuid) -> Result<Space, AppError> {
        repo.find_one(Criteria::Id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Space not found"))
    }

    /// Exact, case-sensitive match on the title.
    #[instrument(skip(repo))]
    pub async fn get_space_by_name(
        repo: &dyn Repository<Space>,
        title: &str,
    ) -> Result<Space, AppError> {
        repo.find_one(Criteria::Key(title))
            .await?
            .ok_or_else(|| AppError::not_found(format!("No space titled '{}'", title)))
    }

    #[instrument(skip(repo, files, image))]
    pub async fn create_space(
        repo: &dyn Repository<Space>,
        files: &dyn FileStorage,
        dto: CreateSpaceDto,
        image: Option<ImageUpload>,
    ) -> Result<Space, AppError> {
        // Fail on a taken title before touching file storage.
        if repo.find_one(Criteria::Key(&dto.title)).await?.is_some() {
            return Err(AppError::bad_request(format!(
                "Space with title '{}' already exists",
                dto.title
            )));
        }

        let mut space = Space::new(dto);

        let stored = match image {
            Some(image) => {
                let stored = files
                    .store_image("spaces", &space.id.to_string(), &image)
                    .await?;
                space.image = Some(stored.url.clone());
                Some(stored)
            }
            None => None,
        };

        // The title may have been taken since the check above.
        match repo.save(space).await {
            Ok(space) => {
                tracing::info!(space_id = %space.id, "Space created");
                Ok(space)
            }
            Err(err) => {
                if let Some(stored) = &stored {
                    discard_image(files, stored).await;
                }
                Err(err.into())
            }
        }
    }

    #[instrument(skip(repo))]
    pub async fn update_space(
        repo: &dyn Repository<Space>,
        id: Uuid,
        dto: UpdateSpaceDto,
    ) -> Result<Space, AppError> {
        let mut space = Self::get_space_by_id(repo, id).await?;
        space.apply(dto);
        Ok(repo.save(space).await?)
    }

    /// Flips `active`; calling it again reinstates the space.
    #[instrument(skip(repo))]
    pub async fn retire_space(repo: &dyn Repository<Space>, id: Uuid) -> Result<Space, AppError> {
        let mut space = Self::get_space_by_id(repo, id).await?;
        space.active = !space.active;
        space.updated_at = chrono::Utc::now();

        let space = repo.save(space).await?;
        tracing::info!(space_id = %space.id, active = space.active, "Space retire toggled");
        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activecenter_core::{ErrorKind, LocalFileStorage};
    use activecenter_db::{InMemoryRepository, StoreError, StoreResult};
    use activecenter_models::SpaceFilter;
    use async_trait::async_trait;

    fn dto(title: &str) -> CreateSpaceDto {
        CreateSpaceDto {
            title: title.to_string(),
            description: "Club facility".to_string(),
            price_hour: 12.0,
            max_people: Some(8),
            details: None,
            characteristics: vec![],
        }
    }

    fn storage() -> LocalFileStorage {
        let dir = std::env::temp_dir().join(format!("activecenter-spaces-{}", Uuid::new_v4()));
        LocalFileStorage::new(dir, "http://localhost:3000/files".to_string())
    }

    #[tokio::test]
    async fn test_create_and_fetch_by_name() {
        let repo = InMemoryRepository::<Space>::new();
        let created = SpaceService::create_space(&repo, &storage(), dto("Tennis Court"), None)
            .await
            .unwrap();

        let found = SpaceService::get_space_by_name(&repo, "Tennis Court")
            .await
            .unwrap();
        assert_eq!(found.id, created.id);
        assert!(found.active);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_rejected() {
        let repo = InMemoryRepository::<Space>::new();
        SpaceService::create_space(&repo, &storage(), dto("Gym"), None)
            .await
            .unwrap();

        let err = SpaceService::create_space(&repo, &storage(), dto("Gym"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
    }

    #[tokio::test]
    async fn test_rejected_image_creates_nothing() {
        let repo = InMemoryRepository::<Space>::new();
        let pdf = ImageUpload::new("rules.pdf", "application/pdf", vec![1, 2, 3]);

        let err = SpaceService::create_space(&repo, &storage(), dto("Pool"), Some(pdf))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);
        assert!(repo.find(&Default::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let repo = InMemoryRepository::<Space>::new();
        let err = SpaceService::get_space_by_name(&repo, "Ice Rink")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_retire_is_reversible() {
        let repo = InMemoryRepository::<Space>::new();
        let space = SpaceService::create_space(&repo, &storage(), dto("Court"), None)
            .await
            .unwrap();

        assert!(!SpaceService::retire_space(&repo, space.id).await.unwrap().active);
        assert!(SpaceService::retire_space(&repo, space.id).await.unwrap().active);
    }

    /// Sees no spaces, then loses the title to another writer on save.
    struct TitleRace;

    #[async_trait]
    impl Repository<Space> for TitleRace {
        async fn find(&self, _filter: &SpaceFilter) -> StoreResult<Vec<Space>> {
            Ok(Vec::new())
        }

        async fn find_one(&self, _criteria: Criteria<'_>) -> StoreResult<Option<Space>> {
            Ok(None)
        }

        async fn save(&self, space: Space) -> StoreResult<Space> {
            Err(StoreError::Conflict(format!(
                "Space with title '{}' already exists",
                space.title
            )))
        }
    }

    #[tokio::test]
    async fn test_lost_title_race_discards_stored_image() {
        let files = storage();
        let image = ImageUpload::new("pool.webp", "image/webp", vec![7; 16]);

        let err = SpaceService::create_space(&TitleRace, &files, dto("Pool"), Some(image))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailure);

        let leftovers = std::fs::read_dir(files.base_dir().join("spaces"))
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftovers, 0);
        let _ = std::fs::remove_dir_all(files.base_dir());
    }
}
