use tracing::instrument;
use uuid::Uuid;

use activecenter_core::{AppError, FileStorage, ImageUpload, discard_image, paginate};
use activecenter_db::{Criteria, Ledger, ProductChange, Repository};
use activecenter_models::{CreateProductDto, Product, ProductFilterParams, UpdateProductDto};

pub struct ProductService;

impl ProductService {
    /// One page of the products matching `filters`.
    ///
    /// An empty page is a valid answer, including for pages past the end.
    #[instrument(skip(repo))]
    pub async fn list_products(
        repo: &dyn Repository<Product>,
        filters: &ProductFilterParams,
    ) -> Result<Vec<Product>, AppError> {
        let candidates = repo.find(&filters.filter()).await?;
        Ok(paginate(candidates, filters.pagination.page_request()))
    }

    #[instrument(skip(repo))]
    pub async fn get_product_by_id(
        repo: &dyn Repository<Product>,
        id: Uuid,
    ) -> Result<Product, AppError> {
        repo.find_one(Criteria::Id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    #[instrument(skip(repo))]
    pub async fn get_product_by_name(
        repo: &dyn Repository<Product>,
        name: &str,
    ) -> Result<Product, AppError> {
        repo.find_one(Criteria::Key(name))
            .await?
            .ok_or_else(|| AppError::not_found(format!("No product named '{}'", name)))
    }

    /// Stores the optional image first, so a rejected upload creates nothing.
    /// If the save then fails, the stored image is deleted again.
    #[instrument(skip(repo, files, image))]
    pub async fn create_product(
        repo: &dyn Repository<Product>,
        files: &dyn FileStorage,
        dto: CreateProductDto,
        image: Option<ImageUpload>,
    ) -> Result<Product, AppError> {
        let mut product = Product::new(dto);

        let stored = match image {
            Some(image) => {
                let stored = files
                    .store_image("products", &product.id.to_string(), &image)
                    .await?;
                product.image = Some(stored.url.clone());
                Some(stored)
            }
            None => None,
        };

        match repo.save(product).await {
            Ok(product) => {
                tracing::info!(product_id = %product.id, "Product created");
                Ok(product)
            }
            Err(err) => {
                if let Some(stored) = &stored {
                    discard_image(files, stored).await;
                }
                Err(err.into())
            }
        }
    }

    /// Applies `dto` to the current row, leaving stock moved by orders in the
    /// meantime untouched unless `dto` sets it.
    #[instrument(skip(ledger))]
    pub async fn update_product(
        ledger: &dyn Ledger,
        id: Uuid,
        dto: UpdateProductDto,
    ) -> Result<Product, AppError> {
        ledger
            .update_product(id, ProductChange::Update(dto))
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    /// Flips `active`; a retired product is reinstated by retiring it again.
    #[instrument(skip(ledger))]
    pub async fn retire_product(ledger: &dyn Ledger, id: Uuid) -> Result<Product, AppError> {
        let product = ledger
            .update_product(id, ProductChange::ToggleActive)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        tracing::info!(product_id = %product.id, active = product.active, "Product retire toggled");
        Ok(product)
    }
}
