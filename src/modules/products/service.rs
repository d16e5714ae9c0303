use tracing::{debug, info, instrument};
use uuid::Uuid;

use letsplay_auth::{Action, Decision, DenyReason, Principal, authorize, decide};
use letsplay_core::{AppError, Page};
use letsplay_db::Store;
use letsplay_models::{CreateProductDto, PatchProductDto, Product, ProductFilter};

pub struct ProductService;

impl ProductService {
    #[instrument(skip(store, principal))]
    pub async fn list(
        store: &dyn Store,
        principal: &Principal,
        filter: ProductFilter,
    ) -> Result<Page<Product>, AppError> {
        authorize(principal, Action::ListProducts, None)?;
        let page = store.list_products(&filter).await?;
        debug!(products.total = page.total, products.returned = page.items.len(), "Listed products");
        Ok(page)
    }

    #[instrument(skip(store, principal), fields(product.id = %id))]
    pub async fn get(store: &dyn Store, principal: &Principal, id: Uuid) -> Result<Product, AppError> {
        authorize(principal, Action::ReadProduct, None)?;
        store
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    /// The owner is always the caller.
    #[instrument(skip_all)]
    pub async fn create(
        store: &dyn Store,
        principal: &Principal,
        dto: CreateProductDto,
    ) -> Result<Product, AppError> {
        authorize(principal, Action::CreateProduct, None)?;
        let owner_id = principal.require_identity()?.subject_id;

        let product = store.insert_product(dto.into_new_product(owner_id)).await?;
        info!(product.id = %product.id, product.owner_id = %owner_id, "Product created");
        Ok(product)
    }

    /// `PUT`: replaces every mutable field.
    #[instrument(skip(store, principal, dto), fields(product.id = %id))]
    pub async fn replace(
        store: &dyn Store,
        principal: &Principal,
        id: Uuid,
        dto: CreateProductDto,
    ) -> Result<Product, AppError> {
        let mut product = Self::load_for_change(store, principal, Action::UpdateProduct, id).await?;
        dto.replace(&mut product);
        Self::save(store, &product).await
    }

    /// `PATCH`: changes only the fields present in the body.
    #[instrument(skip(store, principal, dto), fields(product.id = %id))]
    pub async fn patch(
        store: &dyn Store,
        principal: &Principal,
        id: Uuid,
        dto: PatchProductDto,
    ) -> Result<Product, AppError> {
        let mut product = Self::load_for_change(store, principal, Action::UpdateProduct, id).await?;
        dto.apply(&mut product);
        Self::save(store, &product).await
    }

    #[instrument(skip(store, principal), fields(product.id = %id))]
    pub async fn delete(store: &dyn Store, principal: &Principal, id: Uuid) -> Result<(), AppError> {
        Self::load_for_change(store, principal, Action::DeleteProduct, id).await?;
        if !store.delete_product(id).await? {
            return Err(AppError::not_found("Product not found"));
        }
        info!(product.id = %id, "Product deleted");
        Ok(())
    }

    /// Loads a product the caller wants to modify. Anonymous callers get 401
    /// whether or not the product exists; otherwise a missing product is 404
    /// and someone else's product is 403.
    async fn load_for_change(
        store: &dyn Store,
        principal: &Principal,
        action: Action,
        id: Uuid,
    ) -> Result<Product, AppError> {
        if decide(principal, action, None) == Decision::Deny(DenyReason::Unauthenticated) {
            return Err(AppError::unauthenticated("Authentication is required"));
        }

        let product = store
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        authorize(principal, action, Some(product.owner_id))?;
        Ok(product)
    }

    async fn save(store: &dyn Store, product: &Product) -> Result<Product, AppError> {
        let updated = store
            .update_product(product)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        info!(product.id = %updated.id, "Product updated");
        Ok(updated)
    }
}
