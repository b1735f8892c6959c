//! # Catalog Engine
//!
//! Brand and product administration, plus the public browsing reads.
//!
//! ## Delete Protection
//! Historical sales snapshot product prices but still reference product
//! rows for display joins, so a product with sale lines cannot be
//! deleted. Likewise a brand with assigned products. Both surface as
//! Conflict at the transport boundary.
//!
//! ## Image Handling
//! Product images go through the same object-store port as vouchers.
//! A replaced or deleted product's old image is removed AFTER the
//! database write succeeds; a failed removal only leaves an orphaned
//! blob, which is logged and tolerated.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::auth::Actor;
use crate::error::EngineResult;
use crate::object_store::{FileUpload, ObjectStore};
use movil_core::{
    validate_brand_name, validate_product_fields, validate_upload, Brand, CoreError, NewProduct,
    Product, ProductUpdate,
};
use movil_db::repository::product::{ProductQuery, ProductWithBrand};
use movil_db::{Database, Page};

/// One page of a listing plus the counts the storefront needs to render
/// pagination controls.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    /// Total page count for the same filters.
    pub pages: i64,
}

impl<T> Paginated<T> {
    fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        let limit = page.limit();
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Paginated {
            items,
            page: page.page,
            limit: page.limit,
            total,
            pages,
        }
    }
}

/// Engine for catalog reads and admin mutations.
#[derive(Clone)]
pub struct CatalogEngine {
    db: Database,
    objects: Arc<dyn ObjectStore>,
}

impl CatalogEngine {
    pub fn new(db: Database, objects: Arc<dyn ObjectStore>) -> Self {
        CatalogEngine { db, objects }
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// Lists all brands. Public.
    pub async fn list_brands(&self) -> EngineResult<Vec<Brand>> {
        Ok(self.db.brands().list().await?)
    }

    /// Creates a brand. Admin only. Duplicate names surface as Conflict.
    pub async fn create_brand(&self, actor: &Actor, name: &str) -> EngineResult<Brand> {
        actor.require_admin()?;
        validate_brand_name(name).map_err(CoreError::from)?;

        let brand = self.db.brands().insert(name.trim()).await?;
        info!(brand_id = brand.id, name = %brand.name, "Brand created");
        Ok(brand)
    }

    /// Renames a brand. Admin only.
    pub async fn update_brand(&self, actor: &Actor, id: i64, name: &str) -> EngineResult<Brand> {
        actor.require_admin()?;
        validate_brand_name(name).map_err(CoreError::from)?;

        let brand = self.db.brands().update(id, name.trim()).await?;
        Ok(brand)
    }

    /// Deletes a brand with no assigned products. Admin only.
    pub async fn delete_brand(&self, actor: &Actor, id: i64) -> EngineResult<()> {
        actor.require_admin()?;

        self.db
            .brands()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::BrandNotFound(id))?;

        if self.db.brands().is_referenced(id).await? {
            return Err(CoreError::BrandInUse(id).into());
        }

        self.db.brands().delete(id).await?;
        info!(brand_id = id, "Brand deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists products with brand names, newest first. Public.
    pub async fn list_products(
        &self,
        query: &ProductQuery,
        page: Page,
    ) -> EngineResult<Paginated<ProductWithBrand>> {
        let (items, total) = self.db.products().list(query, page).await?;
        Ok(Paginated::new(items, page, total))
    }

    /// Gets one product with its brand name. Public.
    pub async fn product_by_id(&self, id: i64) -> EngineResult<ProductWithBrand> {
        let product = self
            .db
            .products()
            .get_with_brand(id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;
        Ok(product)
    }

    /// Creates a product, optionally with an image upload. Admin only.
    #[instrument(skip(self, new, image), fields(admin_id = %actor.id, model = %new.model))]
    pub async fn create_product(
        &self,
        actor: &Actor,
        new: &NewProduct,
        image: Option<FileUpload>,
    ) -> EngineResult<Product> {
        actor.require_admin()?;
        validate_product_fields(&new.model, new.price(), new.stock).map_err(CoreError::from)?;

        let image_url = match image {
            Some(file) => Some(self.store_image(&file).await?),
            None => None,
        };

        let product = self.db.products().insert(new, image_url.as_deref()).await?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    /// Replaces a product's mutable fields, optionally swapping its image.
    /// Admin only.
    ///
    /// Without a new image the existing reference is kept. With one, the
    /// new blob is stored first, the row updated, and the old blob removed
    /// last.
    #[instrument(skip(self, update, image), fields(admin_id = %actor.id))]
    pub async fn update_product(
        &self,
        actor: &Actor,
        id: i64,
        update: &ProductUpdate,
        image: Option<FileUpload>,
    ) -> EngineResult<Product> {
        actor.require_admin()?;
        validate_product_fields(&update.model, update.price(), update.stock)
            .map_err(CoreError::from)?;

        let existing = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        let new_image_url = match image {
            Some(file) => Some(self.store_image(&file).await?),
            None => None,
        };

        let image_url = new_image_url.as_deref().or(existing.image_url.as_deref());
        let product = self.db.products().update(id, update, image_url).await?;

        if new_image_url.is_some() {
            if let Some(old) = &existing.image_url {
                self.remove_image(old).await;
            }
        }

        info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Deletes a product with no sale history. Admin only.
    pub async fn delete_product(&self, actor: &Actor, id: i64) -> EngineResult<()> {
        actor.require_admin()?;

        let product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::ProductNotFound(id))?;

        if self.db.products().is_referenced(id).await? {
            return Err(CoreError::ProductInUse(id).into());
        }

        self.db.products().delete(id).await?;

        if let Some(image) = &product.image_url {
            self.remove_image(image).await;
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Stores a product image and returns its reference.
    async fn store_image(&self, file: &FileUpload) -> EngineResult<String> {
        validate_upload(&file.file_name, &file.bytes).map_err(CoreError::from)?;

        let key = format!(
            "products/{}_{}",
            Utc::now().timestamp_millis(),
            file.file_name
        );
        let url = self
            .objects
            .store(&key, &file.bytes, &file.content_type)
            .await?;
        Ok(url)
    }

    /// Best-effort removal of a stale image blob.
    async fn remove_image(&self, reference: &str) {
        if let Err(e) = self.objects.delete(reference).await {
            warn!(reference, error = %e, "Failed to remove stale image");
        }
    }
}

impl std::fmt::Debug for CatalogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEngine").finish_non_exhaustive()
    }
}
