//! Catalog administration scenarios: brand and product CRUD, delete
//! protection and image replacement.

mod common;

use common::*;

use movil_core::{NewProduct, ProductUpdate, SaleItemRequest};
use movil_db::repository::product::ProductQuery;
use movil_db::Page;
use movil_engine::{CatalogEngine, ErrorKind, FileUpload, OrderEngine};

fn new_phone(model: &str, brand_id: Option<i64>) -> NewProduct {
    NewProduct {
        model: model.to_string(),
        description: Some("Catalog test unit".to_string()),
        price_cents: 99_900,
        stock: 5,
        brand_id,
    }
}

fn image(name: &str) -> FileUpload {
    FileUpload::new(name, "image/png", b"png-bytes".to_vec())
}

#[tokio::test]
async fn brand_names_are_unique() {
    let db = test_db().await;
    let engine = CatalogEngine::new(db, MemoryObjectStore::shared());

    let brand = engine.create_brand(&admin(), "Samsung").await.unwrap();
    let err = engine.create_brand(&admin(), "Samsung").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let brands = engine.list_brands().await.unwrap();
    assert_eq!(brands.len(), 1);

    let renamed = engine
        .update_brand(&admin(), brand.id, "Samsung Peru")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Samsung Peru");

    let err = engine.update_brand(&admin(), 404, "Ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn brand_with_products_cannot_be_deleted() {
    let db = test_db().await;
    let engine = CatalogEngine::new(db, MemoryObjectStore::shared());

    let brand = engine.create_brand(&admin(), "Motorola").await.unwrap();
    engine
        .create_product(&admin(), &new_phone("Moto G84", Some(brand.id)), None)
        .await
        .unwrap();

    let err = engine.delete_brand(&admin(), brand.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Empty brands delete fine.
    let empty = engine.create_brand(&admin(), "Nokia").await.unwrap();
    engine.delete_brand(&admin(), empty.id).await.unwrap();
}

#[tokio::test]
async fn product_validation_and_listing_filters() {
    let db = test_db().await;
    let engine = CatalogEngine::new(db, MemoryObjectStore::shared());

    let brand = engine.create_brand(&admin(), "Xiaomi").await.unwrap();
    engine
        .create_product(&admin(), &new_phone("Redmi Note 12", Some(brand.id)), None)
        .await
        .unwrap();
    engine
        .create_product(&admin(), &new_phone("Poco X5 Pro", Some(brand.id)), None)
        .await
        .unwrap();

    // Business-rule rejects.
    let mut bad = new_phone("", Some(brand.id));
    let err = engine.create_product(&admin(), &bad, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    bad = new_phone("Free Phone", Some(brand.id));
    bad.price_cents = 0;
    let err = engine.create_product(&admin(), &bad, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let page = engine
        .list_products(
            &ProductQuery {
                search: Some("redmi".to_string()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.pages, 1);
    assert_eq!(page.items[0].model, "Redmi Note 12");
    assert_eq!(page.items[0].brand_name.as_deref(), Some("Xiaomi"));
}

#[tokio::test]
async fn replacing_an_image_removes_the_old_blob() {
    let db = test_db().await;
    let store = MemoryObjectStore::shared();
    let engine = CatalogEngine::new(db, store.clone());

    let product = engine
        .create_product(&admin(), &new_phone("Galaxy A54", None), Some(image("v1.png")))
        .await
        .unwrap();
    let first_url = product.image_url.clone().unwrap();
    assert!(store.contains(&first_url));

    let update = ProductUpdate {
        model: product.model.clone(),
        description: product.description.clone(),
        price_cents: 109_900,
        stock: product.stock,
        brand_id: product.brand_id,
    };

    let updated = engine
        .update_product(&admin(), product.id, &update, Some(image("v2.png")))
        .await
        .unwrap();

    let second_url = updated.image_url.unwrap();
    assert_ne!(second_url, first_url);
    assert!(store.contains(&second_url));
    assert!(!store.contains(&first_url));
    assert_eq!(updated.price_cents, 109_900);

    // Updating without a file keeps the current image.
    let kept = engine
        .update_product(&admin(), product.id, &update, None)
        .await
        .unwrap();
    assert_eq!(kept.image_url.as_deref(), Some(second_url.as_str()));
}

#[tokio::test]
async fn sold_products_cannot_be_deleted() {
    let db = test_db().await;
    let engine = CatalogEngine::new(db.clone(), MemoryObjectStore::shared());

    let sold = seed_product(&db, "iPhone 15", 499_900, 5).await;
    OrderEngine::new(db.clone())
        .create_sale(
            &client(),
            &[SaleItemRequest {
                product_id: sold.id,
                quantity: 1,
            }],
        )
        .await
        .unwrap();

    let err = engine.delete_product(&admin(), sold.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let unsold = seed_product(&db, "iPhone 15 Pro", 619_900, 3).await;
    engine.delete_product(&admin(), unsold.id).await.unwrap();
    let err = engine.product_by_id(unsold.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn catalog_mutations_require_admin() {
    let db = test_db().await;
    let engine = CatalogEngine::new(db, MemoryObjectStore::shared());

    let err = engine.create_brand(&client(), "Honor").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = engine
        .create_product(&client(), &new_phone("Honor 90", None), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = engine.delete_product(&client(), 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}
