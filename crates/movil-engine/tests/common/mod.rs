//! Shared fixtures for the engine integration tests.
//!
//! Every test gets its own isolated database (in-memory by default, a
//! temp file when real connection concurrency is needed) seeded with one
//! admin, one customer, one brand and a small catalog.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use movil_core::{NewProduct, Product, Role, User};
use movil_db::{Database, DbConfig};
use movil_engine::{Actor, ObjectStore, ObjectStoreError};

pub const ADMIN_ID: &str = "00000000-0000-4000-8000-00000000000a";
pub const CLIENT_ID: &str = "00000000-0000-4000-8000-00000000000c";

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, Role::Admin)
}

pub fn client() -> Actor {
    Actor::new(CLIENT_ID, Role::Client)
}

/// Fresh in-memory database with the standard seed.
pub async fn test_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(&db).await;
    db
}

/// Fresh file-backed database for tests that need concurrent connections
/// (in-memory SQLite is limited to a single connection).
pub async fn file_db(dir: &tempfile::TempDir) -> Database {
    let path = dir.path().join("test.db");
    let db = Database::new(DbConfig::new(path).max_connections(5))
        .await
        .unwrap();
    seed(&db).await;
    db
}

async fn seed(db: &Database) {
    let now = Utc::now();

    for (id, username, role) in [
        (ADMIN_ID, "admin", Role::Admin),
        (CLIENT_ID, "cliente", Role::Client),
    ] {
        let user = User {
            id: id.to_string(),
            username: username.to_string(),
            full_name: format!("Test {}", username),
            email: format!("{}@movilshop.test", username),
            password_hash: "<test>".to_string(),
            role,
            created_at: now,
        };
        db.users().insert(&user).await.unwrap();
    }
}

/// Registers an extra customer and returns their actor.
pub async fn seed_extra_client(db: &Database) -> Actor {
    let id = Uuid::new_v4().to_string();
    let user = User {
        id: id.clone(),
        username: format!("cliente-{}", &id[..8]),
        full_name: "Otro Cliente".to_string(),
        email: format!("{}@movilshop.test", &id[..8]),
        password_hash: "<test>".to_string(),
        role: Role::Client,
        created_at: Utc::now(),
    };
    db.users().insert(&user).await.unwrap();
    Actor::new(id, Role::Client)
}

/// Inserts a product under a fresh brand and returns it.
pub async fn seed_product(db: &Database, model: &str, price_cents: i64, stock: i64) -> Product {
    let brand = db
        .brands()
        .insert(&format!("Brand-{}", Uuid::new_v4()))
        .await
        .unwrap();

    let new = NewProduct {
        model: model.to_string(),
        description: Some(format!("{} test unit", model)),
        price_cents,
        stock,
        brand_id: Some(brand.id),
    };
    db.products().insert(&new, None).await.unwrap()
}

/// In-memory object store recording every stored blob.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.objects.lock().unwrap().contains_key(reference)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn store(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        let reference = format!("mem://{}", key);
        self.objects
            .lock()
            .unwrap()
            .insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<(), ObjectStoreError> {
        self.objects.lock().unwrap().remove(reference);
        Ok(())
    }
}

/// Object store whose uploads always fail, for outage-path tests.
pub struct FailingObjectStore;

#[async_trait]
impl ObjectStore for FailingObjectStore {
    async fn store(
        &self,
        _key: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        Err(ObjectStoreError::Upload("storage unavailable".to_string()))
    }

    async fn delete(&self, _reference: &str) -> Result<(), ObjectStoreError> {
        Err(ObjectStoreError::Delete("storage unavailable".to_string()))
    }
}
