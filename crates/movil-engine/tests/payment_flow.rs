//! Voucher lifecycle scenarios: submission, resubmission, review and the
//! stock consequences of each decision.

mod common;

use std::sync::Arc;

use common::*;

use movil_core::{Money, PaymentMethod, PaymentStatus, SaleItemRequest, SaleStatus};
use movil_db::{Database, Page};
use movil_engine::{
    Actor, CreatedSale, ErrorKind, FileUpload, OrderEngine, PaymentEngine, VoucherSubmission,
};

fn voucher_file() -> FileUpload {
    FileUpload::new("voucher.jpg", "image/jpeg", b"jpeg-bytes".to_vec())
}

fn submission(sale_id: &str, amount: Money) -> VoucherSubmission {
    VoucherSubmission {
        sale_id: sale_id.to_string(),
        amount,
        method: PaymentMethod::Yape,
        file: voucher_file(),
    }
}

/// Creates a sale of two units of a S/ 100.00 phone with stock 10.
async fn sale_of_two(db: &Database, actor: &Actor) -> (i64, CreatedSale) {
    let phone = seed_product(db, "Test Phone", 10_000, 10).await;
    let engine = OrderEngine::new(db.clone());
    let created = engine
        .create_sale(
            actor,
            &[SaleItemRequest {
                product_id: phone.id,
                quantity: 2,
            }],
        )
        .await
        .unwrap();
    (phone.id, created)
}

#[tokio::test]
async fn approve_flow_marks_sale_paid_and_keeps_stock_reserved() {
    let db = test_db().await;
    let store = MemoryObjectStore::shared();
    let engine = PaymentEngine::new(db.clone(), store.clone());

    let (product_id, created) = sale_of_two(&db, &client()).await;
    let total: Money = "200.00".parse().unwrap();
    assert_eq!(created.sale.total(), total);

    let payment = engine
        .submit_voucher(&client(), submission(&created.sale.id, total))
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(store.contains(&payment.voucher_url));

    let decided = engine
        .review_payment(&admin(), payment.id, PaymentStatus::Approved)
        .await
        .unwrap();
    assert_eq!(decided.status, PaymentStatus::Approved);

    let sale = db.sales().get_by_id(&created.sale.id).await.unwrap().unwrap();
    assert_eq!(sale.status, SaleStatus::Paid);

    // Approval consumes the reservation: stock stays at 8.
    let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 8);
}

#[tokio::test]
async fn reject_flow_restores_stock_and_cancels_the_sale() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (product_id, created) = sale_of_two(&db, &client()).await;
    let payment = engine
        .submit_voucher(&client(), submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap();

    engine
        .review_payment(&admin(), payment.id, PaymentStatus::Rejected)
        .await
        .unwrap();

    let sale = db.sales().get_by_id(&created.sale.id).await.unwrap().unwrap();
    assert_eq!(sale.status, SaleStatus::Cancelled);

    let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 10);
}

#[tokio::test]
async fn amount_mismatch_stores_nothing() {
    let db = test_db().await;
    let store = MemoryObjectStore::shared();
    let engine = PaymentEngine::new(db.clone(), store.clone());

    let (_, created) = sale_of_two(&db, &client()).await;

    let err = engine
        .submit_voucher(
            &client(),
            submission(&created.sale.id, Money::from_cents(19_900)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("S/ 200.00"));
    assert!(err.to_string().contains("S/ 199.00"));

    assert_eq!(db.payments().count_for_sale(&created.sale.id).await.unwrap(), 0);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn resubmission_overwrites_the_same_row() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (_, created) = sale_of_two(&db, &client()).await;
    let total = created.sale.total();

    let first = engine
        .submit_voucher(&client(), submission(&created.sale.id, total))
        .await
        .unwrap();

    let mut resubmission = submission(&created.sale.id, total);
    resubmission.method = PaymentMethod::Plin;
    resubmission.file = FileUpload::new("better-voucher.jpg", "image/jpeg", b"v2".to_vec());

    let second = engine
        .submit_voucher(&client(), resubmission)
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.method, PaymentMethod::Plin);
    assert_eq!(second.status, PaymentStatus::Pending);
    assert_ne!(second.voucher_url, first.voucher_url);

    assert_eq!(db.payments().count_for_sale(&created.sale.id).await.unwrap(), 1);
}

#[tokio::test]
async fn decided_payments_are_final() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (product_id, created) = sale_of_two(&db, &client()).await;
    let payment = engine
        .submit_voucher(&client(), submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap();

    engine
        .review_payment(&admin(), payment.id, PaymentStatus::Approved)
        .await
        .unwrap();

    // A second decision must not run the rejection side effects.
    let err = engine
        .review_payment(&admin(), payment.id, PaymentStatus::Rejected)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let sale = db.sales().get_by_id(&created.sale.id).await.unwrap().unwrap();
    assert_eq!(sale.status, SaleStatus::Paid);
    let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 8);
}

#[tokio::test]
async fn pending_is_not_a_decision() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (_, created) = sale_of_two(&db, &client()).await;
    let payment = engine
        .submit_voucher(&client(), submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap();

    let err = engine
        .review_payment(&admin(), payment.id, PaymentStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn foreign_sale_cannot_receive_a_voucher() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (_, created) = sale_of_two(&db, &client()).await;

    let other = seed_extra_client(&db).await;
    let err = engine
        .submit_voucher(&other, submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn upload_outage_leaves_no_payment_row() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), Arc::new(FailingObjectStore));

    let (_, created) = sale_of_two(&db, &client()).await;

    let err = engine
        .submit_voucher(&client(), submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.public_message(), "Internal server error");
    assert_eq!(db.payments().count_for_sale(&created.sale.id).await.unwrap(), 0);
}

#[tokio::test]
async fn review_requires_admin_and_an_existing_payment() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let err = engine
        .review_payment(&client(), 1, PaymentStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = engine
        .review_payment(&admin(), 404, PaymentStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn admin_queues_show_pending_then_history() {
    let db = test_db().await;
    let engine = PaymentEngine::new(db.clone(), MemoryObjectStore::shared());

    let (_, created) = sale_of_two(&db, &client()).await;
    let payment = engine
        .submit_voucher(&client(), submission(&created.sale.id, created.sale.total()))
        .await
        .unwrap();

    let pending = engine
        .pending_payments(&admin(), Page::default())
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, payment.id);
    assert_eq!(pending[0].username, "cliente");
    assert_eq!(pending[0].sale_total_cents, created.sale.total_cents);

    engine
        .review_payment(&admin(), payment.id, PaymentStatus::Approved)
        .await
        .unwrap();

    let pending = engine
        .pending_payments(&admin(), Page::default())
        .await
        .unwrap();
    assert!(pending.is_empty());

    let approved = engine
        .payment_history(&admin(), Some(PaymentStatus::Approved), Page::default())
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);

    let err = engine
        .payment_history(&client(), None, Page::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}
