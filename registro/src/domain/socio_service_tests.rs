//! Tests for the member service.

use std::sync::Arc;

use mockable::DefaultClock;
use pagination::PageRequest;
use serde_json::json;

use super::*;
use crate::domain::ports::{MockImageStore, MockSocioRepository, RemoteApiError};
use crate::domain::{ErrorCode, ImageDataUri};
use crate::test_support::logged_in_session;

type Service = SocioService<MockSocioRepository, MockImageStore>;

async fn make_service(repo: MockSocioRepository, images: MockImageStore) -> Service {
    let session = logged_in_session(Arc::new(DefaultClock), 11, "user").await;
    SocioService::new(Arc::new(repo), Arc::new(images), session)
}

fn draft() -> SocioDraft {
    SocioDraft {
        cedula: "0102030405".into(),
        pnombre: "juan".into(),
        papellido: "perez".into(),
        ptelefono: "0987654321".into(),
        autoidentificacionfk: 1,
        cargoid: 2,
        provinciaid: 3,
        regionid: 1,
        foto: Some(ImageDataUri::new("data:image/png;base64,Zm90bw==")),
        firma: Some(ImageDataUri::new("data:image/png;base64,ZmlybWE=")),
        ..SocioDraft::default()
    }
}

fn socio(codunico: &str, pnombre: &str) -> Socio {
    serde_json::from_value(json!({
        "codunico": codunico,
        "cedula": "0102030405",
        "pnombre": pnombre,
        "papellido": "PEREZ",
        "ptelefono": "0987654321",
        "provinciaid": 1,
        "rutafoto": "",
        "rutafirma": "",
        "registradoPorid": 11,
    }))
    .expect("fixture socio decodes")
}

#[tokio::test]
async fn register_writes_photo_then_signature_then_creates() {
    let mut images = MockImageStore::new();
    let mut sequence = mockall::Sequence::new();
    images
        .expect_write()
        .withf(|_, kind, bytes| *kind == ImageKind::Foto && bytes == b"foto")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok("/tmp/foto".to_owned()));
    images
        .expect_write()
        .withf(|_, kind, bytes| *kind == ImageKind::Firma && bytes == b"firma")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _, _| Ok("/tmp/firma".to_owned()));

    let mut repo = MockSocioRepository::new();
    repo.expect_create()
        .withf(|_, body| {
            body.rutafoto == "FSEIMAGES/PEREZ_JUAN_0102030405/PEREZ_JUAN_0102030405_FOTO.PNG"
                && body.rutafirma
                    == "FSEIMAGES/PEREZ_JUAN_0102030405/PEREZ_JUAN_0102030405_FIRMA.PNG"
                && body.registrado_porid == 11
                && body.pnombre == "JUAN"
        })
        .times(1)
        .returning(|_, _| Ok(socio("FSE-1", "JUAN")));

    let created = make_service(repo, images)
        .await
        .register(draft())
        .await
        .expect("registration succeeds");
    assert_eq!(created.codunico, "FSE-1");
}

#[tokio::test]
async fn register_with_missing_phone_never_calls_the_api() {
    let mut repo = MockSocioRepository::new();
    repo.expect_create().never();
    let mut images = MockImageStore::new();
    images.expect_write().never();

    let err = make_service(repo, images)
        .await
        .register(SocioDraft {
            ptelefono: String::new(),
            ..draft()
        })
        .await
        .expect_err("validation fails");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_aborts_when_the_signature_cannot_be_saved() {
    let mut images = MockImageStore::new();
    images
        .expect_write()
        .withf(|_, kind, _| *kind == ImageKind::Foto)
        .returning(|_, _, _| Ok("/tmp/foto".to_owned()));
    images
        .expect_write()
        .withf(|_, kind, _| *kind == ImageKind::Firma)
        .returning(|_, _, _| {
            Err(crate::domain::ports::ImageStoreError::write(
                "/tmp/firma",
                "permission denied",
            ))
        });
    let mut repo = MockSocioRepository::new();
    repo.expect_create().never();

    let err = make_service(repo, images)
        .await
        .register(draft())
        .await
        .expect_err("signature write fails");
    assert_eq!(err.message(), "Error al guardar la firma");
}

#[tokio::test]
async fn update_keeps_existing_images_and_resets_printed_flag() {
    let mut images = MockImageStore::new();
    images.expect_write().never();
    let mut repo = MockSocioRepository::new();
    repo.expect_update()
        .withf(|_, codunico, changes| {
            codunico == "FSE-1"
                && changes.impreso == Some(false)
                && changes.rutafoto.is_none()
                && changes.rutafirma.is_none()
        })
        .times(1)
        .returning(|_, _, _| Ok(socio("FSE-1", "JUAN")));

    make_service(repo, images)
        .await
        .update(
            "FSE-1",
            SocioDraft {
                foto: None,
                firma: None,
                ..draft()
            },
        )
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn list_filters_then_paginates() {
    let mut repo = MockSocioRepository::new();
    repo.expect_list().times(1).returning(|_| {
        Ok((1..=25)
            .map(|n| socio(&format!("FSE-{n:02}"), if n % 2 == 0 { "ANA" } else { "LUIS" }))
            .collect())
    });

    let page = make_service(repo, MockImageStore::new())
        .await
        .list(PageRequest::new(2, 10).expect("valid page"), Some("ana"))
        .await
        .expect("list succeeds");
    assert_eq!(page.total_items(), 12);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items().len(), 2);
}

#[tokio::test]
async fn remote_errors_fall_back_to_operation_message() {
    let mut repo = MockSocioRepository::new();
    repo.expect_delete()
        .returning(|_, _| Err(RemoteApiError::rejected(500_u16, "")));

    let err = make_service(repo, MockImageStore::new())
        .await
        .delete("FSE-1")
        .await
        .expect_err("delete fails");
    assert_eq!(err.message(), "Error eliminando el socio");
}

#[tokio::test]
async fn blank_code_is_rejected_locally() {
    let mut repo = MockSocioRepository::new();
    repo.expect_find().never();

    let err = make_service(repo, MockImageStore::new())
        .await
        .show("  ")
        .await
        .expect_err("blank code");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
