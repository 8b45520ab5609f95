//! REST adapter behaviour against a mock API.

use std::time::Duration;

use registro::domain::ports::{
    CargoRepository, LoginGateway, ReferenceCatalogue, RemoteApiError, SocioRepository,
    UsuarioRepository,
};
use registro::domain::{AuthToken, CargoTipo, LoginCredentials, NewCargo, RegionUpdate};
use registro::outbound::rest::ApiClient;
use registro::test_support::unsigned_token;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const FAR_FUTURE: i64 = 4_102_444_800;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api/v1", server.uri()), Duration::from_secs(5))
        .expect("client builds")
}

fn token() -> AuthToken {
    AuthToken::decode(&unsigned_token(7, "admin", FAR_FUTURE)).expect("token decodes")
}

async fn single_request(server: &MockServer) -> Request {
    let mut requests = server
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

fn authorization(request: &Request) -> Option<&str> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
}

fn body(request: &Request) -> Value {
    request.body_json().expect("request body is JSON")
}

#[tokio::test]
async fn login_posts_credentials_and_returns_the_token() {
    let server = MockServer::start().await;
    let raw = unsigned_token(7, "admin", FAR_FUTURE);
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"token": raw}, "status": 200})),
        )
        .mount(&server)
        .await;

    let credentials = LoginCredentials::try_from_parts("operador", "secreto").expect("valid");
    let issued = client(&server)
        .login(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(issued, raw);
    let request = single_request(&server).await;
    assert_eq!(authorization(&request), None);
    assert_eq!(
        body(&request),
        json!({"user": "operador", "password": "secreto"})
    );
}

#[tokio::test]
async fn rejected_login_keeps_the_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({"data": null, "status": 401, "message": "Usuario o contraseña incorrectos"}),
        ))
        .mount(&server)
        .await;

    let credentials = LoginCredentials::try_from_parts("operador", "mala").expect("valid");
    let err = client(&server)
        .login(&credentials)
        .await
        .expect_err("401");
    assert_eq!(
        err,
        RemoteApiError::unauthorized("Usuario o contraseña incorrectos")
    );
}

#[tokio::test]
async fn socio_lookups_send_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/socios/FSE-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "codunico": "FSE-0001",
            "cedula": "1710034065",
            "pnombre": "ANA",
            "papellido": "PAZ",
            "ptelefono": "0991234567",
            "provinciaid": 17,
            "rutafoto": "FSEIMAGES/1710034065/FOTO.PNG",
            "rutafirma": "FSEIMAGES/1710034065/FIRMA.PNG",
            "registradoPorid": 7
        })))
        .mount(&server)
        .await;
    let token = token();

    let socio = SocioRepository::find(&client(&server), &token, "FSE-0001")
        .await
        .expect("socio decodes");

    assert_eq!(socio.cedula, "1710034065");
    let request = single_request(&server).await;
    assert_eq!(
        authorization(&request),
        Some(format!("Bearer {}", token.as_str()).as_str())
    );
}

#[tokio::test]
async fn deleting_a_socio_targets_its_code() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/socios/FSE-0002"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    SocioRepository::delete(&client(&server), &token(), "FSE-0002")
        .await
        .expect("delete succeeds");
}

#[tokio::test]
async fn enveloped_cargo_lists_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cargos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "cargo": "TESORERO", "tipo": "Dirigente"},
                {"id": 2, "cargo": "VOCAL", "tipo": "Socio"}
            ],
            "status": 200,
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let cargos = CargoRepository::list(&client(&server), &token())
        .await
        .expect("cargos decode");

    assert_eq!(cargos.len(), 2);
    assert_eq!(cargos[1].tipo, CargoTipo::Miembro);
}

#[tokio::test]
async fn cargo_updates_patch_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/cargos/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 4, "cargo": "SECRETARIO", "tipo": "Dirigente"})),
        )
        .mount(&server)
        .await;

    let updated = CargoRepository::update(
        &client(&server),
        &token(),
        4,
        &NewCargo::new("secretario", CargoTipo::Dirigente),
    )
    .await
    .expect("update succeeds");

    assert_eq!(updated.cargo, "SECRETARIO");
    assert_eq!(
        body(&single_request(&server).await),
        json!({"cargo": "SECRETARIO", "tipo": "Dirigente"})
    );
}

#[tokio::test]
async fn region_updates_carry_the_id_in_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/regiones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "region": "AMAZONIA"})))
        .mount(&server)
        .await;

    client(&server)
        .update_region(
            &token(),
            &RegionUpdate {
                id: 3,
                region: Some("AMAZONIA".to_owned()),
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(
        body(&single_request(&server).await),
        json!({"id": 3, "region": "AMAZONIA"})
    );
}

#[tokio::test]
async fn unknown_users_map_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/usuarios/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({"data": null, "status": 404, "message": "Recurso no encontrado"}),
        ))
        .mount(&server)
        .await;

    let err = UsuarioRepository::find(&client(&server), &token(), 99)
        .await
        .expect_err("404");

    assert_eq!(err, RemoteApiError::not_found("Recurso no encontrado"));
}

#[tokio::test]
async fn server_errors_without_a_message_stay_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/provincias"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .provincias(&token())
        .await
        .expect_err("500");

    assert_eq!(err, RemoteApiError::rejected(500_u16, ""));
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let client =
        ApiClient::new(&format!("http://{addr}/api/v1"), Duration::from_secs(2)).expect("client builds");
    let err = client.provincias(&token()).await.expect_err("nothing listens");
    assert!(
        matches!(
            err,
            RemoteApiError::Transport { .. } | RemoteApiError::Timeout { .. }
        ),
        "unexpected error: {err:?}"
    );
}
