//! Contract tests for the HTTP DID resolver and verification-method lookup.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/v1/did/{urlencoded did}` | `resolve_*`, `check_*` |

use credkit_core::base64url_encode;
use credkit_crypto::Secp256k1KeyPair;
use credkit_did::{
    DidResolver, HttpDidResolver, ResolverConfig, ResolverError, VerificationMethodResolver,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DID: &str = "did:nda:testnet:0xe71963787f8d5e328cd12b7a78b0d26062e1f31e";
const DID_PATH: &str = "/api/v1/did/did%3Anda%3Atestnet%3A0xe71963787f8d5e328cd12b7a78b0d26062e1f31e";
const SK_HEX: &str = "e5c9a597b20e13627a3850d38439b61ec9ee7aefd77c7cb6c01dc3866e1db19a";
const OTHER_SK_HEX: &str = "3756330b933a117066e4509ef87b2d82ce10829208ecdd52c9754ddaa1abe746";

fn public_key_hex(sk: &str) -> String {
    Secp256k1KeyPair::from_hex(sk).unwrap().public_key().to_hex()
}

fn did_document(methods: Vec<Value>) -> Value {
    json!({
        "@context": ["https://www.w3.org/ns/did/v1"],
        "id": DID,
        "verificationMethod": methods,
        "assertionMethod": [format!("{DID}#key-1")]
    })
}

fn hex_method(fragment: &str, key_hex: &str) -> Value {
    json!({
        "id": format!("{DID}#{fragment}"),
        "type": "EcdsaSecp256k1VerificationKey2019",
        "controller": DID,
        "publicKeyHex": key_hex
    })
}

async fn mount_document(server: &MockServer, document: Value) {
    Mock::given(method("GET"))
        .and(path(DID_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .expect(1..)
        .mount(server)
        .await;
}

fn vm_resolver(server: &MockServer) -> VerificationMethodResolver {
    VerificationMethodResolver::with_base_url(&format!("{}/api/v1/did", server.uri())).unwrap()
}

// ── GET /api/v1/did/{did} ────────────────────────────────────────────

#[tokio::test]
async fn resolve_returns_parsed_document() {
    let server = MockServer::start().await;
    mount_document(&server, did_document(vec![hex_method("key-1", "04aa")])).await;

    let config = ResolverConfig::new(&format!("{}/api/v1/did/", server.uri())).unwrap();
    let doc = HttpDidResolver::new(config).unwrap().resolve(DID).await.unwrap();
    assert_eq!(doc.id, DID);
    assert_eq!(doc.verification_method.len(), 1);
}

#[tokio::test]
async fn resolve_exact_method_strips_hex_prefix() {
    let server = MockServer::start().await;
    let pk = public_key_hex(SK_HEX);
    mount_document(
        &server,
        did_document(vec![
            hex_method("key-0", "04bb"),
            hex_method("key-1", &format!("0x{pk}")),
        ]),
    )
    .await;

    let key = vm_resolver(&server)
        .resolve_public_key(&format!("{DID}#key-1"))
        .await
        .unwrap();
    assert_eq!(key, pk);
}

#[tokio::test]
async fn resolve_default_uses_first_method() {
    let server = MockServer::start().await;
    mount_document(
        &server,
        did_document(vec![hex_method("key-0", "04bb"), hex_method("key-1", "04aa")]),
    )
    .await;

    let key = vm_resolver(&server).resolve_default_public_key(DID).await.unwrap();
    assert_eq!(key, "04bb");
}

#[tokio::test]
async fn resolve_converts_jwk_to_uncompressed_hex() {
    let server = MockServer::start().await;
    let point = Secp256k1KeyPair::from_hex(SK_HEX).unwrap().public_key().to_uncompressed();
    mount_document(
        &server,
        did_document(vec![json!({
            "id": format!("{DID}#key-1"),
            "type": "JsonWebKey2020",
            "publicKeyJwk": {
                "kty": "EC",
                "crv": "secp256k1",
                "x": base64url_encode(&point[1..33]),
                "y": base64url_encode(&point[33..])
            }
        })]),
    )
    .await;

    let key = vm_resolver(&server)
        .resolve_public_key(&format!("{DID}#key-1"))
        .await
        .unwrap();
    assert_eq!(key, public_key_hex(SK_HEX));
}

#[tokio::test]
async fn resolve_missing_method_is_key_not_found() {
    let server = MockServer::start().await;
    mount_document(&server, did_document(vec![hex_method("key-1", "04aa")])).await;

    let err = vm_resolver(&server)
        .resolve_public_key(&format!("{DID}#key-9"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::KeyNotFound(_)));
}

#[tokio::test]
async fn resolve_empty_document_has_no_default_key() {
    let server = MockServer::start().await;
    mount_document(&server, did_document(vec![])).await;

    let err = vm_resolver(&server).resolve_default_public_key(DID).await.unwrap_err();
    assert!(matches!(err, ResolverError::KeyNotFound(_)));
}

#[tokio::test]
async fn resolve_non_success_status_is_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DID_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("DID not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = vm_resolver(&server).resolve_default_public_key(DID).await.unwrap_err();
    match err {
        ResolverError::Resolution { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "DID not found");
        }
        other => panic!("expected Resolution, got {other:?}"),
    }
}

#[tokio::test]
async fn resolve_malformed_body_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DID_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = vm_resolver(&server).resolve_default_public_key(DID).await.unwrap_err();
    assert!(matches!(err, ResolverError::Deserialization { .. }));
}

#[tokio::test]
async fn resolve_unreachable_server_is_http_error() {
    let resolver = VerificationMethodResolver::with_base_url("http://127.0.0.1:1/api/v1/did").unwrap();
    let err = resolver.resolve_default_public_key(DID).await.unwrap_err();
    assert!(matches!(err, ResolverError::Http { .. }));
}

// ── check_verification_method ────────────────────────────────────────

#[tokio::test]
async fn check_matching_private_key() {
    let server = MockServer::start().await;
    mount_document(
        &server,
        did_document(vec![hex_method("key-1", &public_key_hex(SK_HEX))]),
    )
    .await;

    let resolver = vm_resolver(&server);
    let vm = format!("{DID}#key-1");
    assert!(resolver.check_verification_method(SK_HEX, &vm).await.unwrap());
    assert!(!resolver.check_verification_method(OTHER_SK_HEX, &vm).await.unwrap());
}

#[tokio::test]
async fn check_rejects_empty_inputs() {
    let resolver = VerificationMethodResolver::with_base_url("http://127.0.0.1:1").unwrap();
    let err = resolver.check_verification_method("", "did:x#k").await.unwrap_err();
    assert!(matches!(err, ResolverError::InvalidVerificationMethod(_)));
}
