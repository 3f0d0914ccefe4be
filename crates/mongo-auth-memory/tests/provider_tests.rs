// Integration tests for DocumentUserProvider over the in-memory store.
//
// Covers every provider operation end to end: lookups, credential filtering,
// legacy password validation, and remember-token round trips.

use std::sync::Arc;

use mongo_auth_core::{
    AuthError, Authenticatable, Credentials, Document, DocumentUserProvider, FieldMapping,
    LegacyCryptHasher, PasswordHasher, ProviderConfig, UserProvider,
};
use mongo_auth_memory::MemoryStore;
use serde_json::json;

const SALT: &str = "$1$abcdefgh$";
const COLLECTION: &str = "users";

fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().expect("object literal")
}

/// Helper: a store with one user whose password is `secret`, plus the provider.
async fn setup() -> (MemoryStore, DocumentUserProvider<MemoryStore>) {
    let store = MemoryStore::new();
    let hash = LegacyCryptHasher.hash_with_salt("secret", SALT).unwrap();

    store
        .insert(
            COLLECTION,
            doc(json!({
                "_id": "u1",
                "Email": "a@x.com",
                "Name": "Alice",
                "Password": hash,
                "PasswordSalt": SALT
            })),
        )
        .await;

    let provider = DocumentUserProvider::new(store.clone(), Arc::new(LegacyCryptHasher), COLLECTION);
    (store, provider)
}

// ─── retrieve_by_id ──────────────────────────────────────────────

#[tokio::test]
async fn test_retrieve_by_id_copies_fields() {
    let (store, provider) = setup().await;

    let user = provider.retrieve_by_id("u1").await.unwrap().expect("user u1");

    assert_eq!(user.id, "u1");
    assert_eq!(user.password, None);
    let stored = store.snapshot().await[COLLECTION][0].clone();
    assert_eq!(user.attributes, stored);
}

#[tokio::test]
async fn test_retrieve_by_id_missing_is_none() {
    let (_store, provider) = setup().await;
    assert!(provider.retrieve_by_id("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_retrieve_by_id_is_idempotent() {
    let (_store, provider) = setup().await;
    let first = provider.retrieve_by_id("u1").await.unwrap();
    let second = provider.retrieve_by_id("u1").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_retrieve_by_id_numeric_key() {
    let store = MemoryStore::new();
    store.insert(COLLECTION, doc(json!({"_id": 42, "Email": "n@x.com"}))).await;
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    let user = provider.retrieve_by_id("42").await.unwrap().unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.attribute("_id"), Some(&json!(42)));
}

#[tokio::test]
async fn test_retrieve_by_id_generated_key() {
    let store = MemoryStore::new();
    let stored = store.insert(COLLECTION, doc(json!({"Email": "g@x.com"}))).await;
    let id = stored["_id"].as_str().unwrap().to_string();
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    let user = provider.retrieve_by_id(&id).await.unwrap().unwrap();
    assert_eq!(user.auth_identifier(), id);
}

// ─── retrieve_by_credentials ─────────────────────────────────────

#[tokio::test]
async fn test_retrieve_by_credentials_example_view() {
    let store = MemoryStore::new();
    store
        .insert(
            COLLECTION,
            doc(json!({"_id": "u1", "Email": "a@x.com", "Password": "H", "PasswordSalt": "S"})),
        )
        .await;
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    let creds = Credentials::from([("Email", "a@x.com"), ("Password", "ignored")]);
    let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        json!({
            "_id": "u1",
            "id": "u1",
            "Email": "a@x.com",
            "Password": "H",
            "PasswordSalt": "S",
            "password": "H"
        })
    );
}

#[tokio::test]
async fn test_retrieve_by_credentials_ignores_password_like_keys() {
    let (_store, provider) = setup().await;

    // Neither value matches anything stored; only Email takes part in the query.
    let creds = Credentials::from([
        ("Email", "a@x.com"),
        ("Password", "wrong"),
        ("UserPassword", "also wrong"),
    ]);
    let user = provider.retrieve_by_credentials(&creds).await.unwrap();
    assert_eq!(user.map(|u| u.id), Some("u1".to_string()));
}

#[tokio::test]
async fn test_retrieve_by_credentials_and_of_filters() {
    let (_store, provider) = setup().await;

    let hit = Credentials::from([("Email", "a@x.com"), ("Name", "Alice")]);
    assert!(provider.retrieve_by_credentials(&hit).await.unwrap().is_some());

    let miss = Credentials::from([("Email", "a@x.com"), ("Name", "Bob")]);
    assert!(provider.retrieve_by_credentials(&miss).await.unwrap().is_none());
}

#[tokio::test]
async fn test_retrieve_by_credentials_lowercase_password_is_filtered() {
    let (_store, provider) = setup().await;

    // `password` does not contain "Password" (case-sensitive), so it is queried.
    let creds = Credentials::from([("Email", "a@x.com"), ("password", "secret")]);
    assert!(provider.retrieve_by_credentials(&creds).await.unwrap().is_none());
}

#[tokio::test]
async fn test_retrieve_by_credentials_first_in_natural_order() {
    let (store, provider) = setup().await;
    store
        .insert(
            COLLECTION,
            doc(json!({"_id": "u2", "Email": "a@x.com", "Password": "H2", "PasswordSalt": SALT})),
        )
        .await;

    let user = provider
        .retrieve_by_credentials(&Credentials::from([("Email", "a@x.com")]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn test_retrieve_by_credentials_always_sets_password() {
    let (_store, provider) = setup().await;
    let user = provider
        .retrieve_by_credentials(&Credentials::from([("Name", "Alice")]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.auth_password(), user.attribute("Password").and_then(|v| v.as_str()));
}

#[tokio::test]
async fn test_retrieve_by_credentials_missing_user() {
    let (_store, provider) = setup().await;
    let creds = Credentials::from([("Email", "nobody@x.com"), ("Password", "secret")]);
    assert!(provider.retrieve_by_credentials(&creds).await.unwrap().is_none());
}

// ─── validate_credentials ────────────────────────────────────────

#[tokio::test]
async fn test_validate_credentials_accepts_correct_password() {
    let (_store, provider) = setup().await;
    let creds = Credentials::from([("Email", "a@x.com"), ("Password", "secret")]);

    let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();
    assert!(provider.validate_credentials(&user, &creds).unwrap());
}

#[tokio::test]
async fn test_validate_credentials_rejects_single_char_mutations() {
    let (_store, provider) = setup().await;
    let user = provider
        .retrieve_by_credentials(&Credentials::from([("Email", "a@x.com")]))
        .await
        .unwrap()
        .unwrap();

    for candidate in ["secreT", "Secret", "secre", "secrets", "sedret", "xecret"] {
        let creds = Credentials::from([("Password", candidate)]);
        assert!(
            !provider.validate_credentials(&user, &creds).unwrap(),
            "{candidate} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_validate_credentials_missing_password_credential() {
    let (_store, provider) = setup().await;
    let creds = Credentials::from([("Email", "a@x.com")]);
    let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();

    let err = provider.validate_credentials(&user, &creds).unwrap_err();
    assert!(matches!(err, AuthError::MissingField(f) if f == "Password"));
}

#[tokio::test]
async fn test_validate_credentials_missing_salt() {
    let store = MemoryStore::new();
    store
        .insert(COLLECTION, doc(json!({"_id": "u1", "Email": "a@x.com", "Password": "H"})))
        .await;
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    let creds = Credentials::from([("Email", "a@x.com"), ("Password", "secret")]);
    let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();

    let err = provider.validate_credentials(&user, &creds).unwrap_err();
    assert!(matches!(err, AuthError::MissingField(f) if f == "PasswordSalt"));
}

#[tokio::test]
async fn test_validate_credentials_sha512_salt() {
    let salt = "$6$saltstring$";
    let hash = LegacyCryptHasher.hash_with_salt("secret", salt).unwrap();
    let store = MemoryStore::new();
    store
        .insert(
            COLLECTION,
            doc(json!({"_id": "u9", "Email": "s@x.com", "Password": hash, "PasswordSalt": salt})),
        )
        .await;
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    let creds = Credentials::from([("Email", "s@x.com"), ("Password", "secret")]);
    let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();
    assert!(provider.validate_credentials(&user, &creds).unwrap());
}

#[tokio::test]
async fn test_validate_credentials_rejected_salt_is_crypto_error() {
    let store = MemoryStore::new();
    store
        .insert(COLLECTION, doc(json!({"_id": "e1", "Email": "e@x.com", "Password": "H", "PasswordSalt": ""})))
        .await;
    store
        .insert(
            COLLECTION,
            doc(json!({"_id": "b1", "Email": "b@x.com", "Password": "H", "PasswordSalt": "$2y$05$short"})),
        )
        .await;
    let provider = DocumentUserProvider::new(store, Arc::new(LegacyCryptHasher), COLLECTION);

    for email in ["e@x.com", "b@x.com"] {
        let creds = Credentials::from([("Email", email), ("Password", "secret")]);
        let user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();

        let err = provider.validate_credentials(&user, &creds).unwrap_err();
        assert!(matches!(err, AuthError::Crypto(_)), "{email}: {err:?}");
    }
}

// ─── Remember Token ──────────────────────────────────────────────

#[tokio::test]
async fn test_remember_token_round_trip() {
    let (store, provider) = setup().await;
    let mut user = provider.retrieve_by_id("u1").await.unwrap().unwrap();

    provider.update_remember_token(&mut user, "abc").await.unwrap();
    assert_eq!(user.remember_token(), Some("abc"));
    assert_eq!(store.snapshot().await[COLLECTION][0]["remember_token"], "abc");

    let found = provider.retrieve_by_token(&user.id, "abc").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.attributes, user.attributes);

    assert!(provider.retrieve_by_token(&user.id, "wrong").await.unwrap().is_none());
}

#[tokio::test]
async fn test_retrieve_by_token_without_stored_token() {
    let (_store, provider) = setup().await;
    assert!(provider.retrieve_by_token("u1", "").await.unwrap().is_none());
    assert!(provider.retrieve_by_token("u1", "abc").await.unwrap().is_none());
}

#[tokio::test]
async fn test_retrieve_by_token_unknown_user() {
    let (_store, provider) = setup().await;
    assert!(provider.retrieve_by_token("nobody", "abc").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_remember_token_deleted_user() {
    let (store, provider) = setup().await;
    let mut user = provider.retrieve_by_id("u1").await.unwrap().unwrap();
    store.clear().await;

    let err = provider.update_remember_token(&mut user, "abc").await.unwrap_err();
    assert!(matches!(err, AuthError::NotPersisted(id) if id == "u1"));
}

// ─── Field Mapping ───────────────────────────────────────────────

#[tokio::test]
async fn test_custom_field_mapping() {
    let store = MemoryStore::new();
    let hash = LegacyCryptHasher.hash_with_salt("secret", SALT).unwrap();
    store
        .insert(
            "members",
            doc(json!({"_id": "m1", "login": "alice", "pw_hash": hash, "pw_salt": SALT})),
        )
        .await;

    let fields = FieldMapping {
        password: "pw_hash".into(),
        password_salt: "pw_salt".into(),
        credential_password: "secret".into(),
        excluded_marker: "secret".into(),
        remember_token: "rememberToken".into(),
    };
    let provider = DocumentUserProvider::with_config(
        store.clone(),
        Arc::new(LegacyCryptHasher),
        ProviderConfig::new("members").with_fields(fields),
    )
    .unwrap();

    let creds = Credentials::from([("login", "alice"), ("secret", "secret")]);
    let mut user = provider.retrieve_by_credentials(&creds).await.unwrap().unwrap();
    assert!(provider.validate_credentials(&user, &creds).unwrap());

    provider.update_remember_token(&mut user, "tok").await.unwrap();
    assert_eq!(store.snapshot().await["members"][0]["rememberToken"], "tok");
    assert!(provider.retrieve_by_token("m1", "tok").await.unwrap().is_some());
}

#[tokio::test]
async fn test_hasher_is_exposed_not_used_for_validation() {
    let (_store, provider) = setup().await;
    let user = provider
        .retrieve_by_credentials(&Credentials::from([("Email", "a@x.com")]))
        .await
        .unwrap()
        .unwrap();

    // The injected hasher understands the stored hash too.
    let stored = user.auth_password().unwrap();
    assert!(provider.hasher().check("secret", stored).unwrap());
    assert!(!provider.hasher().needs_rehash(stored));
}
