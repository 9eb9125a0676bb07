use chrono::{Duration, TimeZone, Utc};
use spotcli::error::AuthError;
use spotcli::management::TokenStore;
use spotcli::types::OAuthToken;
use tempfile::TempDir;

fn create_test_token(expiry_offset: Duration) -> OAuthToken {
    // Whole seconds so the RFC 3339 round trip is exact
    let now = Utc.timestamp_opt(Utc::now().timestamp(), 0).unwrap();
    OAuthToken {
        access_token: "access-123".to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: Some("refresh-456".to_string()),
        expiry: now + expiry_offset,
    }
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    let token = create_test_token(Duration::hours(1));

    store.save(&token).await.unwrap();
    let loaded = store.load().await.unwrap();

    assert_eq!(loaded, token);
}

#[tokio::test]
async fn test_load_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    assert!(matches!(store.load().await, Err(AuthError::NotFound)));
}

#[tokio::test]
async fn test_load_expired_token_carries_token() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    let token = create_test_token(-Duration::hours(1));
    store.save(&token).await.unwrap();

    match store.load().await {
        Err(AuthError::Expired(expired)) => assert_eq!(*expired, token),
        other => panic!("expected Expired, got {:?}", other),
    }

    // read() does not judge expiry
    assert_eq!(store.read().await.unwrap(), token);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("spotcli").join("token.json");
    let store = TokenStore::new(path.clone());

    store.save(&create_test_token(Duration::hours(1))).await.unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn test_save_leaves_no_temporary_files() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    store.save(&create_test_token(Duration::hours(1))).await.unwrap();
    store.save(&create_test_token(Duration::hours(2))).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["token.json".to_string()]);
}

#[tokio::test]
async fn test_save_replaces_previous_token() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let first = create_test_token(Duration::hours(1));
    let mut second = create_test_token(Duration::hours(2));
    second.access_token = "access-789".to_string();
    second.refresh_token = None;

    store.save(&first).await.unwrap();
    store.save(&second).await.unwrap();

    assert_eq!(store.load().await.unwrap(), second);
}

#[tokio::test]
async fn test_corrupt_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = TokenStore::new(path);

    assert!(matches!(store.load().await, Err(AuthError::NotFound)));
}

#[tokio::test]
async fn test_persisted_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let store = TokenStore::new(path.clone());
    let token = create_test_token(Duration::hours(1));
    store.save(&token).await.unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["access_token"], "access-123");
    assert_eq!(value["token_type"], "Bearer");
    assert_eq!(value["refresh_token"], "refresh-456");
    let expiry: chrono::DateTime<Utc> = value["expiry"].as_str().unwrap().parse().unwrap();
    assert_eq!(expiry, token.expiry);
}

#[cfg(unix)]
#[tokio::test]
async fn test_token_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let store = TokenStore::new(path.clone());
    store.save(&create_test_token(Duration::hours(1))).await.unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[tokio::test]
async fn test_repeated_saves_stay_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    // The temp file is created 0600, so every replacement is owner-only
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let store = TokenStore::new(path.clone());

    for hours in 1..=3 {
        store.save(&create_test_token(Duration::hours(hours))).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
