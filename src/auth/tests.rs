//! Tests for the credential module

use super::*;
use crate::error::Error;
use chrono::{Duration, Utc};
use serde_json::json;

fn token(partition: &str) -> TokenResult {
    TokenResult::new(partition, "acct", "db", "collection", "type=resource&sig=abc")
}

#[test]
fn test_token_not_expired() {
    let token = token("readonly").expires_on(Utc::now() + Duration::seconds(3600));
    assert!(!token.is_expired());
}

#[test]
fn test_token_expired_within_buffer() {
    let token = token("readonly").expires_on(Utc::now() + Duration::seconds(10));
    assert!(token.is_expired());
}

#[test]
fn test_token_no_expiration() {
    assert!(!token("readonly").is_expired());
}

#[test]
fn test_token_result_deserialize() {
    let token: TokenResult = serde_json::from_value(json!({
        "partition": "user-123",
        "dbAccount": "appcenter-docs",
        "dbName": "db",
        "dbCollectionName": "appcenter",
        "token": "type=resource&ver=1&sig=xyz",
        "status": "Succeed",
        "expiresOn": "2030-01-01T00:00:00Z",
        "accountId": "123"
    }))
    .unwrap();

    assert_eq!(token.partition, "user-123");
    assert_eq!(token.db_account, "appcenter-docs");
    assert_eq!(token.db_collection_name, "appcenter");
    assert_eq!(token.status.as_deref(), Some("Succeed"));
    assert_eq!(token.account_id.as_deref(), Some("123"));
    assert!(token.expires_on.is_some());
}

#[tokio::test]
async fn test_static_provider_returns_token() {
    let provider = StaticTokenProvider::new().with_token("readonly", token("readonly"));
    assert_eq!(provider.len(), 1);

    let result = provider.get_token("readonly").await.unwrap();
    assert_eq!(result.partition, "readonly");
}

#[tokio::test]
async fn test_static_provider_missing_partition() {
    let provider = StaticTokenProvider::new();
    assert!(provider.is_empty());

    let err = provider.get_token("user").await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential { partition } if partition == "user"));
}

#[tokio::test]
async fn test_static_provider_rejects_expired() {
    let expired = token("user-1").expires_on(Utc::now() - Duration::seconds(5));
    let provider = StaticTokenProvider::new().with_token("user", expired);

    let err = provider.get_token("user").await.unwrap_err();
    assert!(matches!(err, Error::ExpiredCredential { .. }));
}
