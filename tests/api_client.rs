//! HTTP-level tests for the API client against a local one-shot server

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{serve_once, serve_silence};
use contacts_cli::api::{
    ApiClient, ApiError, CommitRequest, ConsentState, ContactQuery, EnvToken, NoCredentials,
    StaticToken,
};
use contacts_cli::import::{ColumnMapping, FieldKey, ImportApi, ImportOptions, SelectedFile};

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Arc::new(StaticToken::new("secret-token"))).unwrap()
}

fn commit_request() -> CommitRequest {
    let mut mapping = ColumnMapping::default();
    mapping.assign(0, FieldKey::Name);
    mapping.assign(1, FieldKey::Email);
    CommitRequest {
        import_id: "imp-1".to_string(),
        mapping,
        options: ImportOptions::default(),
    }
}

#[tokio::test]
async fn test_commit_sends_token_and_body() -> Result<()> {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"insertedCount":2,"updatedCount":1,"skippedCount":0,"errors":[{"row":4,"message":"bad email"}]}"#,
    )
    .await;

    let result = client(&base_url).commit_import(&commit_request()).await?;
    assert_eq!(result.inserted_count, 2);
    assert_eq!(result.updated_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 4);

    let raw = server.await?;
    let lower = raw.to_lowercase();
    assert!(raw.starts_with("POST /contacts/import/commit "));
    assert!(lower.contains("authorization: bearer secret-token"));
    assert!(lower.contains("x-request-id: "));
    assert!(raw.contains(r#""importId":"imp-1""#));
    assert!(raw.contains(r#""mapping":{"0":"name","1":"email"}"#));
    assert!(raw.contains(r#""skipDuplicates":true"#));
    Ok(())
}

#[tokio::test]
async fn test_prepare_uploads_multipart_file() -> Result<()> {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"importId":"imp-9","totalRows":2,"headers":["Name","Email"]}"#,
    )
    .await;

    let file = SelectedFile::from_bytes("contacts.csv", "Name,Email\nJohn,john@x.com\n");
    let prepared = client(&base_url).prepare_import(&file).await?;
    assert_eq!(prepared.import_id, "imp-9");
    assert_eq!(prepared.total_rows, 2);
    assert_eq!(prepared.headers, ["Name", "Email"]);

    let raw = server.await?;
    assert!(raw.starts_with("POST /contacts/import/prepare "));
    assert!(raw.to_lowercase().contains("content-type: multipart/form-data"));
    assert!(raw.contains(r#"name="file""#));
    assert!(raw.contains(r#"filename="contacts.csv""#));
    assert!(raw.contains("John,john@x.com"));
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_is_classified() -> Result<()> {
    let (base_url, _server) = serve_once("401 Unauthorized", r#"{"message":"token expired"}"#).await;

    let err = client(&base_url).commit_import(&commit_request()).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(err.user_message(), "Authentication required. Please sign in again.");
    Ok(())
}

#[tokio::test]
async fn test_validation_message_is_surfaced() -> Result<()> {
    let (base_url, _server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"message":"Import imp-1 has expired"}"#,
    )
    .await;

    let err = client(&base_url).commit_import(&commit_request()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "Import imp-1 has expired");
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_classified() -> Result<()> {
    let (base_url, _server) = serve_once("503 Service Unavailable", "<html>down</html>").await;

    let err = client(&base_url).commit_import(&commit_request()).await.unwrap_err();
    assert_eq!(err, ApiError::Server(503));
    Ok(())
}

#[tokio::test]
async fn test_slow_server_times_out() -> Result<()> {
    let (base_url, _server) = serve_silence().await;

    let client = ApiClient::with_timeout(&base_url, Arc::new(NoCredentials), Duration::from_millis(200))?;
    let err = client.commit_import(&commit_request()).await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let err = client(&base_url).commit_import(&commit_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    Ok(())
}

#[tokio::test]
async fn test_list_contacts_reads_tri_state_consent() -> Result<()> {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"contacts":[
            {"id":"c1","name":"John","smsConsent":true,"emailConsent":null},
            {"id":"c2","name":"Jane","smsConsent":false}
        ],"total":2,"page":1,"totalPages":1}"#,
    )
    .await;

    let query = ContactQuery {
        search: Some("jo".to_string()),
        ..ContactQuery::default()
    };
    let page = client(&base_url).list_contacts(&query).await?;

    assert_eq!(page.total, 2);
    assert_eq!(page.contacts[0].sms_consent, ConsentState::Granted);
    assert_eq!(page.contacts[0].email_consent, ConsentState::Unknown);
    assert_eq!(page.contacts[1].sms_consent, ConsentState::Denied);
    assert_eq!(page.contacts[1].email_consent, ConsentState::Unknown);

    let raw = server.await?;
    assert!(raw.starts_with("GET /contacts?page=1&limit=25&search=jo "));
    Ok(())
}

#[tokio::test]
async fn test_delete_contact_encodes_id() -> Result<()> {
    let (base_url, server) = serve_once("204 No Content", "").await;

    client(&base_url).delete_contact("a b/c").await?;

    let raw = server.await?;
    assert!(raw.starts_with("DELETE /contacts/a%20b%2Fc "));
    Ok(())
}

#[tokio::test]
#[ignore = "requires CONTACTS_API_URL and CONTACTS_API_TOKEN"]
async fn test_live_stats() -> Result<()> {
    let base_url = std::env::var("CONTACTS_API_URL")?;
    let client = ApiClient::new(base_url, Arc::new(EnvToken::default()))?;

    let stats = client.contact_stats().await?;
    assert!(stats.with_email <= stats.total_contacts);
    Ok(())
}
