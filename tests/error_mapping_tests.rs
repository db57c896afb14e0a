use axum::{http::StatusCode, response::IntoResponse};
use blog_api::{
    error::{ApiError, ErrorBody, ErrorDetail, RepoResultExt},
    repository::RepoError,
    validation::Issue,
};
use serde_json::{Value, json};

async fn render(error: ApiError) -> (StatusCode, Value) {
    let response = error.into_response();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_error_table() {
    let cases = vec![
        (
            ApiError::Unauthorized("Unauthorized"),
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Unauthorized" }),
        ),
        (
            ApiError::NotFound("Blog"),
            StatusCode::NOT_FOUND,
            json!({ "error": "Blog not found" }),
        ),
        (
            ApiError::Conflict("User with this email"),
            StatusCode::CONFLICT,
            json!({ "error": "User with this email already exists" }),
        ),
        (
            ApiError::Store("relation \"posts\" does not exist".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Database error" }),
        ),
        (
            ApiError::Internal("stack trace here".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal Server Error" }),
        ),
    ];

    for (error, status, body) in cases {
        assert_eq!(render(error).await, (status, body));
    }
}

#[tokio::test]
async fn test_validation_failure_returns_issue_list() {
    let issue = Issue {
        code: "too_small".to_string(),
        path: vec!["title".to_string()],
        message: "String must contain at least 1 character(s)".to_string(),
    };

    let (status, body) = render(ApiError::ValidationFailed(vec![issue.clone()])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let parsed: ErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.error, ErrorDetail::Issues(vec![issue]));
}

#[tokio::test]
async fn test_store_detail_never_leaks() {
    let (_, body) = render(ApiError::Store("password authentication failed".to_string())).await;
    assert!(!body.to_string().contains("password"));
}

#[test]
fn test_repo_errors_are_named_by_handler() {
    let not_found: Result<(), RepoError> = Err(RepoError::NotFound);
    assert!(matches!(
        not_found.or_not_found("Blog"),
        Err(ApiError::NotFound("Blog"))
    ));

    let duplicate: Result<(), RepoError> = Err(RepoError::UniqueViolation("users_email_key".into()));
    assert!(matches!(
        duplicate.or_conflict("User with this email"),
        Err(ApiError::Conflict("User with this email"))
    ));

    // Anything the handler did not name stays a store error.
    let other: Result<(), RepoError> = Err(RepoError::Database(sqlx::Error::PoolTimedOut));
    assert!(matches!(other.or_not_found("Blog"), Err(ApiError::Store(_))));
}

#[test]
fn test_sqlx_row_not_found_classification() {
    assert!(matches!(
        RepoError::from(sqlx::Error::RowNotFound),
        RepoError::NotFound
    ));
    assert!(matches!(
        RepoError::from(sqlx::Error::PoolClosed),
        RepoError::Database(_)
    ));
}
