use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorBody, RepoResultExt},
    models::{
        Blog, BlogListResponse, BlogResponse, CreateBlogInput, IdResponse, NewUser, SigninInput,
        SignupInput, TokenResponse, UpdateBlogInput,
    },
    validation,
};
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
};
use uuid::Uuid;

/// Fixed page size of the bulk listing.
pub const PAGE_SIZE: i64 = 10;

const BLOG: &str = "Blog";
const USER_WITH_EMAIL: &str = "User with this email";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// Bodies are taken as raw bytes so that malformed JSON is reported through the same
// issues envelope as schema failures instead of axum's plain-text rejection.

// --- User Handlers ---

/// signup
///
/// [Public Route] Registers a user and returns a token for it.
///
/// The email pre-check catches the common duplicate; an insert that still trips the
/// unique constraint (concurrent signup) maps to the same 409.
#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    request_body = SignupInput,
    responses(
        (status = 200, description = "Registered", body = TokenResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 409, description = "Email taken", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let input: SignupInput = validation::parse(&body)?;

    if state.repo.find_user_by_email(&input.email).await?.is_some() {
        return Err(ApiError::Conflict(USER_WITH_EMAIL));
    }

    let user = state
        .repo
        .create_user(NewUser {
            email: input.email,
            name: input.name,
            password: input.password,
        })
        .await
        .or_conflict(USER_WITH_EMAIL)?;

    tracing::info!(user_id = %user.id, "user signed up");

    let jwt = state.tokens.issue(user.id)?;
    Ok(Json(TokenResponse { jwt }))
}

/// signin
///
/// [Public Route] Exchanges an email/password pair for a token.
#[utoipa::path(
    post,
    path = "/api/v1/user/signin",
    request_body = SigninInput,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, ApiError> {
    let input: SigninInput = validation::parse(&body)?;

    let user = state
        .repo
        .find_user_by_credentials(&input.email, &input.password)
        .await?
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;

    tracing::info!(user_id = %user.id, "user signed in");

    let jwt = state.tokens.issue(user.id)?;
    Ok(Json(TokenResponse { jwt }))
}

// --- Blog Handlers ---

/// create_blog
///
/// [Authenticated Route] Creates a post authored by the token's user.
#[utoipa::path(
    post,
    path = "/api/v1/blog/",
    request_body = CreateBlogInput,
    responses(
        (status = 200, description = "Created", body = IdResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn create_blog(
    State(state): State<AppState>,
    Extension(AuthUser { id: author_id }): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<IdResponse>, ApiError> {
    let input: CreateBlogInput = validation::parse(&body)?;

    let post = state
        .repo
        .create_post(author_id, input.title, input.content)
        .await?;

    tracing::info!(post_id = %post.id, %author_id, "post created");
    Ok(Json(IdResponse { id: post.id }))
}

/// update_blog
///
/// [Authenticated Route] Updates a post by id.
///
/// Any authenticated user may update any post: there is no author match (see DESIGN.md).
#[utoipa::path(
    put,
    path = "/api/v1/blog/",
    request_body = UpdateBlogInput,
    responses(
        (status = 200, description = "Updated", body = IdResponse),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_blog(
    State(state): State<AppState>,
    Extension(AuthUser { id: user_id }): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<IdResponse>, ApiError> {
    let input: UpdateBlogInput = validation::parse(&body)?;

    let post = state
        .repo
        .update_post(input.id, input.title, input.content)
        .await
        .or_not_found(BLOG)?;

    tracing::info!(post_id = %post.id, %user_id, "post updated");
    Ok(Json(IdResponse { id: post.id }))
}

/// get_blogs
///
/// [Public Route] First page of posts, `PAGE_SIZE` entries at most.
#[utoipa::path(
    get,
    path = "/api/v1/blog/bulk",
    responses((status = 200, description = "Posts", body = BlogListResponse))
)]
pub async fn get_blogs(State(state): State<AppState>) -> Result<Json<BlogListResponse>, ApiError> {
    let rows = state.repo.list_posts(PAGE_SIZE, 0).await?;
    let blogs = rows.into_iter().map(Blog::from).take(PAGE_SIZE as usize).collect();
    Ok(Json(BlogListResponse { blogs }))
}

/// get_blog
///
/// [Public Route] One post by id. An id that is not a UUID cannot name a post and
/// gets the same 404 as an unknown one.
#[utoipa::path(
    get,
    path = "/api/v1/blog/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = BlogResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound(BLOG))?;

    let row = state
        .repo
        .get_post(id)
        .await?
        .ok_or(ApiError::NotFound(BLOG))?;

    Ok(Json(BlogResponse { blog: row.into() }))
}
