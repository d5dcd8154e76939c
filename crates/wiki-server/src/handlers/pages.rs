//! Page handlers: view, edit, save and delete.

use std::sync::Arc;

use axum::Form;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use wiki_storage::Page;

use crate::error::ServerError;
use crate::handlers::{Title, found};
use crate::state::AppState;

/// The `body` form value of a save request.
///
/// Read from a urlencoded or multipart request body, falling back to a
/// `body` query parameter when the request body has no such field. A value
/// missing everywhere is an empty page.
pub(crate) struct PageBody(pub(crate) Vec<u8>);

#[derive(Deserialize)]
struct BodyField {
    body: Option<String>,
}

impl<S: Send + Sync> FromRequest<S> for PageBody {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = Query::<BodyField>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(field)| field.body);

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let from_form = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            multipart_body(multipart).await?
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(field) = Form::<BodyField>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            field.body.map(String::into_bytes)
        } else {
            None
        };

        Ok(Self(
            from_form
                .or_else(|| from_query.map(String::into_bytes))
                .unwrap_or_default(),
        ))
    }
}

/// Bytes of the first `body` part, if any.
async fn multipart_body(mut multipart: Multipart) -> Result<Option<Vec<u8>>, Response> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        if field.name() == Some("body") {
            let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

/// Handle GET /view/{title}.
///
/// Pages that cannot be loaded redirect to their edit form, which doubles
/// as the page creation flow.
pub(crate) async fn view(
    State(state): State<Arc<AppState>>,
    Title(title): Title,
) -> Result<Response, ServerError> {
    match state.store.load(&title).await {
        Ok(page) => Ok(Html(state.templates.view(&page)?).into_response()),
        Err(err) => {
            if !err.is_not_found() {
                tracing::warn!(title = %title, error = %err, "Failed to load page for viewing");
            }
            Ok(found(&format!("/edit/{title}")))
        }
    }
}

/// Handle GET /edit/{title}.
pub(crate) async fn edit(
    State(state): State<Arc<AppState>>,
    Title(title): Title,
) -> Result<Html<String>, ServerError> {
    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(err) if err.is_not_found() => Page::blank(title),
        Err(err) => return Err(err.into()),
    };
    Ok(Html(state.templates.edit(&page)?))
}

/// Handle POST /save/{title}.
pub(crate) async fn save(
    State(state): State<Arc<AppState>>,
    Title(title): Title,
    PageBody(body): PageBody,
) -> Result<Response, ServerError> {
    let page = Page::new(title, body);
    state.store.save(&page).await?;

    tracing::info!(title = %page.title, bytes = page.body.len(), "Page saved");
    Ok(found(&format!("/view/{}", page.title)))
}

/// Handle GET|POST /delete/{title}.
pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    Title(title): Title,
) -> Result<Response, ServerError> {
    state.store.delete(&title).await?;

    tracing::info!(title = %title, "Page deleted");
    Ok(found("/list"))
}
