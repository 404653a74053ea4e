use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Upload form posting a `video` file part to `/convert`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
