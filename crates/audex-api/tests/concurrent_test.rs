//! Concurrent conversions must never share a workspace.
//!
//! Run with: `cargo test -p audex-api --test concurrent_test`

mod helpers;

use futures::future::join_all;
use helpers::extractors::{IsolationCheckingExtractor, FAKE_MP3_HEADER};
use helpers::{setup_test_app, video_form};
use std::sync::Arc;

const REQUESTS: usize = 24;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_conversions_are_isolated() {
    let app = setup_test_app(Arc::new(IsolationCheckingExtractor));
    let client = app.client();

    // Same filename everywhere so a shared workspace would collide.
    let requests = (0..REQUESTS).map(|i| {
        let payload = format!("video payload #{i}");
        async move {
            let response = client
                .post("/convert")
                .multipart(video_form("clip.mp4", payload.as_bytes()))
                .await;
            (payload, response)
        }
    });

    for (payload, response) in join_all(requests).await {
        assert_eq!(response.status_code(), 200, "{}", response.text());

        let mut expected = FAKE_MP3_HEADER.to_vec();
        expected.extend_from_slice(payload.as_bytes());
        assert_eq!(response.as_bytes().as_ref(), expected.as_slice());
    }

    assert_eq!(app.scratch_entries(), 0);
}
