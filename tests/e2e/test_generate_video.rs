use crate::e2e::helpers;

use helpers::assertions::{assert_generation_failure, assert_video_response};
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

fn valid_request() -> serde_json::Value {
    json!({
        "topic": "Ownership in Rust",
        "content": "Every value in Rust has a single owner. When the owner goes out of scope the value is dropped. Borrowing lets code use a value without taking ownership.",
        "code": "fn main() {\n    let s = String::from(\"hi\");\n    println!(\"{}\", s);\n}"
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_video_and_serve_it(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate-video", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let request_id = response.request_id().to_string();
    let video_file = assert_video_response(response.body.as_ref().unwrap(), &request_id);
    assert!(ctx.output_dir().join(&video_file).exists());

    // Summary narration only: one segment, encoded from one base video.
    assert_eq!(
        *ctx.encoder.calls.lock(),
        vec!["encode_frames", "mux", "concat"]
    );
    assert_eq!(ctx.synthesizer.spoken.lock().len(), 1);

    let download = ctx
        .client
        .get(&format!("/templates/{}", video_file))
        .await
        .unwrap();
    download
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "video/mp4")
        .assert_header(
            "content-disposition",
            &format!("attachment; filename=\"{}\"", video_file),
        );

    let listing = String::from_utf8(download.body_bytes.clone()).unwrap();
    assert_eq!(listing.lines().count(), 1);
    assert!(listing.starts_with("file '"));
    assert!(listing.contains("video_summary.mp3.mp4"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_remove_the_work_directory_after_the_request(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/generate-video", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(ctx.work_entries().is_empty(), "{:?}", ctx.work_entries());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_request_without_code(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/generate-video",
            &json!({"topic": "T", "content": "Some content."}),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Topic, content, and code are required");

    // No stage ran and nothing was written.
    assert!(ctx.encoder.calls.lock().is_empty());
    assert!(ctx.synthesizer.spoken.lock().is_empty());
    assert!(ctx.work_entries().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_fields(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/generate-video",
            &json!({"topic": "   ", "content": "Some content.", "code": "print(1)"}),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Topic, content, and code are required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_body_that_is_not_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/generate-video", "topic=T&content=C&code=x")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Topic, content, and code are required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_the_failed_stage_when_the_encoder_fails(ctx: &TestContext) {
    ctx.encoder.fail_on("mux");

    let response = ctx
        .client
        .post("/generate-video", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_generation_failure(response.body.as_ref().unwrap(), "assembling");

    let published = ctx.output_dir().join(format!("{}.mp4", response.request_id()));
    assert!(!published.exists());
    assert!(!ctx.encoder.calls.lock().contains(&"concat".to_string()));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_give_concurrent_requests_separate_videos(ctx: &TestContext) {
    let mut futures = Vec::new();
    for _ in 0..3 {
        let client = ctx.client.clone();
        futures.push(async move { client.post("/generate-video", &valid_request()).await });
    }

    let results = futures::future::join_all(futures).await;

    let mut video_files = Vec::new();
    for result in results {
        let response = result.unwrap();
        response.assert_status(StatusCode::OK);
        let request_id = response.request_id().to_string();
        video_files.push(assert_video_response(response.body.as_ref().unwrap(), &request_id));
    }

    video_files.sort();
    video_files.dedup();
    assert_eq!(video_files.len(), 3);
    for file in &video_files {
        assert!(ctx.output_dir().join(file).exists());
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_videos(ctx: &TestContext) {
    let response = ctx.client.get("/templates/missing.mp4").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_paths_outside_the_output_directory(ctx: &TestContext) {
    let response = ctx.client.get("/templates/..%2Fsecret.txt").await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_serve_the_work_directory(ctx: &TestContext) {
    let response = ctx.client.get("/templates/work").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clean_up_leftover_work_directories(ctx: &TestContext) {
    for name in ["abandoned-1", "abandoned-2"] {
        let dir = ctx.work_root().join(name);
        std::fs::create_dir_all(dir.join("frames")).unwrap();
        std::fs::write(dir.join("frames").join("slide_001.png"), b"png").unwrap();
    }

    let response = ctx.client.post_empty("/cleanup").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("message").and_then(|v| v.as_str()),
        Some("Session cleaned up.")
    );
    assert_eq!(body.get("removed").and_then(|v| v.as_u64()), Some(2));
    assert!(ctx.work_entries().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_nothing_removed_when_already_clean(ctx: &TestContext) {
    let response = ctx.client.post_empty("/cleanup").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap().get("removed").and_then(|v| v.as_u64()),
        Some(0)
    );
}
