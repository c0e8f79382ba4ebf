use serde_json::Value;

/// Checks a successful generation response and returns the published file name.
pub fn assert_video_response(body: &Value, request_id: &str) -> String {
    assert_eq!(
        body.get("message").and_then(|v| v.as_str()),
        Some("Video created successfully")
    );

    let video_file = body
        .get("video_file")
        .and_then(|v| v.as_str())
        .expect("Missing video_file");
    assert_eq!(video_file, format!("{}.mp4", request_id));

    video_file.to_string()
}

pub fn assert_generation_failure(body: &Value, expected_stage: &str) {
    assert_eq!(
        body.get("message").and_then(|v| v.as_str()),
        Some("Video creation failed")
    );
    assert_eq!(
        body.get("stage").and_then(|v| v.as_str()),
        Some(expected_stage)
    );
}
