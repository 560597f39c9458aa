//! `ServerTranscriber` against a mocked whisper.cpp `/inference` endpoint.

use sakura_voice::stt::{ServerTranscriber, Transcriber};
use sakura_voice::{Recorder, VoiceError, VoiceInput, wav};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn sample_wav(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let p = dir.path().join("clip.wav");
    let samples: Vec<f32> = (0..1_600).map(|i| ((i as f32) / 20.0).sin() * 0.3).collect();
    wav::write_wav(&p, &samples, 16_000).unwrap();
    p
}

#[tokio::test]
async fn posts_multipart_and_reads_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference"))
        .respond_with(|req: &Request| {
            let content_type = req
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let body = String::from_utf8_lossy(&req.body);
            if content_type.starts_with("multipart/form-data")
                && body.contains("name=\"file\"")
                && body.contains("filename=\"audio.wav\"")
                && body.contains("name=\"response_format\"")
                && body.contains("RIFF")
            {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": " Hello Sakura.\n"}))
            } else {
                ResponseTemplate::new(400).set_body_string("bad form")
            }
        })
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let wav_path = sample_wav(&dir);
    let t = ServerTranscriber::new(&server.uri(), "en");
    assert_eq!(t.transcribe(&wav_path).await.unwrap(), "Hello Sakura.");
}

#[tokio::test]
async fn http_error_is_transcription_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let t = ServerTranscriber::new(&server.uri(), "en");
    let err = t.transcribe(&sample_wav(&dir)).await.unwrap_err();
    match err {
        VoiceError::Transcription(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("model not loaded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_field_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "failed to read WAV"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let t = ServerTranscriber::new(&server.uri(), "en");
    let err = t.transcribe(&sample_wav(&dir)).await.unwrap_err();
    assert_eq!(err.to_string(), "transcription failed: failed to read WAV");
}

#[tokio::test]
async fn unreachable_server() {
    let dir = tempfile::tempdir().unwrap();
    let t = ServerTranscriber::new("http://127.0.0.1:1", "en");
    let err = t.transcribe(&sample_wav(&dir)).await.unwrap_err();
    assert!(matches!(err, VoiceError::Unreachable(ref url) if url == "http://127.0.0.1:1"));
}

#[tokio::test]
async fn voice_input_pipeline_with_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "play some music"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let voice = VoiceInput::new(
        Recorder::new(None, 16_000),
        Box::new(ServerTranscriber::new(&server.uri(), "en")),
    )
    .with_wav_path(dir.path().join(wav::TEMP_WAV_NAME));

    let text = voice.transcribe_samples(&[0.2; 4_000], 16_000).await.unwrap();
    assert_eq!(text, "play some music");
    assert!(!voice.wav_path().exists());
}
