//! Murf TTS integration tests
//!
//! Drives the Murf adapter against a mocked Murf API and checks the emitted
//! event sequences: ordering, error classification, timeouts, the indirect
//! (`audioFile`) and inline (`encodedAudio`) response forms, resampling and
//! isolation between concurrent calls.

mod fixtures;

use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::{WAV_HEADER_LEN, generate_sine_wave, tone_wav, wav_bytes};
use voice_bot::core::audio::strip_wav_header;
use voice_bot::core::tts::{
    BaseTTS, MurfAuthScheme, MurfTTS, MurfTTSConfig, TTSError, TTSErrorKind, TTSEvent,
};
use voice_bot::utils::url_validation::AudioUrlPolicy;

const SPEECH_PATH: &str = "/v1/speech/generate";

fn murf_config(server: &MockServer) -> MurfTTSConfig {
    MurfTTSConfig {
        endpoint: format!("{}{}", server.uri(), SPEECH_PATH),
        audio_url_policy: AudioUrlPolicy::Permissive,
        request_timeout_secs: 5,
        ..MurfTTSConfig::with_api_key("test-key")
    }
}

async fn collect(tts: &MurfTTS, text: &str) -> Vec<TTSEvent> {
    tts.synthesize(text).collect().await
}

/// Assert `[Started, AudioChunk+, Stopped]` and return the joined audio
fn assert_success(events: &[TTSEvent]) -> Vec<u8> {
    assert!(events.len() >= 3, "too few events: {events:?}");
    assert_eq!(events.first(), Some(&TTSEvent::Started));
    assert_eq!(events.last(), Some(&TTSEvent::Stopped));

    let mut audio = Vec::new();
    for event in &events[1..events.len() - 1] {
        match event {
            TTSEvent::AudioChunk(frame) => audio.extend_from_slice(&frame.data),
            other => panic!("Expected AudioChunk, got: {other:?}"),
        }
    }
    audio
}

/// Assert exactly one `Error` event and return it
fn assert_single_error(events: &[TTSEvent]) -> TTSError {
    assert_eq!(events.len(), 1, "expected a single event: {events:?}");
    match &events[0] {
        TTSEvent::Error(e) => e.clone(),
        other => panic!("Expected Error, got: {other:?}"),
    }
}

// =============================================================================
// Success paths
// =============================================================================

#[tokio::test]
async fn test_binary_wav_response_emits_started_chunk_stopped() {
    let server = MockServer::start().await;
    let wav = tone_wav(16000, 200);

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({
            "voiceId": "en-US-ken",
            "text": "Hello there",
            "format": "WAV",
            "sampleRate": 16000,
            "channelType": "MONO"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(wav.clone()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let events = collect(&tts, "Hello there").await;

    let audio = assert_success(&events);
    assert_eq!(audio.len(), wav.len() - WAV_HEADER_LEN);
    assert_eq!(audio, strip_wav_header(&wav));

    for event in &events {
        if let TTSEvent::AudioChunk(frame) = event {
            assert_eq!(frame.sample_rate, 16000);
            assert_eq!(frame.channels, 1);
        }
    }
}

#[tokio::test]
async fn test_bearer_auth_scheme() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 50)))
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        auth_scheme: MurfAuthScheme::Bearer,
        ..murf_config(&server)
    })
    .unwrap();

    assert_success(&collect(&tts, "Hi").await);
}

#[tokio::test]
async fn test_optional_request_fields_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "style": "Conversational",
            "modelVersion": "GEN2",
            "rate": 10,
            "pitch": -5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 50)))
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        style: Some("Conversational".to_string()),
        model_version: Some("GEN2".to_string()),
        rate: Some(10),
        pitch: Some(-5),
        ..murf_config(&server)
    })
    .unwrap();

    assert_success(&collect(&tts, "Styled").await);
}

#[tokio::test]
async fn test_audio_file_url_is_downloaded() {
    let server = MockServer::start().await;
    let wav = tone_wav(16000, 100);

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioFile": format!("{}/audio/abc.wav", server.uri()),
            "audioLengthInSeconds": 0.1,
            "consumedCharacterCount": 5,
            "remainingCharacterCount": 99995,
            "warning": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/audio/abc.wav"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(wav.clone()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let audio = assert_success(&collect(&tts, "Hello").await);
    assert_eq!(audio, strip_wav_header(&wav));
}

#[tokio::test]
async fn test_encoded_audio_is_decoded_inline() {
    let server = MockServer::start().await;
    let wav = tone_wav(16000, 100);

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "encodeAsBase64": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioFile": "",
            "encodedAudio": BASE64.encode(&wav)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        encode_as_base64: true,
        ..murf_config(&server)
    })
    .unwrap();

    let audio = assert_success(&collect(&tts, "Hello").await);
    assert_eq!(audio, strip_wav_header(&wav));
}

#[tokio::test]
async fn test_short_payload_passes_through_unchanged() {
    let server = MockServer::start().await;
    let short = vec![1u8, 2, 3, 4, 5, 6, 7, 8];

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(short.clone()),
        )
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let audio = assert_success(&collect(&tts, "Hi").await);
    assert_eq!(audio, short);
}

// =============================================================================
// Audio format
// =============================================================================

#[tokio::test]
async fn test_24khz_audio_is_resampled_to_target() {
    let server = MockServer::start().await;

    // 100ms at 24kHz
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(24000, 100)))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let events = collect(&tts, "Resample me").await;
    let audio = assert_success(&events);

    // 100ms at 16kHz mono PCM16
    assert_eq!(audio.len(), 1600 * 2);
    for event in &events {
        if let TTSEvent::AudioChunk(frame) = event {
            assert_eq!(frame.sample_rate, 16000);
            assert_eq!(frame.channels, 1);
        }
    }

    // The resampled tone still carries signal
    let peak = audio
        .chunks_exact(2)
        .map(|p| i16::from_le_bytes([p[0], p[1]]).unsigned_abs())
        .max()
        .unwrap();
    assert!(peak > 10000, "peak too low: {peak}");
}

#[tokio::test]
async fn test_stereo_audio_is_downmixed() {
    let server = MockServer::start().await;
    let left = generate_sine_wave(1600, 16000, 440.0, 0.5);
    let interleaved: Vec<i16> = left.iter().flat_map(|&s| [s, s]).collect();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav_bytes(&interleaved, 16000, 2)))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let audio = assert_success(&collect(&tts, "Stereo").await);
    assert_eq!(audio.len(), 1600 * 2);
}

#[tokio::test]
async fn test_frames_are_chunked_by_duration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 100)))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        frame_duration_ms: Some(20),
        ..murf_config(&server)
    })
    .unwrap();

    let events = collect(&tts, "Chunked").await;
    let audio = assert_success(&events);
    assert_eq!(audio.len(), 3200);

    // Started + 5 x 20ms + Stopped
    assert_eq!(events.len(), 7);
    for event in &events[1..6] {
        match event {
            TTSEvent::AudioChunk(frame) => assert_eq!(frame.data.len(), 640),
            other => panic!("Expected AudioChunk, got: {other:?}"),
        }
    }
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_client_error_is_remote_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "Hello").await);

    assert_eq!(error.kind(), TTSErrorKind::RemoteRejected);
    assert_eq!(error.to_string(), "401: invalid api key");
}

#[tokio::test]
async fn test_server_error_is_remote_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "Hello").await);
    assert_eq!(
        error,
        TTSError::RemoteRejected {
            status: 503,
            body: "overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(tone_wav(16000, 50))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        request_timeout_secs: 1,
        ..murf_config(&server)
    })
    .unwrap();

    let started = Instant::now();
    let error = assert_single_error(&collect(&tts, "Hello").await);

    assert_eq!(error.kind(), TTSErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_slow_audio_download_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SPEECH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioFile": format!("{}/audio/slow.wav", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/audio/slow.wav"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(tone_wav(16000, 50))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        request_timeout_secs: 1,
        ..murf_config(&server)
    })
    .unwrap();

    let started = Instant::now();
    let error = assert_single_error(&collect(&tts, "Hello").await);

    assert_eq!(error.kind(), TTSErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_malformed_wav_is_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/wav")
                .set_body_bytes(vec![0x42u8; 256]),
        )
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "Hello").await);
    assert_eq!(error.kind(), TTSErrorKind::Unexpected);
}

#[tokio::test]
async fn test_json_without_audio_is_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "warning": "no audio" })))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "Hello").await);
    assert_eq!(error.kind(), TTSErrorKind::Unexpected);
}

#[tokio::test]
async fn test_failed_download_is_remote_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioFile": format!("{}/audio/missing.wav", server.uri())
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/audio/missing.wav"))
        .respond_with(ResponseTemplate::new(404).set_body_string("expired"))
        .expect(1)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "Hello").await);
    assert_eq!(error.to_string(), "404: expired");
}

#[tokio::test]
async fn test_strict_policy_refuses_local_audio_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioFile": format!("{}/audio/abc.wav", server.uri())
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 50)))
        .expect(0)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        audio_url_policy: AudioUrlPolicy::Strict,
        ..murf_config(&server)
    })
    .unwrap();

    let error = assert_single_error(&collect(&tts, "Hello").await);
    assert_eq!(error.kind(), TTSErrorKind::Unexpected);
}

#[tokio::test]
async fn test_empty_text_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 50)))
        .expect(0)
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let error = assert_single_error(&collect(&tts, "").await);
    assert!(matches!(error, TTSError::InvalidInput(_)));
}

// =============================================================================
// Stream semantics
// =============================================================================

#[tokio::test]
async fn test_stream_is_lazy_until_polled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(tone_wav(16000, 50)))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let stream = tts.synthesize("Not yet");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());

    let events: Vec<TTSEvent> = stream.collect().await;
    assert_success(&events);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let server = MockServer::start().await;
    let wav_one = tone_wav(16000, 100);
    let wav_two = wav_bytes(&vec![1234i16; 800], 16000, 1);

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "text": "one" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(wav_one.clone())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "text": "two" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav_two.clone()))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(murf_config(&server)).unwrap();
    let (events_one, events_two) = tokio::join!(collect(&tts, "one"), collect(&tts, "two"));

    assert_eq!(assert_success(&events_one), strip_wav_header(&wav_one));
    assert_eq!(assert_success(&events_two), strip_wav_header(&wav_two));
}

#[tokio::test]
async fn test_synthesize_to_frame() {
    let server = MockServer::start().await;
    let wav = tone_wav(16000, 60);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav.clone()))
        .mount(&server)
        .await;

    let tts = MurfTTS::new(MurfTTSConfig {
        frame_duration_ms: Some(20),
        ..murf_config(&server)
    })
    .unwrap();

    let frame = tts.synthesize_to_frame("Whole").await.unwrap();
    assert_eq!(&frame.data[..], strip_wav_header(&wav));
    assert_eq!(frame.duration_ms(), 60);
}
