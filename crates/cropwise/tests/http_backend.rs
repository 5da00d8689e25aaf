#![cfg(feature = "openai")]

use std::time::Duration;

use cropwise::{
    AdvisoryKind, AdvisoryRequest, CropAdvisor, Field, GenerationConfig, Provenance,
    openai::OpenAiAdapterBuilder,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn advisor_for(server: &MockServer, timeout: Duration) -> CropAdvisor<cropwise::openai::OpenAiAdapter> {
    advisor_with(server, timeout, GenerationConfig::default())
}

fn advisor_with(
    server: &MockServer,
    timeout: Duration,
    config: GenerationConfig,
) -> CropAdvisor<cropwise::openai::OpenAiAdapter> {
    let backend = OpenAiAdapterBuilder::new()
        .with_api_key("gsk_test")
        .with_base_url(format!("{}/openai/v1", server.uri()))
        .with_timeout(timeout)
        .build()
        .unwrap();
    CropAdvisor::with_config(backend, config)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "llama-3.1-8b-instant",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 412, "completion_tokens": 380, "total_tokens": 792}
    })
}

#[tokio::test]
async fn live_reply_is_served_from_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "temperature": 0.7,
            "max_tokens": 1500,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"TYPE": "Oilseed", "SCIENTIFIC_NAME": "Arachis hypogaea", "FAMILY": "Fabaceae"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = advisor_for(&server, Duration::from_secs(5))
        .advise(&AdvisoryRequest::new("Groundnut").unwrap())
        .await;

    assert!(result.success());
    assert_eq!(result.source(), Provenance::GenerativeApi);
    assert_eq!(result.record().get(Field::ScientificName), "Arachis hypogaea");
}

#[tokio::test]
async fn server_error_falls_back_to_curated_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = advisor_for(&server, Duration::from_secs(5))
        .advise(&AdvisoryRequest::new("Tomato").unwrap())
        .await;

    assert!(!result.success());
    assert_eq!(result.source(), Provenance::CuratedDatabase);
    assert_eq!(result.record().get(Field::ScientificName), "Solanum lycopersicum");
}

#[tokio::test]
async fn timeout_falls_back_to_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"TYPE": "Spice"}"#))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = advisor_for(&server, Duration::from_millis(50))
        .advise(&AdvisoryRequest::new("Cardamom").unwrap())
        .await;

    assert!(!result.success());
    assert_eq!(result.source(), Provenance::GenericDefault);
}

#[tokio::test]
async fn reply_without_choices_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let result = advisor_for(&server, Duration::from_secs(5))
        .advise(&AdvisoryRequest::new("Potato").unwrap())
        .await;

    assert!(!result.success());
    assert_eq!(result.source(), Provenance::CuratedDatabase);
}

#[tokio::test]
async fn farming_guide_requests_larger_budget_and_keeps_sections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 2000,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{
                "TYPE": "Cereal Grain",
                "IRRIGATION_METHOD": "Border strip",
                "PEST_MANAGEMENT": {"common_pests": "Aphids", "insecticides": "Imidacloprid"},
                "EXPERT_TIPS": ["Sow before November 25"]
            }"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let guide = GenerationConfig {
        kind: AdvisoryKind::FarmingGuide,
        ..GenerationConfig::default()
    };
    let result = advisor_with(&server, Duration::from_secs(5), guide)
        .advise(&AdvisoryRequest::new("Durum Wheat").unwrap())
        .await;

    assert!(result.success());
    let json = serde_json::to_value(result.record()).unwrap();
    assert_eq!(json["IRRIGATION_METHOD"], "Border strip");
    assert_eq!(json["PEST_MANAGEMENT"]["insecticides"], "Imidacloprid");
    assert_eq!(json["EXPERT_TIPS"], json!(["Sow before November 25"]));
}

#[tokio::test]
async fn farming_guide_outage_serves_curated_practice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let guide = GenerationConfig {
        kind: AdvisoryKind::FarmingGuide,
        ..GenerationConfig::default()
    };
    let result = advisor_with(&server, Duration::from_secs(5), guide)
        .advise(&AdvisoryRequest::new("Rice").unwrap())
        .await;

    assert_eq!(result.source(), Provenance::CuratedDatabase);
    let json = serde_json::to_value(result.record()).unwrap();
    assert_eq!(json["SEED_RATE"], "20-25 kg/acre for transplanting, 80-100 kg/acre for direct seeding");
    assert_eq!(
        json["DISEASE_MANAGEMENT"]["prevention"],
        "Use resistant varieties, balanced fertilization, proper spacing"
    );
}
