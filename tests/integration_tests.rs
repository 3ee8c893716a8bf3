// Integration tests for brandscore

use async_trait::async_trait;
use brandscore::config::Settings;
use brandscore::core::{compare_reports, Evaluator};
use brandscore::models::{Direction, JudgeOutcome, JudgeVerdict, ResponseSet, Sample};
use brandscore::services::{
    load_report, save_report, FailurePolicy, JudgeBackend, JudgeError, JudgeOrchestrator,
    PairingOptions, PreferenceGenerator, WeightedJudge,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn uniform(score: f64) -> JudgeVerdict {
    JudgeVerdict {
        brandability: score,
        pronounceability: score,
        constraint: score,
        creativity: score,
        overall: score,
    }
}

/// Scores domains from a lookup table, 5.0 for anything unknown
struct TableJudge {
    name: String,
    scores: HashMap<String, f64>,
}

#[async_trait]
impl JudgeBackend for TableJudge {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _prompt: &str, domain: &str) -> Result<JudgeVerdict, JudgeError> {
        Ok(uniform(self.scores.get(domain).copied().unwrap_or(5.0)))
    }
}

/// Never answers within any reasonable timeout
struct SlowJudge;

#[async_trait]
impl JudgeBackend for SlowJudge {
    fn name(&self) -> &str {
        "slow"
    }

    async fn score(&self, _prompt: &str, _domain: &str) -> Result<JudgeVerdict, JudgeError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(uniform(1.0))
    }
}

struct PanickingJudge;

#[async_trait]
impl JudgeBackend for PanickingJudge {
    fn name(&self) -> &str {
        "panicky"
    }

    async fn score(&self, _prompt: &str, _domain: &str) -> Result<JudgeVerdict, JudgeError> {
        panic!("judge blew up");
    }
}

fn table_judge(name: &str, scores: &[(&str, f64)]) -> Arc<dyn JudgeBackend> {
    Arc::new(TableJudge {
        name: name.to_string(),
        scores: scores.iter().map(|(d, s)| (d.to_string(), *s)).collect(),
    })
}

fn no_delay() -> PairingOptions {
    PairingOptions {
        candidate_delay: Duration::ZERO,
        ..PairingOptions::default()
    }
}

#[test]
fn test_integration_end_to_end_evaluation() {
    let evaluator = Evaluator::default();
    let samples = vec![
        Sample::new(
            "Generate 2 names. Length 4-8. Use TLDs: .com, .io. Must include 'nova'.",
            "- abnova.com — x\n- banova.io — y",
        ),
        Sample::new(
            "Generate 3 names for a coffee shop. Use TLDs: .com",
            "1. brewlo.com — warm\n2. beanly.com — friendly\n3. brewlo.com — repeated",
        ),
        Sample::new("Generate 5 names", "I can't think of any."),
    ];

    let report = evaluator.evaluate("baseline", &samples).unwrap();

    assert_eq!(report.num_samples, 3);
    assert_eq!(report.cross_batch_diversity.total_names, 5);
    assert_eq!(report.cross_batch_diversity.unique_names, 4);
    assert_eq!(report.cross_batch_diversity.most_common_names[0].value, "brewlo");
    assert_eq!(report.cross_batch_diversity.most_common_names[0].count, 2);
    assert!(report.combined_score > 0.0 && report.combined_score < 1.0);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["constraints"]["avg_tld_satisfied"].is_number());
    assert!(json["diversity"]["avg_duplicate_rate"].is_number());
    assert!(json["cross_batch_diversity"]["unique_ratio"].is_number());
}

#[test]
fn test_integration_report_round_trip_and_compare() {
    let evaluator = Evaluator::default();
    let weak = evaluator
        .evaluate("weak", &[Sample::new("Generate 2 names. Use TLDs: .com", "- xkqzptm.xyz — bad")])
        .unwrap();
    let strong = evaluator
        .evaluate(
            "strong",
            &[Sample::new(
                "Generate 2 names. Use TLDs: .com",
                "- brewlo.com — good\n- cofio.com — good",
            )],
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("weak.json");
    save_report(&path, &weak).unwrap();
    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded, weak);

    let comparison = compare_reports(&loaded, &strong);
    assert_eq!(comparison.delta("constraints.tld_satisfied").unwrap().direction, Direction::Up);
    assert_eq!(comparison.delta("combined_score").unwrap().direction, Direction::Up);

    let same = compare_reports(&strong, &strong);
    assert!(same.deltas.iter().all(|d| d.direction == Direction::Unchanged));
}

#[tokio::test]
async fn test_integration_timeout_leaves_survivor_unchanged() {
    let orchestrator = JudgeOrchestrator::new(
        vec![
            WeightedJudge::new(table_judge("fast", &[("brewlo.io", 8.0)]), 0.5),
            WeightedJudge::new(Arc::new(SlowJudge), 0.5),
        ],
        Duration::from_millis(100),
    );

    let scored = orchestrator.score_candidate("Generate names", "brewlo.io").await;

    match &scored.verdicts[1].outcome {
        JudgeOutcome::Failed(reason) => assert_eq!(reason, "Timed out after 100ms"),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(scored.blended, Some(uniform(8.0)));
    assert!((scored.combined_score - 8.0).abs() < 1e-9);
    assert!(scored.combined_score.is_finite());
}

#[tokio::test]
async fn test_integration_neutral_policy_blends_failures() {
    let orchestrator = JudgeOrchestrator::new(
        vec![
            WeightedJudge::new(table_judge("fast", &[("brewlo.io", 9.0)]), 0.5),
            WeightedJudge::new(Arc::new(SlowJudge), 0.5),
        ],
        Duration::from_millis(50),
    )
    .with_policy(FailurePolicy::Neutral);

    let scored = orchestrator.score_candidate("p", "brewlo.io").await;
    assert!((scored.combined_score - 7.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_integration_every_judge_failing_scores_five() {
    let orchestrator = JudgeOrchestrator::new(
        vec![
            WeightedJudge::new(Arc::new(PanickingJudge), 0.5),
            WeightedJudge::new(Arc::new(SlowJudge), 0.5),
        ],
        Duration::from_millis(50),
    );

    let scored = orchestrator.score_candidate("p", "a.com").await;
    assert!(scored.verdicts.iter().all(|v| !v.outcome.is_scored()));
    assert_eq!(scored.blended, None);
    assert!((scored.combined_score - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_integration_preference_pipeline() {
    let judge = table_judge(
        "table",
        &[("brewlo.com", 9.0), ("beanly.io", 8.8), ("mugzy.co", 6.0), ("xkqzptm.xyz", 2.0)],
    );
    let generator = PreferenceGenerator::new(
        JudgeOrchestrator::new(vec![WeightedJudge::new(judge, 1.0)], Duration::from_secs(1)),
        no_delay(),
    );

    let sets = vec![
        ResponseSet {
            prompt: "Coffee brand names".to_string(),
            responses: vec![
                "- brewlo.com — warm\n- beanly.io — friendly".to_string(),
                "- brewlo.com — again\n- mugzy.co — playful\n- xkqzptm.xyz — no".to_string(),
            ],
        },
        ResponseSet {
            prompt: "Single idea".to_string(),
            responses: vec!["- lonely.com — only one".to_string()],
        },
    ];

    let pairs = generator.generate(&sets).await;

    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|p| p.chosen == "brewlo.com"));
    let rejected: Vec<&str> = pairs.iter().map(|p| p.rejected.as_str()).collect();
    assert_eq!(rejected, vec!["mugzy.co", "xkqzptm.xyz"]);
    assert!(pairs.iter().all(|p| p.prompt == "Coffee brand names"));
}

#[tokio::test]
async fn test_integration_http_judge_from_settings() {
    let mut server = mockito::Server::new_async().await;
    let content = r#"```json
{"brandability": 9, "pronounceability": 8, "constraint": 9, "creativity": 7, "overall": 8}
```"#;
    let body = serde_json::json!({"choices": [{"message": {"content": content}}]}).to_string();
    let mock = server
        .mock("POST", "/chat")
        .match_header("http-referer", mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[judge]
endpoint = "{}/chat"
api_key = "test-key"
timeout_secs = 5

[[judge.judges]]
name = "mock"
model = "mock/model"
weight = 1.0
focus = "everything"
"#,
        server.url()
    )
    .unwrap();

    let settings = Settings::load_from(file.path()).unwrap();
    let api_key = settings.require_api_key().unwrap().to_string();
    let orchestrator = settings.orchestrator(&api_key).unwrap();

    let scored = orchestrator.score_candidate("Generate names", "brewlo.io").await;

    assert!(scored.verdicts[0].outcome.is_scored());
    // 9*.25 + 8*.20 + 9*.25 + 7*.15 + 8*.15
    assert!((scored.combined_score - 8.35).abs() < 1e-9);
    mock.assert_async().await;
}
