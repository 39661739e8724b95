// ==========================================
// 排课编排器集成测试
// ==========================================
// 测试目标: 规划器优先、各类失败回退启发式、设置开关生效
// ==========================================

mod test_helpers;
#[path = "helpers/mock_llm.rs"]
mod mock_llm;

use edu_scheduler::config::{ConfigManager, PlannerConfig};
use edu_scheduler::domain::course::Course;
use edu_scheduler::domain::schedule_request::ScheduleRequest;
use edu_scheduler::domain::settings::Settings;
use edu_scheduler::domain::timetable::HEURISTIC_GENERATOR;
use edu_scheduler::engine::planner::LlmError;
use edu_scheduler::engine::{
    FallbackReason, GenerationSource, GenerativePlanner, HeuristicGenerator, ScheduleOrchestrator,
};
use mock_llm::{single_option_reply, ScriptedLlmClient};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{create_test_db, shared_test_connection};

fn cs_request() -> ScheduleRequest {
    let mut req = ScheduleRequest::new("CS");
    req.semester = Some("Fall".to_string());
    req.year = Some(2024);
    req.courses = vec![
        Course::new("CS101", "Intro", "F1").with_batch("B1"),
        Course::new("CS102", "Data", "F2").with_per_week(1),
    ];
    req
}

fn config_manager(db_path: &str) -> Arc<ConfigManager> {
    Arc::new(
        ConfigManager::from_connection(shared_test_connection(db_path).expect("Failed to open db"))
            .expect("Failed to create ConfigManager"),
    )
}

fn orchestrator_with(
    db_path: &str,
    client: Arc<ScriptedLlmClient>,
    timeout: Duration,
) -> ScheduleOrchestrator<ConfigManager> {
    let planner = GenerativePlanner::new(client, "test-model", 0.2);
    ScheduleOrchestrator::new(config_manager(db_path), planner, timeout)
}

#[tokio::test]
async fn test_planner_options_returned_unchanged() {
    edu_scheduler::logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(ScriptedLlmClient::replying(&single_option_reply("AI Plan")));
    let orchestrator = orchestrator_with(&db_path, client.clone(), Duration::from_secs(5));

    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.source, GenerationSource::Planner);
    assert!(report.fallback_reason.is_none());
    assert_eq!(report.options.len(), 1);
    let option = &report.options[0];
    assert_eq!(option.name, "AI Plan");
    // 缺省字段取自请求
    assert_eq!(option.department, "CS");
    assert_eq!(option.semester.as_deref(), Some("Fall"));
    assert_eq!(option.year, Some(2024));
    assert_eq!(option.generator(), Some("test-model"));
    assert_eq!(option.faculty_index, vec!["F1"]);
    assert_eq!(option.batch_index, vec!["B1"]);
    assert_eq!(client.call_count(), 1);

    let sent = client.last_request().expect("request recorded");
    assert!(sent.user.contains("CS101"));
    assert_eq!(sent.model, "test-model");
}

#[tokio::test]
async fn test_malformed_output_falls_back_to_heuristic() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(ScriptedLlmClient::replying("sorry, I cannot produce a timetable"));
    let orchestrator = orchestrator_with(&db_path, client.clone(), Duration::from_secs(5));

    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.source, GenerationSource::Heuristic);
    assert!(matches!(report.fallback_reason, Some(FallbackReason::PlannerFailed(_))));
    assert_eq!(report.options.len(), 2);
    assert!(report
        .options
        .iter()
        .all(|o| o.generator() == Some(HEURISTIC_GENERATOR)));
    // 不重试
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_transport_error_falls_back() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(ScriptedLlmClient::failing(LlmError::Http("connection refused".to_string())));
    let orchestrator = orchestrator_with(&db_path, client, Duration::from_secs(5));

    let req = cs_request();
    let options = orchestrator.generate(&req).await;

    assert_eq!(options.len(), 2);
    assert_eq!(options[0].name, "Auto-CS-Fall-opt1");
    assert_eq!(options[1].name, "Auto-CS-Fall-opt2");
    assert_eq!(options, HeuristicGenerator::new().generate(&req));
}

#[tokio::test]
async fn test_empty_options_fall_back() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(ScriptedLlmClient::replying(r#"{"options": []}"#));
    let orchestrator = orchestrator_with(&db_path, client, Duration::from_secs(5));

    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.source, GenerationSource::Heuristic);
    assert_eq!(report.fallback_reason, Some(FallbackReason::EmptyResult));
    assert_eq!(report.options, HeuristicGenerator::new().generate(&cs_request()));
}

#[tokio::test]
async fn test_slow_planner_times_out() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(
        ScriptedLlmClient::replying(&single_option_reply("Late Plan"))
            .with_delay(Duration::from_millis(500)),
    );
    let orchestrator = orchestrator_with(&db_path, client, Duration::from_millis(50));

    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.source, GenerationSource::Heuristic);
    match report.fallback_reason {
        Some(FallbackReason::PlannerFailed(detail)) => assert!(detail.contains("超时")),
        other => panic!("Expected timeout fallback, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_opt_out_skips_planner() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let client = Arc::new(ScriptedLlmClient::replying(&single_option_reply("Unused")));
    let orchestrator = orchestrator_with(&db_path, client.clone(), Duration::from_secs(5));

    let mut req = cs_request();
    req.use_planner = false;
    let report = orchestrator.generate_with_report(&req).await;

    assert_eq!(report.fallback_reason, Some(FallbackReason::RequestOptOut));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_settings_switch_disables_planner() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let settings = Settings {
        planner_enabled: false,
        ..Settings::default()
    };
    config_manager(&db_path)
        .update_settings(&settings)
        .expect("Failed to update settings");

    let client = Arc::new(ScriptedLlmClient::replying(&single_option_reply("Unused")));
    let orchestrator = orchestrator_with(&db_path, client.clone(), Duration::from_secs(5));

    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.fallback_reason, Some(FallbackReason::DisabledBySettings));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_missing_credentials_use_heuristic() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = PlannerConfig::from_lookup(|_| None);
    let planner = GenerativePlanner::from_config(&config).expect("planner from config");
    assert!(!planner.is_configured());

    let orchestrator = ScheduleOrchestrator::new(config_manager(&db_path), planner, config.timeout);
    let report = orchestrator.generate_with_report(&cs_request()).await;

    assert_eq!(report.fallback_reason, Some(FallbackReason::NotConfigured));
    assert_eq!(report.options.len(), 2);
}
