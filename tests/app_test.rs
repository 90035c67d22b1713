use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use neo_pokedex::app::controller::{Controller, Outcome};
use neo_pokedex::app::messages::{Message, Request};
use neo_pokedex::app::runtime::{load_source, Runtime, StartError};
use neo_pokedex::config::{DataSource, DexConfig, DEFAULT_TEXT_MODEL};
use neo_pokedex::data::loader::load_pokedex;
use neo_pokedex::dex::detail::DetailPage;
use neo_pokedex::dex::filter::FilterCriteria;
use neo_pokedex::oracle::client::{GenerativeBackend, GeneratedImage, OracleError};
use neo_pokedex::oracle::prompts::{
    TextPrompt, ANALYSIS_FAILURE_MESSAGE, IMAGE_FAILURE_MESSAGE, ORACLE_FAILURE_MESSAGE,
    ORACLE_SYSTEM_INSTRUCTION,
};
use neo_pokedex::oracle::task::{AiTask, Ticket};

fn sample_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("pokedex.sample.json")
}

fn make_controller() -> Controller {
    Controller::new(load_pokedex(&sample_path()).expect("sample dataset should load"))
}

/// Backend that answers every call with canned data, or fails every call.
struct FakeBackend {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn ok() -> Self {
        FakeBackend {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        FakeBackend {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerativeBackend for FakeBackend {
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(OracleError::InvalidResponse("quota".to_string()));
        }
        Ok(GeneratedImage {
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        })
    }

    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(OracleError::Api {
                status: 503,
                message: "overloaded".to_string(),
            });
        }
        Ok(format!("echo: {}", prompt.contents))
    }
}

fn expect_dispatch(outcome: Outcome) -> Request {
    match outcome {
        Outcome::Dispatch(request) => request,
        other => panic!("expected a dispatched request, got {:?}", other),
    }
}

fn visible_ids(controller: &Controller) -> Vec<u32> {
    controller.visible().iter().map(|r| r.id).collect()
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_filter_messages_update_visible_set() {
    let mut c = make_controller();
    assert_eq!(visible_ids(&c).len(), 10);

    c.update(Message::SelectType(Some("grass".to_string())));
    assert_eq!(visible_ids(&c), vec![1, 2, 152]);

    c.update(Message::SelectRegion(Some(1)));
    assert_eq!(visible_ids(&c), vec![1, 2]);

    c.update(Message::SelectMinBst(Some(400)));
    assert_eq!(visible_ids(&c), vec![2]);

    c.update(Message::SetSearchText("bulba".to_string()));
    assert!(visible_ids(&c).is_empty());

    c.update(Message::SelectEggGroup(Some("Monster".to_string())));
    assert_eq!(c.update(Message::ResetFilters), Outcome::Applied);
    assert_eq!(c.criteria(), &FilterCriteria::default());
    assert_eq!(visible_ids(&c).len(), 10);
}

// =============================================================================
// Team
// =============================================================================

#[test]
fn test_team_messages_and_coverage() {
    let mut c = make_controller();
    assert!(c.coverage().is_empty());

    assert_eq!(c.update(Message::AddToTeam(1)), Outcome::Applied);
    assert_eq!(c.update(Message::AddToTeam(4)), Outcome::Applied);
    assert!(matches!(c.update(Message::AddToTeam(1)), Outcome::Ignored(_)));
    assert!(matches!(c.update(Message::AddToTeam(9999)), Outcome::Ignored(_)));
    assert!(c.is_in_team(4));

    let coverage = c.coverage();
    for tag in &coverage.weaknesses {
        assert!(!coverage.resistances.contains(tag));
    }
    // Charmander resists Fire, covering Bulbasaur's Fire weakness.
    assert!(!coverage.weaknesses.contains(&"Fire".to_string()));

    assert_eq!(c.update(Message::RemoveFromTeam(4)), Outcome::Applied);
    assert!(matches!(
        c.update(Message::RemoveFromTeam(4)),
        Outcome::Ignored(_)
    ));
    assert_eq!(c.team().ids(), &[1]);
}

#[test]
fn test_full_team_ignores_additions() {
    let mut c = make_controller();
    for id in [1, 2, 4, 7, 25, 52] {
        assert_eq!(c.update(Message::AddToTeam(id)), Outcome::Applied);
    }
    assert!(c.is_team_full());
    assert!(matches!(c.update(Message::AddToTeam(94)), Outcome::Ignored(_)));
    assert_eq!(c.team().len(), 6);
}

#[test]
fn test_analysis_needs_two_members() {
    let mut c = make_controller();
    c.update(Message::AddToTeam(25));
    assert!(matches!(c.update(Message::AnalyzeTeam), Outcome::Ignored(_)));
    assert!(!c.analysis().open);

    c.update(Message::AddToTeam(94));
    let request = expect_dispatch(c.update(Message::AnalyzeTeam));
    assert!(c.analysis().open);
    assert!(c.analysis().analysis.is_loading());

    match request {
        Request::AnalyzeTeam { prompt, .. } => {
            assert!(prompt
                .contents
                .starts_with("Analyze the following Pokémon team: Pikachu (Types: Electric), Gengar (Types: Ghost/Poison)."));
            assert!(prompt.system_instruction.is_none());
        }
        other => panic!("unexpected request {:?}", other),
    }
}

#[test]
fn test_closed_analysis_discards_late_result() {
    let mut c = make_controller();
    c.update(Message::AddToTeam(1));
    c.update(Message::AddToTeam(4));
    let ticket = expect_dispatch(c.update(Message::AnalyzeTeam)).ticket();

    c.update(Message::CloseAnalysis);
    let outcome = c.update(Message::AnalysisReady {
        ticket,
        result: Ok("late".to_string()),
    });
    assert!(matches!(outcome, Outcome::Ignored(_)));
    assert_eq!(c.analysis().analysis, AiTask::Idle);
}

#[test]
fn test_newer_analysis_supersedes_older() {
    let mut c = make_controller();
    c.update(Message::AddToTeam(1));
    c.update(Message::AddToTeam(4));
    let first = expect_dispatch(c.update(Message::AnalyzeTeam)).ticket();
    let second = expect_dispatch(c.update(Message::AnalyzeTeam)).ticket();
    assert!(second > first);

    let stale = c.update(Message::AnalysisReady {
        ticket: first,
        result: Ok("old".to_string()),
    });
    assert!(matches!(stale, Outcome::Ignored(_)));
    assert!(c.analysis().analysis.is_loading());

    c.update(Message::AnalysisReady {
        ticket: second,
        result: Ok("new".to_string()),
    });
    assert_eq!(c.analysis().analysis.result().map(String::as_str), Some("new"));
}

#[test]
fn test_analysis_failure_is_generic() {
    let mut c = make_controller();
    c.update(Message::AddToTeam(1));
    c.update(Message::AddToTeam(4));
    let ticket = expect_dispatch(c.update(Message::AnalyzeTeam)).ticket();

    c.update(Message::AnalysisReady {
        ticket,
        result: Err(OracleError::MissingApiKey),
    });
    assert_eq!(c.analysis().analysis.error(), Some(ANALYSIS_FAILURE_MESSAGE));
    // Team state is untouched by the failure.
    assert_eq!(c.team().ids(), &[1, 4]);
}

// =============================================================================
// Detail view & oracle
// =============================================================================

#[test]
fn test_detail_navigation() {
    let mut c = make_controller();
    assert!(matches!(c.update(Message::OpenDetail(9999)), Outcome::Ignored(_)));
    assert!(c.detail().is_none());

    c.update(Message::OpenDetail(52));
    assert_eq!(c.detail_record().map(|r| r.name.as_str()), Some("Meowth"));
    assert_eq!(c.detail().unwrap().page, DetailPage::About);

    assert_eq!(c.update(Message::ShowPage(DetailPage::Forms)), Outcome::Applied);
    assert_eq!(c.detail().unwrap().page, DetailPage::Forms);

    // Following an evolution link resets the view.
    c.update(Message::OpenDetail(1));
    c.update(Message::ShowPage(DetailPage::Evolutions));
    assert_eq!(
        c.update(Message::OpenDetailByName("ivysaur".to_string())),
        Outcome::Applied
    );
    assert_eq!(c.detail().unwrap().record_id, 2);
    assert_eq!(c.detail().unwrap().page, DetailPage::About);

    // Bulbasaur has no forms page.
    c.update(Message::OpenDetail(1));
    assert!(matches!(
        c.update(Message::ShowPage(DetailPage::Forms)),
        Outcome::Ignored(_)
    ));

    // Unknown evolution targets are ignored and the view stays.
    assert!(matches!(
        c.update(Message::OpenDetailByName("Venusaur".to_string())),
        Outcome::Ignored(_)
    ));
    assert_eq!(c.detail().unwrap().record_id, 1);

    c.update(Message::CloseDetail);
    assert!(c.detail().is_none());
    assert!(c.detail_pages().is_empty());
}

#[test]
fn test_oracle_question_flow() {
    let mut c = make_controller();
    assert!(matches!(c.update(Message::AskOracle), Outcome::Ignored(_)));

    c.update(Message::OpenDetail(143));
    assert!(matches!(c.update(Message::AskOracle), Outcome::Ignored(_)));

    c.update(Message::SetQuestion("What does it eat?".to_string()));
    let request = expect_dispatch(c.update(Message::AskOracle));
    let ticket = request.ticket();
    match &request {
        Request::AskOracle { prompt, .. } => {
            assert_eq!(
                prompt.contents,
                "Answer the following question about the Pokémon named Snorlax: What does it eat?"
            );
            assert_eq!(
                prompt.system_instruction.as_deref(),
                Some(ORACLE_SYSTEM_INSTRUCTION)
            );
        }
        other => panic!("unexpected request {:?}", other),
    }

    // Locked while answering.
    assert!(matches!(c.update(Message::AskOracle), Outcome::Ignored(_)));
    assert!(matches!(
        c.update(Message::SetQuestion("other".to_string())),
        Outcome::Ignored(_)
    ));

    c.update(Message::OracleAnswered {
        ticket,
        result: Ok("Anything.".to_string()),
    });
    assert_eq!(
        c.detail().unwrap().answer.result().map(String::as_str),
        Some("Anything.")
    );
}

#[test]
fn test_oracle_answer_for_previous_record_is_discarded() {
    let mut c = make_controller();
    c.update(Message::OpenDetail(25));
    c.update(Message::SetQuestion("Why yellow?".to_string()));
    let ticket = expect_dispatch(c.update(Message::AskOracle)).ticket();

    c.update(Message::OpenDetail(133));
    let outcome = c.update(Message::OracleAnswered {
        ticket,
        result: Ok("Because.".to_string()),
    });
    assert!(matches!(outcome, Outcome::Ignored(_)));
    assert_eq!(c.detail().unwrap().answer, AiTask::Idle);
    assert!(c.detail().unwrap().question.is_empty());
}

#[test]
fn test_oracle_failure_is_generic() {
    let mut c = make_controller();
    c.update(Message::OpenDetail(25));
    c.update(Message::SetQuestion("Why yellow?".to_string()));
    let ticket = expect_dispatch(c.update(Message::AskOracle)).ticket();

    c.update(Message::OracleAnswered {
        ticket,
        result: Err(OracleError::InvalidResponse("boom".to_string())),
    });
    assert_eq!(c.detail().unwrap().answer.error(), Some(ORACLE_FAILURE_MESSAGE));
}

// =============================================================================
// Image creator
// =============================================================================

#[test]
fn test_image_generation_guards() {
    let mut c = make_controller();
    assert!(matches!(c.update(Message::GenerateImage), Outcome::Ignored(_)));

    c.update(Message::SetImagePrompt("   ".to_string()));
    assert!(matches!(c.update(Message::GenerateImage), Outcome::Ignored(_)));

    c.update(Message::SetImagePrompt("a fire cat".to_string()));
    let request = expect_dispatch(c.update(Message::GenerateImage));
    match &request {
        Request::GenerateImage { prompt, .. } => {
            assert!(prompt.contains("\"a fire cat\""));
            assert!(prompt.contains("pixel art"));
        }
        other => panic!("unexpected request {:?}", other),
    }

    assert!(matches!(c.update(Message::GenerateImage), Outcome::Ignored(_)));
    assert!(matches!(
        c.update(Message::SetImagePrompt("edit".to_string())),
        Outcome::Ignored(_)
    ));
    assert_eq!(c.creator().prompt, "a fire cat");

    c.update(Message::ImageGenerated {
        ticket: request.ticket(),
        result: Err(OracleError::MissingApiKey),
    });
    assert_eq!(c.creator().image.error(), Some(IMAGE_FAILURE_MESSAGE));

    // Recoverable: the next attempt starts over.
    expect_dispatch(c.update(Message::GenerateImage));
    assert!(c.creator().image.is_loading());
}

#[test]
fn test_unknown_ticket_is_ignored() {
    let mut c = make_controller();
    let outcome = c.update(Message::ImageGenerated {
        ticket: Ticket(42),
        result: Ok(GeneratedImage {
            mime_type: "image/png".to_string(),
            bytes: vec![],
        }),
    });
    assert!(matches!(outcome, Outcome::Ignored(_)));
    assert_eq!(c.creator().image, AiTask::Idle);
}

// =============================================================================
// Runtime
// =============================================================================

#[tokio::test]
async fn test_runtime_runs_independent_requests() {
    let backend = Arc::new(FakeBackend::ok());
    let mut rt = Runtime::new(make_controller(), backend.clone());

    rt.dispatch(Message::AddToTeam(1));
    rt.dispatch(Message::AddToTeam(7));
    rt.dispatch(Message::SetImagePrompt("a water dragon".to_string()));
    rt.dispatch(Message::GenerateImage);
    rt.dispatch(Message::AnalyzeTeam);
    assert_eq!(rt.in_flight(), 2);

    rt.settle().await;
    assert_eq!(rt.in_flight(), 0);
    assert!(rt.next_completion().await.is_none());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

    let c = rt.controller();
    let image = c.creator().image.result().expect("image should be ready");
    assert_eq!(image.to_data_url(), "data:image/png;base64,AQID");
    let analysis = c.analysis().analysis.result().expect("analysis should be ready");
    assert!(analysis.contains("Bulbasaur (Types: Grass/Poison), Squirtle (Types: Water)"));
}

#[tokio::test]
async fn test_runtime_failures_stay_local() {
    let mut rt = Runtime::new(make_controller(), Arc::new(FakeBackend::failing()));

    rt.dispatch(Message::AddToTeam(25));
    rt.dispatch(Message::AddToTeam(94));
    rt.dispatch(Message::AnalyzeTeam);
    rt.dispatch(Message::OpenDetail(94));
    rt.dispatch(Message::SetQuestion("Is it a ghost?".to_string()));
    rt.dispatch(Message::AskOracle);
    rt.settle().await;

    let c = rt.controller();
    assert_eq!(c.analysis().analysis.error(), Some(ANALYSIS_FAILURE_MESSAGE));
    assert_eq!(c.detail().unwrap().answer.error(), Some(ORACLE_FAILURE_MESSAGE));
    assert_eq!(c.team().ids(), &[25, 94]);
    assert_eq!(c.visible().len(), 10);
}

/// Backend whose calls never return normally.
struct PanickingBackend;

#[async_trait]
impl GenerativeBackend for PanickingBackend {
    async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, OracleError> {
        panic!("image backend crashed");
    }

    async fn generate_text(&self, _prompt: &TextPrompt) -> Result<String, OracleError> {
        panic!("text backend crashed");
    }
}

#[tokio::test]
async fn test_runtime_settles_after_panicked_request() {
    let mut rt = Runtime::new(make_controller(), Arc::new(PanickingBackend));

    rt.dispatch(Message::AddToTeam(1));
    rt.dispatch(Message::AddToTeam(4));
    rt.dispatch(Message::AnalyzeTeam);
    rt.dispatch(Message::SetImagePrompt("a fire lizard".to_string()));
    rt.dispatch(Message::GenerateImage);
    assert_eq!(rt.in_flight(), 2);

    tokio::time::timeout(std::time::Duration::from_secs(5), rt.settle())
        .await
        .expect("settle should finish once the crashed calls are reported");
    assert_eq!(rt.in_flight(), 0);

    let c = rt.controller();
    assert_eq!(c.analysis().analysis.error(), Some(ANALYSIS_FAILURE_MESSAGE));
    assert_eq!(c.creator().image.error(), Some(IMAGE_FAILURE_MESSAGE));
}

#[test]
fn test_failed_request_completes_its_ticket() {
    let request = Request::AskOracle {
        ticket: Ticket(9),
        prompt: TextPrompt {
            contents: "q".to_string(),
            system_instruction: None,
        },
    };
    match request.failed(OracleError::Aborted("gone".to_string())) {
        Message::OracleAnswered { ticket, result } => {
            assert_eq!(ticket, Ticket(9));
            assert!(matches!(result, Err(OracleError::Aborted(_))));
        }
        other => panic!("expected an oracle completion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_source_from_file() {
    let pokedex = load_source(&DataSource::File(sample_path())).await.unwrap();
    assert_eq!(pokedex.len(), 10);

    let err = load_source(&DataSource::File(PathBuf::from("/missing/pokedex.json")))
        .await
        .unwrap_err();
    assert!(matches!(err, StartError::Load(_)));
    assert!(err.to_string().starts_with("failed to load Pokémon data"));
}

#[tokio::test]
async fn test_runtime_start_without_api_key() {
    neo_pokedex::logging::init("neo_pokedex=debug");
    let config = DexConfig {
        data_source: DataSource::File(sample_path()),
        ..DexConfig::default()
    };
    let rt = Runtime::start(&config).await.unwrap();
    assert_eq!(rt.controller().pokedex().len(), 10);
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = DexConfig::from_lookup(|_| None);
    assert_eq!(config, DexConfig::default());
    assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
    assert!(!config.has_api_key());
}

#[test]
fn test_config_from_lookup() {
    let config = DexConfig::from_lookup(|key| match key {
        "POKEDEX_DATA" => Some("https://example.com/pokedex.json".to_string()),
        "API_KEY" => Some("fallback-key".to_string()),
        "POKEDEX_TEXT_MODEL" => Some("gemini-test".to_string()),
        "POKEDEX_LOG" => Some("debug".to_string()),
        _ => None,
    });
    assert_eq!(
        config.data_source,
        DataSource::Url("https://example.com/pokedex.json".to_string())
    );
    assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
    assert_eq!(config.text_model, "gemini-test");
    assert_eq!(config.log_filter, "debug");

    let config = DexConfig::from_lookup(|key| match key {
        "POKEDEX_API_KEY" => Some("primary".to_string()),
        "API_KEY" => Some("fallback".to_string()),
        "POKEDEX_DATA" => Some("data/pokedex.json".to_string()),
        _ => None,
    });
    assert_eq!(config.api_key.as_deref(), Some("primary"));
    assert_eq!(
        config.data_source,
        DataSource::File(PathBuf::from("data/pokedex.json"))
    );
}

#[test]
fn test_blank_env_values_are_ignored() {
    let config = DexConfig::from_lookup(|key| match key {
        "POKEDEX_API_KEY" => Some("  ".to_string()),
        _ => None,
    });
    assert!(config.api_key.is_none());
}
