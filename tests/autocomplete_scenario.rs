use sentence_autocomplete::{
    request_log::separator, AutocompleteError, Autocompleter, GenerationConfig, GenerationService, RequestLogger,
    Result,
};
use std::cell::RefCell;
use std::fs;

/// Returns fixed candidates and remembers what it was asked for.
struct MockService {
    outputs: Vec<String>,
    calls: RefCell<Vec<(String, GenerationConfig)>>,
}

impl GenerationService for MockService {
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<Vec<String>> {
        self.calls.borrow_mut().push((prompt.to_string(), config.clone()));
        Ok(self.outputs.clone())
    }
}

struct BrokenService;

impl GenerationService for BrokenService {
    fn generate(&self, _prompt: &str, _config: &GenerationConfig) -> Result<Vec<String>> {
        Err(AutocompleteError::Generation("CUDA out of memory".into()))
    }
}

fn messages(contents: &str) -> Vec<&str> {
    contents.lines().map(|line| line.splitn(3, " | ").nth(2).unwrap()).collect()
}

#[test]
fn store_prompt_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("autocomplete.log");

    let config = GenerationConfig {
        top_k: 50,
        temperature: 0.7,
        max_new_tokens: 30,
        num_outputs: 3,
        ..Default::default()
    };
    let service = MockService {
        outputs: vec![
            "I went to the store and bought milk. Then I left.".to_string(),
            "I went to the store and it was closed".to_string(),
            "I went to the store and saw my friend. We talked for a while.".to_string(),
        ],
        calls: RefCell::new(Vec::new()),
    };

    let logger = RequestLogger::open(&log_path).unwrap();
    let mut completer = Autocompleter::new(config.clone(), service, logger).unwrap();
    let suggestions = completer.complete("I went to the store and").unwrap();

    assert_eq!(
        suggestions,
        vec![
            "I went to the store and bought milk.",
            "I went to the store and it was closed",
            "I went to the store and saw my friend.",
        ]
    );

    let contents = fs::read_to_string(&log_path).unwrap();
    assert!(contents.lines().all(|line| line.splitn(3, " | ").nth(1) == Some("INFO")));
    assert_eq!(
        messages(&contents),
        vec![
            format!("Logger initialized. Writing logs to {}", log_path.display()),
            separator(),
            "MODEL_NAME: EleutherAI/gpt-neo-125M".to_string(),
            "PROMPT: I went to the store and".to_string(),
            "GEN_PARAMS | top_k=50, temperature=0.7, max_new_tokens=30, num_outputs=3".to_string(),
            "OUTPUT_1: I went to the store and bought milk.".to_string(),
            "OUTPUT_2: I went to the store and it was closed".to_string(),
            "OUTPUT_3: I went to the store and saw my friend.".to_string(),
        ]
    );
}

#[test]
fn service_is_called_once_with_the_full_config() {
    let service = MockService { outputs: vec!["a. b".to_string()], calls: RefCell::new(Vec::new()) };
    let config = GenerationConfig { num_outputs: 1, top_k: 7, ..Default::default() };
    let suggestions =
        sentence_autocomplete::autocomplete("a", &config, &service, &mut RequestLogger::from_writer(Vec::new()))
            .unwrap();

    assert_eq!(suggestions, vec!["a."]);
    let calls = service.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], ("a".to_string(), config));
}

#[test]
fn generation_failure_reaches_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("autocomplete.log");

    let logger = RequestLogger::open(&log_path).unwrap();
    let mut completer = Autocompleter::new(GenerationConfig::default(), BrokenService, logger).unwrap();
    let err = completer.complete("Once upon a time").unwrap_err();
    assert!(matches!(err, AutocompleteError::Generation(ref msg) if msg.contains("out of memory")));

    let contents = fs::read_to_string(&log_path).unwrap();
    let logged = messages(&contents);
    assert!(logged.contains(&"PROMPT: Once upon a time"));
    assert!(logged.iter().all(|m| !m.starts_with("OUTPUT_")));
}
