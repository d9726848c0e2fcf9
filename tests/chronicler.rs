use std::fs;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use epiclog::ErrorCategory;
use epiclog::chronicle::{Chronicle, Chronicler, save_chronicles};
use epiclog::llm::{GenerationRequest, LlmClient};
use epiclog::theme::{ThemeDirs, ThemeRegistry, bundled};
use tempfile::TempDir;

/// Returns canned replies and records every request it receives.
struct StubClient {
    reply: Result<String, String>,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl StubClient {
    fn replying(text: &str) -> Self {
        StubClient {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        StubClient {
            reply: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl LlmClient for StubClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow!("{msg}")),
        }
    }
}

fn bundled_registry() -> (TempDir, ThemeRegistry) {
    let tmp = TempDir::new().unwrap();
    let dirs = ThemeDirs::under(tmp.path());
    bundled::seed_defaults(&dirs.default_dir).unwrap();
    let registry = ThemeRegistry::load(dirs);
    (tmp, registry)
}

#[test]
fn transform_builds_request_and_decorates_reply() {
    let (_tmp, registry) = bundled_registry();
    let client = StubClient::replying("  The login dragon has been vanquished!  ");
    let chronicler = Chronicler::new(&registry, &client);

    let epic = chronicler
        .transform("Fixed minor bug in login form", 7, "MEDIEVAL")
        .unwrap();

    assert_eq!(epic, "⚔️ The login dragon has been vanquished!");

    let seen = client.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert!(request.system_instructions.contains("epic fantasy adventure"));
    assert!(request.system_instructions.contains("vanquished"));
    assert!(request.system_instructions.contains("dragon"));
    assert!(request.user_content.contains("Fixed minor bug in login form"));
    assert_eq!(request.max_output_tokens, 170);
    assert_eq!(request.temperature, 0.85);
}

#[test]
fn already_decorated_reply_is_only_trimmed() {
    let (_tmp, registry) = bundled_registry();
    let client = StubClient::replying("\n🚀 Hyperdrive engaged on the login nebula\n");
    let chronicler = Chronicler::new(&registry, &client);

    let epic = chronicler.transform("Fixed login", 3, "space").unwrap();
    assert_eq!(epic, "🚀 Hyperdrive engaged on the login nebula");
}

#[test]
fn unknown_theme_is_not_found_and_backend_is_not_called() {
    let (_tmp, registry) = bundled_registry();
    let client = StubClient::replying("unused");
    let chronicler = Chronicler::new(&registry, &client);

    let err = chronicler.transform("Fixed login", 5, "pirate").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(client.seen.lock().unwrap().is_empty());
}

#[test]
fn backend_failure_is_wrapped_with_fixed_prefix() {
    let (_tmp, registry) = bundled_registry();
    let client = StubClient::failing("Gemini API error: HTTP 429 - quota exceeded");
    let chronicler = Chronicler::new(&registry, &client);

    let err = chronicler.transform("Fixed login", 5, "space").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Backend);
    assert_eq!(
        err.to_string(),
        "⚠️ Failed to summon the epic transformation: Gemini API error: HTTP 429 - quota exceeded"
    );
}

#[test]
fn blank_reply_is_a_backend_error() {
    let (_tmp, registry) = bundled_registry();
    let client = StubClient::replying("   \n");
    let chronicler = Chronicler::new(&registry, &client);

    let err = chronicler.transform("Fixed login", 5, "space").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Backend);
}

#[test]
fn process_file_transforms_each_non_blank_line() {
    let (tmp, registry) = bundled_registry();
    let client = StubClient::replying("Bolt from Olympus");
    let chronicler = Chronicler::new(&registry, &client);

    let changelog = tmp.path().join("CHANGES.txt");
    fs::write(&changelog, "Added dark mode\n\n   \n  Removed legacy API  \n").unwrap();

    let chronicles = chronicler
        .process_file(&changelog, 9, "mythology")
        .unwrap();

    assert_eq!(
        chronicles,
        vec![
            Chronicle {
                original: "Added dark mode".into(),
                epic: "⚡ Bolt from Olympus".into(),
            },
            Chronicle {
                original: "Removed legacy API".into(),
                epic: "⚡ Bolt from Olympus".into(),
            },
        ]
    );
    assert_eq!(client.seen.lock().unwrap().len(), 2);
}

#[test]
fn process_file_records_per_line_failures() {
    let (tmp, registry) = bundled_registry();
    let client = StubClient::failing("connection reset");
    let chronicler = Chronicler::new(&registry, &client);

    let changelog = tmp.path().join("CHANGES.txt");
    fs::write(&changelog, "one\ntwo\n").unwrap();

    let chronicles = chronicler.process_file(&changelog, 5, "space").unwrap();
    assert_eq!(chronicles.len(), 2);
    for chronicle in &chronicles {
        assert!(chronicle.epic.contains("Failed to summon"));
        assert!(chronicle.epic.contains("connection reset"));
    }
}

#[test]
fn process_missing_file_is_an_error() {
    let (tmp, registry) = bundled_registry();
    let client = StubClient::replying("unused");
    let chronicler = Chronicler::new(&registry, &client);

    assert!(
        chronicler
            .process_file(&tmp.path().join("nope.txt"), 5, "space")
            .is_err()
    );
}

#[test]
fn saved_chronicles_have_header_and_entries() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("epic.md");
    let chronicles = [Chronicle {
        original: "Fixed login".into(),
        epic: "⚔️ The gate holds".into(),
    }];

    save_chronicles(&out, "medieval", 7, &chronicles).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# Epic Changelog Transformations\n\n"));
    assert!(written.contains("Theme: medieval | Drama Level: 7"));
    assert!(written.contains("Original: Fixed login\nEpic: ⚔️ The gate holds\n"));
}

#[test]
fn saving_into_missing_directory_is_a_persistence_error() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("no").join("such").join("dir.md");

    let err = save_chronicles(&out, "space", 1, &[]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Persistence);
}
