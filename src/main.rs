mod display;

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use crossterm::tty::IsTty;
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::time::Duration;

use epiclog::chronicle::{Chronicle, Chronicler, save_chronicles};
use epiclog::cli_args::Cli;
use epiclog::config::Config;
use epiclog::logging::init_logger;
use epiclog::setup::build_llm_client;
use epiclog::theme::{ThemeDirs, ThemeRegistry, bundled};

const EXAMPLE_ENTRY: &str = "Fixed minor bug in login form";

/// Ask the user a question and return a trimmed input line; `None` on EOF.
fn prompt_input(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

/// Run `f` behind a spinner when stderr is a terminal.
fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    if !io::stderr().is_tty() {
        return f();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// The requested theme, else the configured default, else the first one loaded.
fn resolve_theme(registry: &ThemeRegistry, requested: &str, fallback: &str) -> Result<String> {
    if let Some(theme) = registry.get(requested) {
        return Ok(theme.name.clone());
    }

    let Some(first) = registry.iter().next() else {
        bail!(
            "no themes available in {} or {}; create one with --create-theme NAME",
            registry.dirs().default_dir.display(),
            registry.dirs().custom_dir.display()
        );
    };

    println!(
        "{}",
        format!("⚠️ Theme '{requested}' not found. Available themes:").yellow()
    );
    display::print_theme_names(registry);

    let name = registry
        .get(fallback)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| first.name.clone());
    println!("{}", format!("Using theme '{name}'").cyan());
    Ok(name)
}

/// Interactive mode: transform entries until an empty line or EOF.
fn run_interactive(chronicler: &Chronicler, level: u8, theme: &str) -> Result<Vec<Chronicle>> {
    println!("{}", "🎭 Interactive Epic Changelog Mode".cyan());
    println!("Theme: {theme} | Drama Level: {level}");
    println!("Enter changelog entries (empty line to finish):\n");

    let mut chronicles = Vec::new();
    while let Some(entry) = prompt_input(&format!("{} ", ">".green()))? {
        if entry.is_empty() {
            break;
        }

        let epic = match with_spinner("Summoning...", || chronicler.transform(&entry, level, theme)) {
            Ok(epic) => epic,
            Err(e) => {
                log::warn!("{} failure for {entry:?}", e.category());
                e.to_string()
            }
        };
        println!("{} {epic}\n", "Epic:".blue());
        chronicles.push(Chronicle {
            original: entry,
            epic,
        });
    }

    Ok(chronicles)
}

fn run_single(chronicler: &Chronicler, text: &str, level: u8, theme: &str) -> Result<Chronicle> {
    let epic = with_spinner("Summoning...", || chronicler.transform(text, level, theme))?;
    println!("{} {text}", "Original:".green());
    println!("{} {epic}", "Epic:".blue());
    Ok(Chronicle {
        original: text.to_string(),
        epic,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli)?;

    if !cli.no_banner {
        display::print_banner();
    }

    let dirs = ThemeDirs::under(&cfg.themes_root);
    if let Err(e) = bundled::seed_defaults(&dirs.default_dir) {
        log::warn!("Could not install default themes: {e}");
    }
    let mut registry = ThemeRegistry::load(dirs);

    // Theme management commands
    if cli.list_themes {
        display::print_available_themes(&registry);
        return Ok(());
    }

    if let Some(name) = &cli.create_theme {
        let path = registry.create_template(name)?;
        println!(
            "{}",
            format!("✅ Custom theme template created: {}", path.display()).green()
        );
        println!("{}", "📝 Edit the template, then use it with --theme".cyan());
        return Ok(());
    }

    if let Some(path) = &cli.add_theme {
        let persist = !cli.session_only;
        let theme = registry.add(path, persist)?;
        let scope = if persist { "permanently" } else { "for this session" };
        println!(
            "{}",
            format!("✅ Custom theme '{}' added {scope}!", theme.name).green()
        );
        return Ok(());
    }

    let requested = cli.theme.as_deref().unwrap_or(&cfg.default_theme);
    let theme = resolve_theme(&registry, requested, &cfg.default_theme)?;
    let level = cfg.drama_level;

    let client = build_llm_client(&cfg)?;
    let chronicler = Chronicler::new(&registry, client.as_ref());

    let chronicles = if cli.interactive {
        run_interactive(&chronicler, level, &theme)?
    } else if let Some(input_file) = &cli.input_file {
        println!(
            "{}",
            format!("📜 Processing sacred scroll: {}", input_file.display()).cyan()
        );
        let chronicles = with_spinner("Summoning...", || {
            chronicler.process_file(input_file, level, &theme)
        })?;
        for chronicle in &chronicles {
            println!("{chronicle}");
        }
        chronicles
    } else if let Some(text) = &cli.text {
        vec![run_single(&chronicler, text, level, &theme)?]
    } else {
        println!("{}", "🎭 Example Transformation:".cyan());
        let chronicle = run_single(&chronicler, EXAMPLE_ENTRY, level, &theme)?;
        println!(
            "\n{}",
            "Use --help to see all options, or provide text to transform!".yellow()
        );
        vec![chronicle]
    };

    if let Some(output) = &cli.output {
        if !chronicles.is_empty() {
            save_chronicles(output, &theme, level, &chronicles)?;
            println!(
                "{}",
                format!("✨ Epic transformations saved to: {}", output.display()).green()
            );
        }
    }

    Ok(())
}
