use colored::Colorize;

use epiclog::theme::ThemeRegistry;

pub fn print_banner() {
    let banner = "\
╔════════════════════════════════════════════════════════════╗
║  ⚔️  EPIC CHANGELOG (Powered by AI) ⚔️                       ║
║  Transforming mundane updates into legendary tales...      ║
╚════════════════════════════════════════════════════════════╝";
    println!("{}\n", banner.yellow());
}

/// Default and custom themes, each group sorted by name.
pub fn print_available_themes(registry: &ThemeRegistry) {
    println!("{}", "🎭 Available Themes:".cyan());

    if registry.is_empty() {
        println!(
            "  No themes found. Create one with --create-theme NAME or add one with --add-theme PATH."
        );
        return;
    }

    let by_source = registry.list_by_source();
    for (heading, names) in [
        ("📦 Default Themes:", &by_source.default),
        ("🎨 Custom Themes:", &by_source.custom),
    ] {
        if names.is_empty() {
            continue;
        }

        println!("\n  {}", heading.green());
        for name in names {
            let Some(theme) = registry.get(name) else {
                continue;
            };
            println!(
                "    {} {}: {}",
                theme.emoji_or_fallback(),
                theme.name.yellow(),
                theme.description.as_deref().unwrap_or(theme.label())
            );
        }
    }
    println!();
}

/// Short list used when the requested theme is unknown.
pub fn print_theme_names(registry: &ThemeRegistry) {
    for theme in registry.iter() {
        println!("  {} {}", theme.emoji_or_fallback(), theme.name);
    }
}
