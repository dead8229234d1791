//! promptdeck driver: loads the category table and replays scripted controller
//! input through the menu, printing what the transformation connection receives.

mod connection;
mod script;

use anyhow::{Context, Result};
use promptdeck::config::AppConfig;
use promptdeck::session::format_session_stats;
use promptdeck::{
    init_logging, init_tracing, log_debug, log_file_path, log_panic, MenuStateMachine,
    OptionRegistry, PromptSession,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::panic;

use crate::connection::PrintingConnection;
use crate::script::{read_script, replay, ScriptInput, ScriptKeyboard};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    let trace = init_tracing(&config);
    install_panic_hook();
    log_debug("=== promptdeck started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));
    if let Some(sink) = trace {
        log_debug(&format!("Trace sink: {sink:?}"));
    }

    let registry = config.load_registry()?;
    log_debug(&format!("loaded {} categories", registry.len()));

    if config.list_categories {
        print!("{}", format_categories(&registry));
        return Ok(());
    }

    let Some(script_path) = config.script.as_deref() else {
        let menu = MenuStateMachine::new(registry, config.nav_tuning())?;
        print!("{}", format_view(&menu)?);
        return Ok(());
    };

    let frames = if config.reads_script_from_stdin() {
        read_script(io::stdin().lock())?
    } else {
        let file = File::open(script_path)
            .with_context(|| format!("failed to open script '{script_path}'"))?;
        read_script(BufReader::new(file))?
    };
    log_debug(&format!("replaying {} frames", frames.len()));

    let menu = MenuStateMachine::new(registry, config.nav_tuning())?;
    let connection = PrintingConnection::new(io::stdout().lock(), config.json_ipc);
    let mut session = PromptSession::new(
        menu,
        ScriptInput::default(),
        connection,
        ScriptKeyboard::default(),
        Some(config.initial_mode),
    );
    let last = replay(&mut session, &frames)?;
    tracing::info!(frames = frames.len(), last_tick = last, "script finished");

    let stats_output = format_session_stats(session.stats());
    if !stats_output.is_empty() {
        eprintln!("{stats_output}");
    }
    log_debug("=== promptdeck exiting ===");
    Ok(())
}

fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        log_panic(info);
        previous(info);
    }));
}

fn format_categories(registry: &OptionRegistry) -> String {
    let mut out = String::new();
    for category in registry.categories() {
        out.push_str(&format!(
            "{} ({}, {})\n",
            category.title,
            category.id,
            category.mode.label()
        ));
        for (idx, option) in category.options.iter().enumerate() {
            match option.years {
                Some([start, end]) => out.push_str(&format!(
                    "  {:>2}. {} ({start}-{end})\n",
                    idx + 1,
                    option.name
                )),
                None => out.push_str(&format!("  {:>2}. {}\n", idx + 1, option.name)),
            }
        }
    }
    out
}

fn format_view(menu: &MenuStateMachine) -> Result<String> {
    let view = menu.view()?;
    let mut out = String::new();
    out.push_str(&view.title);
    out.push('\n');
    for (idx, entry) in view.entries.iter().enumerate() {
        let marker = if idx == view.highlighted { '>' } else { ' ' };
        out.push_str(&format!("{marker} {}\n", entry.name));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdeck::navigator::NavTuning;
    use promptdeck::registry::builtin_categories;

    fn builtin_registry() -> OptionRegistry {
        OptionRegistry::new(builtin_categories().unwrap()).unwrap()
    }

    #[test]
    fn category_listing_shows_titles_and_modes() {
        let text = format_categories(&builtin_registry());
        assert!(text.contains("Time Travel (time_travel, scene)"));
        assert!(text.contains("   1. 1800s Colonial Era (1800-1850)"));
        assert!(text.contains("   1. Business Suit\n"));
    }

    #[test]
    fn root_view_marks_first_category() {
        let menu = MenuStateMachine::new(builtin_registry(), NavTuning::default()).unwrap();
        let text = format_view(&menu).unwrap();
        assert!(text.starts_with("Main Menu\n> Time Travel\n"));
    }
}
