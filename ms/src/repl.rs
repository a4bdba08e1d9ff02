//! Interactive terminal front end
//!
//! Drives an [`App`] from a readline loop: plain lines are chat turns,
//! a bare number picks a suggestion, and slash commands cover everything else.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::app::{App, AppError};
use crate::conversation::{ConversationError, FilterGroup, TurnOutcome};
use crate::domain::{ChatRole, CreationMode, ExpertiseLevel, MenuProject, Recipe};
use crate::i18n::Text;
use crate::store::GenerationResult;

/// A parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Home,
    Retry,
    Refresh,
    Materialize,
    Filters,
    Toggle(String),
    Shuffle(String),
    Expertise(String),
    View(usize),
    Back,
    Modify(String),
    Regenerate(usize),
    Undo,
    Market,
    /// 1-based suggestion number
    Pick(usize),
    Say(String),
    Unknown(String),
    /// Command given without its argument
    Usage(&'static str),
}

/// Parse one trimmed, non-empty input line
pub fn parse_command(input: &str) -> ReplCommand {
    let input = input.trim();
    if !input.starts_with('/') {
        return match input.parse::<usize>() {
            Ok(n) if n > 0 => ReplCommand::Pick(n),
            _ => ReplCommand::Say(input.to_string()),
        };
    }

    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };
    let index = |usage: &'static str, make: fn(usize) -> ReplCommand| match arg.parse::<usize>() {
        Ok(n) if n > 0 => make(n - 1),
        _ => ReplCommand::Usage(usage),
    };
    let text = |usage: &'static str, make: fn(String) -> ReplCommand| {
        if arg.is_empty() {
            ReplCommand::Usage(usage)
        } else {
            make(arg.to_string())
        }
    };

    match cmd {
        "/help" | "/h" => ReplCommand::Help,
        "/quit" | "/q" | "/exit" => ReplCommand::Quit,
        "/home" => ReplCommand::Home,
        "/retry" => ReplCommand::Retry,
        "/refresh" => ReplCommand::Refresh,
        "/materialize" | "/m" => ReplCommand::Materialize,
        "/filters" => ReplCommand::Filters,
        "/toggle" => text("/toggle <option>", ReplCommand::Toggle),
        "/shuffle" => text("/shuffle <group>", ReplCommand::Shuffle),
        "/expertise" => text("/expertise <level>", ReplCommand::Expertise),
        "/view" => index("/view <course>", ReplCommand::View),
        "/back" => ReplCommand::Back,
        "/modify" => text("/modify <request>", ReplCommand::Modify),
        "/regen" => index("/regen <course>", ReplCommand::Regenerate),
        "/undo" => ReplCommand::Undo,
        "/market" => ReplCommand::Market,
        _ => ReplCommand::Unknown(cmd.to_string()),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Interactive REPL session
pub struct ReplSession {
    app: App,
    editor: DefaultEditor,
}

impl ReplSession {
    pub fn new(app: App) -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { app, editor })
    }

    /// Read one line; `None` on Ctrl+D
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(&line);
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    return Ok(None);
                }
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, mode: Option<CreationMode>) -> Result<()> {
        debug!(?mode, "ReplSession::run: called");
        let locale = self.app.locale();
        self.print_welcome();

        let mut mode = mode;
        'home: loop {
            let selected = match mode.take() {
                Some(m) => m,
                None => match self.choose_mode()? {
                    Some(m) => m,
                    None => break 'home,
                },
            };
            self.app.select_mode(selected).await;
            if !selected.is_generative() {
                println!("{} {}: {}", "!".yellow(), selected, locale.text(Text::ModeUnavailable));
                continue 'home;
            }
            if let Err(e) = self.app.start_conversation().await {
                self.report(e);
                continue 'home;
            }
            if let Some(engine) = self.app.engine() {
                debug!(session = %engine.session_id(), "run: chatting");
            }
            self.print_latest_message();

            loop {
                let Some(line) = self.read_line(&format!("{} ", ">".bright_green()))? else {
                    break 'home;
                };
                match parse_command(&line) {
                    ReplCommand::Quit => break 'home,
                    ReplCommand::Home => {
                        self.app.go_home().await;
                        continue 'home;
                    }
                    command => {
                        if let Flow::Quit = self.handle(command).await {
                            break 'home;
                        }
                    }
                }
            }
        }

        println!("{}", locale.text(Text::Goodbye));
        Ok(())
    }

    fn choose_mode(&mut self) -> Result<Option<CreationMode>> {
        let locale = self.app.locale();
        let names: Vec<String> = CreationMode::ALL.iter().map(|m| m.to_string()).collect();
        println!("{} {}", locale.text(Text::ChooseMode).bright_cyan(), names.join(", "));
        loop {
            let Some(line) = self.read_line(&format!("{} ", "mode>".bright_green()))? else {
                return Ok(None);
            };
            if matches!(parse_command(&line), ReplCommand::Quit) {
                return Ok(None);
            }
            match CreationMode::parse(&line) {
                Some(mode) => return Ok(Some(mode)),
                None => println!("{} {} {}", "?".yellow(), locale.text(Text::UnknownMode), line),
            }
        }
    }

    async fn handle(&mut self, command: ReplCommand) -> Flow {
        debug!(?command, "handle: called");
        let locale = self.app.locale();
        match command {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => return Flow::Quit,
            // Handled by the main loop
            ReplCommand::Home => {}
            ReplCommand::Say(text) => self.say(&text).await,
            ReplCommand::Pick(n) => match self.suggestion(n) {
                Some(text) => {
                    println!("{} {}", ">".bright_green(), text);
                    self.say(&text).await;
                }
                None => println!("{} {} {}", "?".yellow(), locale.text(Text::NoSuchSuggestion), n),
            },
            ReplCommand::Materialize => {
                println!("{}", locale.text(Text::Materializing).dimmed());
                match self.app.materialize().await {
                    Ok(_) => self.print_result().await,
                    Err(e) => self.report(e),
                }
            }
            ReplCommand::Retry => {
                println!("{}", locale.text(Text::Retrying).dimmed());
                match self.app.retry().await {
                    Ok(()) => self.print_result().await,
                    Err(e) => self.report(e),
                }
            }
            ReplCommand::Refresh => match self.app.engine_mut() {
                Some(engine) => match engine.refresh_questions().await {
                    Ok(true) => self.print_latest_suggestions(),
                    Ok(false) => println!("{}", locale.text(Text::NoNewQuestions).dimmed()),
                    Err(e) => self.report(e.into()),
                },
                None => self.no_conversation(),
            },
            ReplCommand::Filters => self.print_filters(),
            ReplCommand::Toggle(option) => match self.app.engine_mut() {
                Some(engine) => {
                    let on = engine.toggle_constraint(&option).await;
                    let label = engine.filters().label(&option);
                    let state = if on {
                        locale.text(Text::FilterOn).green()
                    } else {
                        locale.text(Text::FilterOff).dimmed()
                    };
                    println!("{} {}", label, state);
                }
                None => self.no_conversation(),
            },
            ReplCommand::Shuffle(group) => {
                let Some(group) = FilterGroup::parse(&group) else {
                    println!("{} {} {}", "?".yellow(), locale.text(Text::UnknownFilterGroup), group);
                    return Flow::Continue;
                };
                match self.app.engine_mut() {
                    Some(engine) => {
                        if engine.randomize_filters(group).await {
                            self.print_filters();
                        } else {
                            println!("{}", locale.text(Text::FiltersUnchanged).dimmed());
                        }
                    }
                    None => self.no_conversation(),
                }
            }
            ReplCommand::Expertise(level) => {
                let Some(level) = ExpertiseLevel::parse(&level) else {
                    println!("{} {} {}", "?".yellow(), locale.text(Text::UnknownExpertise), level);
                    return Flow::Continue;
                };
                match self.app.engine_mut() {
                    Some(engine) => {
                        engine.set_expertise(level);
                        println!("{} {}", locale.text(Text::Expertise), level.to_string().bright_cyan());
                    }
                    None => self.no_conversation(),
                }
            }
            ReplCommand::View(index) => match self.app.workspace_mut() {
                Some(ws) => match ws.view_course(index) {
                    Ok(recipe) => print_recipe(recipe),
                    Err(e) => self.report(e.into()),
                },
                None => self.no_menu(),
            },
            ReplCommand::Back => match self.app.workspace_mut() {
                Some(ws) => {
                    ws.back_to_menu();
                    print_menu(ws.menu());
                }
                None => self.no_menu(),
            },
            ReplCommand::Modify(request) => {
                println!("{}", locale.text(Text::UpdatingMenu).dimmed());
                match self.app.modify_menu(&request).await {
                    Ok(menu) => print_menu(menu),
                    Err(e) => self.report(e),
                }
            }
            ReplCommand::Regenerate(index) => {
                println!("{}", locale.text(Text::RegeneratingCourse).dimmed());
                match self.app.regenerate_course(index).await {
                    Ok(menu) => print_menu(menu),
                    Err(e) => self.report(e),
                }
            }
            ReplCommand::Undo => match self.app.undo().await {
                Ok(Some(menu)) => print_menu(menu),
                Ok(None) => println!("{}", locale.text(Text::NothingToUndo).dimmed()),
                Err(e) => self.report(e),
            },
            ReplCommand::Market => self.market().await,
            ReplCommand::Usage(usage) => println!("{} {}", locale.text(Text::Usage), usage.yellow()),
            ReplCommand::Unknown(cmd) => {
                println!("{} {} {}", "?".yellow(), locale.text(Text::UnknownCommand), cmd);
                println!("{} ({})", locale.text(Text::HelpHint), "/help".yellow());
            }
        }
        Flow::Continue
    }

    async fn say(&mut self, text: &str) {
        if self.app.engine().is_none() {
            self.no_conversation();
            return;
        }
        match self.app.send_message(text).await {
            Ok(TurnOutcome::Replied) => self.print_latest_message(),
            Ok(TurnOutcome::Materialized(_)) => self.print_result().await,
            Err(e) => self.report(e),
        }
    }

    async fn market(&mut self) {
        let locale = self.app.locale();
        println!("{}", locale.text(Text::AnalyzingCosts).dimmed());
        if let Some(ws) = self.app.workspace_mut() {
            match ws.analyze_market().await {
                Ok(report) => {
                    println!("{}", locale.text(Text::MenuCostReport).bright_cyan().bold());
                    println!("  {:18} {:.2}", locale.text(Text::CostPerGuest), report.overall_pour_cost);
                    println!("  {:18} {:.2}", locale.text(Text::PricePerGuest), report.recommended_price_per_pax);
                    println!("  {:18} {:.1}%", locale.text(Text::TargetMargin), report.target_margin);
                    for dish in &report.dishes_breakdown {
                        println!("  - {} ({:.2})", dish.dish_name, dish.pour_cost);
                    }
                    if !report.financial_narrative.is_empty() {
                        println!("{}", report.financial_narrative.dimmed());
                    }
                }
                Err(e) => self.report(e.into()),
            }
            return;
        }
        match self.app.analyze_dish_market().await {
            Ok(report) => {
                println!("{}", locale.text(Text::DishCostReport).bright_cyan().bold());
                println!("  {:18} {:.2}", locale.text(Text::PourCost), report.total_pour_cost);
                println!("  {:18} {:.2}", locale.text(Text::SuggestedPrice), report.suggested_menu_price);
                println!("  {:18} {:.1}%", locale.text(Text::Margin), report.profit_margin_percentage);
                for line in &report.cost_breakdown {
                    println!("  - {} {} ({:.2})", line.quantity_used, line.ingredient, line.calculated_cost);
                }
                if !report.marketing_hook.is_empty() {
                    println!("{}", report.marketing_hook.dimmed());
                }
            }
            Err(e) => self.report(e),
        }
    }

    /// Show the localized notice; the full error chain goes to the log
    fn report(&self, error: AppError) {
        warn!(?error, "Request failed");
        match &error {
            // The apology is already in the transcript
            AppError::Conversation(ConversationError::Turn(_) | ConversationError::Materialize(_))
                if self.app.engine().is_some() =>
            {
                self.print_latest_message()
            }
            _ => println!("{} {}", "x".red(), error.notice(self.app.locale())),
        }
    }

    async fn print_result(&self) {
        let store = self.app.store();
        let store = store.lock().await;
        match store.result() {
            Some(GenerationResult::SingleDish(recipe)) => print_recipe(recipe),
            Some(GenerationResult::Menu(menu)) => print_menu(menu),
            None => {
                if let Some(error) = store.error() {
                    println!("{} {}", "x".red(), error);
                }
            }
        }
    }

    fn suggestion(&self, n: usize) -> Option<String> {
        let engine = self.app.engine()?;
        let latest = engine.messages().iter().rev().find(|m| m.offers_suggestions())?;
        latest.suggestions.as_ref()?.get(n.checked_sub(1)?).cloned()
    }

    fn print_latest_message(&self) {
        let Some(message) = self.app.engine().and_then(|e| e.messages().last()) else {
            return;
        };
        if message.role == ChatRole::Model {
            println!();
            println!("{} {}", "Maestro:".bright_blue().bold(), message.content);
            self.print_latest_suggestions();
        }
    }

    fn print_latest_suggestions(&self) {
        let Some(engine) = self.app.engine() else {
            return;
        };
        if let Some(suggestions) = engine.messages().last().and_then(|m| m.suggestions.as_ref()) {
            for (i, s) in suggestions.iter().enumerate() {
                println!("  {} {}", format!("[{}]", i + 1).yellow(), s);
            }
        }
        println!();
    }

    fn print_filters(&self) {
        let Some(engine) = self.app.engine() else {
            self.no_conversation();
            return;
        };
        let filters = engine.filters();
        for group in FilterGroup::ALL {
            println!("{}", group.to_string().bright_cyan());
            for option in filters.options(group) {
                let mark = if filters.is_selected(option) { "x" } else { " " };
                println!("  [{}] {} {}", mark.green(), filters.label(option), option.dimmed());
            }
        }
    }

    fn no_conversation(&self) {
        println!("{} {}", "!".yellow(), self.app.locale().text(Text::NoConversation));
    }

    fn no_menu(&self) {
        println!("{} {}", "!".yellow(), self.app.locale().text(Text::NoMenu));
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Maestro".bright_cyan().bold());
        println!("{}", self.app.locale().text(Text::WelcomeHint));
        println!();
    }

    fn print_help(&self) {
        println!();
        for (title, rows) in self.app.locale().help_sections() {
            println!("{}", title.bright_cyan());
            for (command, description) in *rows {
                println!("  {:18} {}", command.yellow(), description);
            }
            println!();
        }
    }
}

fn print_recipe(recipe: &Recipe) {
    let meta = &recipe.meta;
    println!();
    println!("{}", meta.dish_name.bright_cyan().bold());
    if !meta.concept_summary.is_empty() {
        println!("{}", meta.concept_summary.italic());
    }
    println!(
        "{} min · {} · {}",
        meta.preparation_time_minutes, meta.difficulty_level, meta.abv_estimate
    );
    println!();
    for ingredient in &recipe.synthesis.ingredients {
        match &ingredient.notes {
            Some(notes) => println!("  - {} {} ({})", ingredient.quantity, ingredient.name, notes.dimmed()),
            None => println!("  - {} {}", ingredient.quantity, ingredient.name),
        }
    }
    println!();
    for step in &recipe.synthesis.steps {
        println!("  {}. {}", step.step_number, step.instruction);
        if let Some(note) = &step.technical_note {
            println!("     {}", note.dimmed());
        }
    }
    println!();
}

fn print_menu(menu: &MenuProject) {
    println!();
    println!("{}", menu.concept.title.bright_cyan().bold());
    if !menu.concept.description.is_empty() {
        println!("{}", menu.concept.description.italic());
    }
    for (i, course) in menu.courses.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).yellow(), course.name());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(parse_command("  more citrus "), ReplCommand::Say("more citrus".to_string()));
    }

    #[test]
    fn test_number_picks_suggestion() {
        assert_eq!(parse_command("2"), ReplCommand::Pick(2));
        assert_eq!(parse_command("0"), ReplCommand::Say("0".to_string()));
    }

    #[test]
    fn test_course_numbers_are_one_based() {
        assert_eq!(parse_command("/view 1"), ReplCommand::View(0));
        assert_eq!(parse_command("/regen 3"), ReplCommand::Regenerate(2));
        assert_eq!(parse_command("/regen 0"), ReplCommand::Usage("/regen <course>"));
        assert_eq!(parse_command("/view x"), ReplCommand::Usage("/view <course>"));
    }

    #[test]
    fn test_text_arguments() {
        assert_eq!(
            parse_command("/modify  make it vegan "),
            ReplCommand::Modify("make it vegan".to_string())
        );
        assert_eq!(parse_command("/toggle"), ReplCommand::Usage("/toggle <option>"));
        assert_eq!(parse_command("/shuffle mood"), ReplCommand::Shuffle("mood".to_string()));
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(parse_command("/q"), ReplCommand::Quit);
        assert_eq!(parse_command("/m"), ReplCommand::Materialize);
        assert_eq!(parse_command("/nope"), ReplCommand::Unknown("/nope".to_string()));
    }
}
