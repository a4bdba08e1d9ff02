//! Locale-parametric user-facing text
//!
//! Every sentence the orchestration layer shows to a person goes through
//! [`Locale::text`]; nothing else in the crate hard-codes a language.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generation::SessionMode;

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    It,
    En,
}

/// Keys for every localized sentence the core emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    /// Seeded model message at the start of a chat session
    ChatWelcome,
    /// Shown when a chat turn fails at the service
    ChatError,
    /// Shown when the conversation could not be summarized
    HandoffError,
    /// Store-level error after a failed generation
    GenerationError,
    /// Menu modification failed; menu left unchanged
    ModificationFailed,
    /// Course regeneration failed; menu left unchanged
    RegenerationFailed,
    /// Cost report could not be produced
    MarketAnalysisFailed,
    /// A request is already running
    Busy,
    /// The chat session could not be opened
    SessionStartFailed,
    NothingToMaterialize,
    /// The conversation already produced its request
    ConversationClosed,
    EmptyMessage,
    NoMode,
    ModeUnavailable,
    NoConversation,
    NoMenu,
    NoDish,
    NothingToRetry,
    NoSuchCourse,
    /// An answer arrived after the user moved on
    ResultDiscarded,

    // Front-end status lines
    WelcomeHint,
    ChooseMode,
    UnknownMode,
    UnknownCommand,
    HelpHint,
    Usage,
    Goodbye,
    NoSuchSuggestion,
    Materializing,
    Retrying,
    UpdatingMenu,
    RegeneratingCourse,
    AnalyzingCosts,
    NoNewQuestions,
    FiltersUnchanged,
    UnknownFilterGroup,
    UnknownExpertise,
    Expertise,
    FilterOn,
    FilterOff,
    NothingToUndo,
    MenuCostReport,
    DishCostReport,
    CostPerGuest,
    PricePerGuest,
    TargetMargin,
    PourCost,
    SuggestedPrice,
    Margin,
}

impl Text {
    /// Every key, for completeness checks
    pub const ALL: [Text; 49] = [
        Self::ChatWelcome,
        Self::ChatError,
        Self::HandoffError,
        Self::GenerationError,
        Self::ModificationFailed,
        Self::RegenerationFailed,
        Self::MarketAnalysisFailed,
        Self::Busy,
        Self::SessionStartFailed,
        Self::NothingToMaterialize,
        Self::ConversationClosed,
        Self::EmptyMessage,
        Self::NoMode,
        Self::ModeUnavailable,
        Self::NoConversation,
        Self::NoMenu,
        Self::NoDish,
        Self::NothingToRetry,
        Self::NoSuchCourse,
        Self::ResultDiscarded,
        Self::WelcomeHint,
        Self::ChooseMode,
        Self::UnknownMode,
        Self::UnknownCommand,
        Self::HelpHint,
        Self::Usage,
        Self::Goodbye,
        Self::NoSuchSuggestion,
        Self::Materializing,
        Self::Retrying,
        Self::UpdatingMenu,
        Self::RegeneratingCourse,
        Self::AnalyzingCosts,
        Self::NoNewQuestions,
        Self::FiltersUnchanged,
        Self::UnknownFilterGroup,
        Self::UnknownExpertise,
        Self::Expertise,
        Self::FilterOn,
        Self::FilterOff,
        Self::NothingToUndo,
        Self::MenuCostReport,
        Self::DishCostReport,
        Self::CostPerGuest,
        Self::PricePerGuest,
        Self::TargetMargin,
        Self::PourCost,
        Self::SuggestedPrice,
        Self::Margin,
    ];
}

impl Locale {
    /// Parse a locale code such as "it", "EN" or "en-US"
    pub fn from_code(code: &str) -> Option<Self> {
        debug!(%code, "Locale::from_code: called");
        let lower = code.trim().to_lowercase();
        match lower.split(['-', '_']).next() {
            Some("it") => Some(Self::It),
            Some("en") => Some(Self::En),
            _ => None,
        }
    }

    /// Language name handed to the generation service
    pub fn language_name(self) -> &'static str {
        match self {
            Self::It => "Italian",
            Self::En => "English",
        }
    }

    /// Look up a localized sentence
    pub fn text(self, key: Text) -> &'static str {
        debug!(?self, ?key, "Locale::text: called");
        match (self, key) {
            (Self::It, Text::ChatWelcome) => {
                "Benvenuto. Sono il Maestro Superiore. Definiamo il piatto insieme. Quale ingrediente o emozione vogliamo esplorare?"
            }
            (Self::En, Text::ChatWelcome) => {
                "Welcome. I am Maestro Superiore. Let us define the dish together. What ingredient or emotion shall we explore?"
            }
            (Self::It, Text::ChatError) => "La connessione è debole. Riprova.",
            (Self::En, Text::ChatError) => "The connection is faint. Please try again.",
            (Self::It, Text::HandoffError) => {
                "Ho difficoltà a bilanciare la ricetta. Possiamo riassumere gli ingredienti principali?"
            }
            (Self::En, Text::HandoffError) => {
                "I am having trouble balancing the recipe. Could we summarize the main ingredients?"
            }
            (Self::It, Text::GenerationError) => {
                "Il Consiglio dei Saggi non ha raggiunto un consenso. Per favore affina la tua richiesta."
            }
            (Self::En, Text::GenerationError) => {
                "The Council of Sages could not reach a consensus. Please refine your request."
            }
            (Self::It, Text::ModificationFailed) => "Non sono riuscito ad applicare la modifica. Il menu è invariato.",
            (Self::En, Text::ModificationFailed) => "The change could not be applied. The menu is unchanged.",
            (Self::It, Text::RegenerationFailed) => "Non sono riuscito a rigenerare il piatto. Il menu è invariato.",
            (Self::En, Text::RegenerationFailed) => "The course could not be regenerated. The menu is unchanged.",
            (Self::It, Text::MarketAnalysisFailed) => "Analisi dei costi non disponibile al momento. Riprova.",
            (Self::En, Text::MarketAnalysisFailed) => "Cost analysis is unavailable right now. Please try again.",
            (Self::It, Text::Busy) => "Il Maestro sta ancora lavorando. Attendi la risposta.",
            (Self::En, Text::Busy) => "The Maestro is still working. Please wait for the reply.",
            (Self::It, Text::SessionStartFailed) => "Non riesco ad aprire la conversazione. Riprova tra poco.",
            (Self::En, Text::SessionStartFailed) => "The conversation could not be opened. Please try again shortly.",
            (Self::It, Text::NothingToMaterialize) => "Raccontami prima qualcosa del piatto che desideri.",
            (Self::En, Text::NothingToMaterialize) => "Tell me something about the dish you want first.",
            (Self::It, Text::ConversationClosed) => "Questa conversazione è conclusa. Usa /home per ricominciare.",
            (Self::En, Text::ConversationClosed) => "This conversation is finished. Use /home to start again.",
            (Self::It, Text::EmptyMessage) => "Il messaggio è vuoto.",
            (Self::En, Text::EmptyMessage) => "The message is empty.",
            (Self::It, Text::NoMode) => "Scegli prima una modalità.",
            (Self::En, Text::NoMode) => "Choose a mode first.",
            (Self::It, Text::ModeUnavailable) => "Questa modalità non è disponibile qui.",
            (Self::En, Text::ModeUnavailable) => "This mode is not available here.",
            (Self::It, Text::NoConversation) => "Nessuna conversazione in corso. Usa /retry o /home.",
            (Self::En, Text::NoConversation) => "No conversation in progress. Use /retry or /home.",
            (Self::It, Text::NoMenu) => "Non c'è ancora un menu su cui lavorare.",
            (Self::En, Text::NoMenu) => "No menu to work on yet.",
            (Self::It, Text::NoDish) => "Non c'è ancora un piatto da analizzare.",
            (Self::En, Text::NoDish) => "No dish to analyze yet.",
            (Self::It, Text::NothingToRetry) => "Non c'è una richiesta da ripetere.",
            (Self::En, Text::NothingToRetry) => "There is no request to retry.",
            (Self::It, Text::NoSuchCourse) => "Questa portata non esiste.",
            (Self::En, Text::NoSuchCourse) => "That course does not exist.",
            (Self::It, Text::ResultDiscarded) => "La risposta è arrivata troppo tardi ed è stata scartata.",
            (Self::En, Text::ResultDiscarded) => "The answer arrived too late and was discarded.",
            (Self::It, Text::WelcomeHint) => "Scrivi /help per l'aiuto, /quit per uscire",
            (Self::En, Text::WelcomeHint) => "Type /help for help, /quit to quit",
            (Self::It, Text::ChooseMode) => "Scegli una modalità:",
            (Self::En, Text::ChooseMode) => "Choose a mode:",
            (Self::It, Text::UnknownMode) => "Modalità sconosciuta:",
            (Self::En, Text::UnknownMode) => "Unknown mode:",
            (Self::It, Text::UnknownCommand) => "Comando sconosciuto:",
            (Self::En, Text::UnknownCommand) => "Unknown command:",
            (Self::It, Text::HelpHint) => "Scrivi /help per i comandi disponibili",
            (Self::En, Text::HelpHint) => "Type /help for available commands",
            (Self::It, Text::Usage) => "Uso:",
            (Self::En, Text::Usage) => "Usage:",
            (Self::It, Text::Goodbye) => "Arrivederci!",
            (Self::En, Text::Goodbye) => "Goodbye!",
            (Self::It, Text::NoSuchSuggestion) => "Nessun suggerimento numero",
            (Self::En, Text::NoSuchSuggestion) => "No suggestion number",
            (Self::It, Text::Materializing) => "Il Consiglio dei Saggi è al lavoro...",
            (Self::En, Text::Materializing) => "The Council of Sages is at work...",
            (Self::It, Text::Retrying) => "Riprovo...",
            (Self::En, Text::Retrying) => "Retrying...",
            (Self::It, Text::UpdatingMenu) => "Aggiorno il menu...",
            (Self::En, Text::UpdatingMenu) => "Updating the menu...",
            (Self::It, Text::RegeneratingCourse) => "Rigenero la portata...",
            (Self::En, Text::RegeneratingCourse) => "Regenerating the course...",
            (Self::It, Text::AnalyzingCosts) => "Analizzo i costi...",
            (Self::En, Text::AnalyzingCosts) => "Analyzing costs...",
            (Self::It, Text::NoNewQuestions) => "Nessuna nuova domanda.",
            (Self::En, Text::NoNewQuestions) => "No new questions.",
            (Self::It, Text::FiltersUnchanged) => "Filtri invariati.",
            (Self::En, Text::FiltersUnchanged) => "Filters unchanged.",
            (Self::It, Text::UnknownFilterGroup) => "Gruppo di filtri sconosciuto:",
            (Self::En, Text::UnknownFilterGroup) => "Unknown filter group:",
            (Self::It, Text::UnknownExpertise) => "Livello di esperienza sconosciuto:",
            (Self::En, Text::UnknownExpertise) => "Unknown expertise level:",
            (Self::It, Text::Expertise) => "Esperienza:",
            (Self::En, Text::Expertise) => "Expertise:",
            (Self::It, Text::FilterOn) => "attivo",
            (Self::En, Text::FilterOn) => "on",
            (Self::It, Text::FilterOff) => "disattivo",
            (Self::En, Text::FilterOff) => "off",
            (Self::It, Text::NothingToUndo) => "Niente da annullare.",
            (Self::En, Text::NothingToUndo) => "Nothing to undo.",
            (Self::It, Text::MenuCostReport) => "Analisi dei costi del menu",
            (Self::En, Text::MenuCostReport) => "Menu cost report",
            (Self::It, Text::DishCostReport) => "Analisi dei costi del piatto",
            (Self::En, Text::DishCostReport) => "Dish cost report",
            (Self::It, Text::CostPerGuest) => "Costo per ospite:",
            (Self::En, Text::CostPerGuest) => "Cost per guest:",
            (Self::It, Text::PricePerGuest) => "Prezzo per ospite:",
            (Self::En, Text::PricePerGuest) => "Price per guest:",
            (Self::It, Text::TargetMargin) => "Margine obiettivo:",
            (Self::En, Text::TargetMargin) => "Target margin:",
            (Self::It, Text::PourCost) => "Food cost:",
            (Self::En, Text::PourCost) => "Pour cost:",
            (Self::It, Text::SuggestedPrice) => "Prezzo suggerito:",
            (Self::En, Text::SuggestedPrice) => "Suggested price:",
            (Self::It, Text::Margin) => "Margine:",
            (Self::En, Text::Margin) => "Margin:",
        }
    }

    /// Starter suggestions seeded with the welcome message
    ///
    /// These are directives the user can send as-is, not questions.
    pub fn default_suggestions(self, mode: SessionMode) -> Vec<String> {
        debug!(?self, ?mode, "Locale::default_suggestions: called");
        let items: [&str; 3] = match (self, mode) {
            (Self::It, SessionMode::Single) => [
                "Un risotto con tartufo e funghi porcini",
                "Un piatto vegetariano creativo",
                "Qualcosa di light e sofisticato",
            ],
            (Self::En, SessionMode::Single) => [
                "A truffle risotto with porcini mushrooms",
                "A creative vegetarian dish",
                "Something light and sophisticated",
            ],
            (Self::It, SessionMode::Menu) => [
                "Un menu degustazione autunnale in cinque portate",
                "Un percorso di mare dal crudo al dolce",
                "Un menu vegetale per una cena elegante",
            ],
            (Self::En, SessionMode::Menu) => [
                "A five-course autumn tasting menu",
                "A seafood journey from raw bar to dessert",
                "A plant-based menu for an elegant dinner",
            ],
        };
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Resolve a filter option key to its label, falling back to the key itself
    pub fn option_label(self, key: &str) -> String {
        debug!(?self, %key, "Locale::option_label: called");
        let label = match self {
            Self::It => OPTION_LABELS_IT.iter().find(|(k, _)| *k == key).map(|(_, v)| *v),
            Self::En => OPTION_LABELS_EN.iter().find(|(k, _)| *k == key).map(|(_, v)| *v),
        };
        label.unwrap_or(key).to_string()
    }
}

impl Locale {
    /// REPL help card: section titles with `(command, description)` rows
    pub fn help_sections(self) -> &'static [HelpSection] {
        match self {
            Self::It => HELP_IT,
            Self::En => HELP_EN,
        }
    }
}

pub type HelpSection = (&'static str, &'static [(&'static str, &'static str)]);

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::It => write!(f, "it"),
            Self::En => write!(f, "en"),
        }
    }
}

const HELP_IT: &[HelpSection] = &[
    (
        "Conversazione:",
        &[
            ("<numero>", "Scegli un suggerimento"),
            ("/refresh", "Chiedi nuovi suggerimenti"),
            ("/materialize", "Genera subito dalla conversazione"),
            ("/filters", "Mostra i filtri strategici"),
            ("/toggle <opzione>", "Attiva o disattiva un filtro"),
            ("/shuffle <gruppo>", "Nuove opzioni per un gruppo"),
            ("/expertise <liv>", "Imposta il livello di esperienza"),
        ],
    ),
    (
        "Risultati:",
        &[
            ("/view <n>", "Mostra una portata"),
            ("/back", "Torna al menu"),
            ("/modify <testo>", "Modifica il menu"),
            ("/regen <n>", "Rigenera una portata"),
            ("/undo", "Annulla l'ultima modifica"),
            ("/market", "Analisi dei costi"),
            ("/retry", "Ripeti l'ultima generazione"),
        ],
    ),
    (
        "Sessione:",
        &[("/home", "Torna alla scelta della modalità"), ("/quit", "Esci")],
    ),
];

const HELP_EN: &[HelpSection] = &[
    (
        "Conversation:",
        &[
            ("<number>", "Pick a suggestion"),
            ("/refresh", "Ask for fresh suggestions"),
            ("/materialize", "Generate from the conversation now"),
            ("/filters", "Show strategic filters"),
            ("/toggle <option>", "Switch a filter on or off"),
            ("/shuffle <group>", "New options for a filter group"),
            ("/expertise <lvl>", "Set the expertise level"),
        ],
    ),
    (
        "Results:",
        &[
            ("/view <n>", "Show a course"),
            ("/back", "Back to the menu"),
            ("/modify <text>", "Change the menu"),
            ("/regen <n>", "Regenerate a course"),
            ("/undo", "Undo the last change"),
            ("/market", "Cost report"),
            ("/retry", "Run the last generation again"),
        ],
    ),
    (
        "Session:",
        &[("/home", "Back to mode selection"), ("/quit", "Exit")],
    ),
];

const OPTION_LABELS_IT: &[(&str, &str)] = &[
    ("grp1_vegetarian", "Vegetariano"),
    ("grp1_vegan", "Vegano"),
    ("grp1_gluten_free", "Senza Glutine"),
    ("grp1_dairy_free", "Senza Latticini"),
    ("grp1_low_calorie", "Leggero (< 400 Kcal)"),
    ("grp2_baked", "Al Forno"),
    ("grp2_grilled", "Alla Griglia"),
    ("grp2_sous_vide", "Sottovuoto"),
    ("grp2_sauteed", "Saltato"),
    ("grp2_steamed", "Al Vapore"),
    ("grp3_spring", "Primavera"),
    ("grp3_summer", "Estate"),
    ("grp3_autumn", "Autunno"),
    ("grp3_winter", "Inverno"),
    ("grp3_fine_dining", "Fine Dining"),
    ("grp4_pasta", "A Base di Pasta"),
    ("grp4_rice", "A Base di Riso"),
    ("grp4_fish", "Pesce"),
    ("grp4_beef", "Manzo"),
    ("grp4_vegetables", "Verdure"),
];

const OPTION_LABELS_EN: &[(&str, &str)] = &[
    ("grp1_vegetarian", "Vegetarian"),
    ("grp1_vegan", "Vegan"),
    ("grp1_gluten_free", "Gluten Free"),
    ("grp1_dairy_free", "Dairy Free"),
    ("grp1_low_calorie", "Light (< 400 Kcal)"),
    ("grp2_baked", "Baked"),
    ("grp2_grilled", "Grilled"),
    ("grp2_sous_vide", "Sous Vide"),
    ("grp2_sauteed", "Sautéed"),
    ("grp2_steamed", "Steamed"),
    ("grp3_spring", "Spring"),
    ("grp3_summer", "Summer"),
    ("grp3_autumn", "Autumn"),
    ("grp3_winter", "Winter"),
    ("grp3_fine_dining", "Fine Dining"),
    ("grp4_pasta", "Pasta-based"),
    ("grp4_rice", "Rice-based"),
    ("grp4_fish", "Fish"),
    ("grp4_beef", "Beef"),
    ("grp4_vegetables", "Vegetables"),
];
