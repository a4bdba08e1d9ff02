//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

pub const CHAT_SINGLE: &str = include_str!("../../prompts/chat-single.pmt");
pub const CHAT_MENU: &str = include_str!("../../prompts/chat-menu.pmt");
pub const SUMMARIZE: &str = include_str!("../../prompts/summarize.pmt");
pub const DISH: &str = include_str!("../../prompts/dish.pmt");
pub const MENU: &str = include_str!("../../prompts/menu.pmt");
pub const MODIFY_MENU: &str = include_str!("../../prompts/modify-menu.pmt");
pub const DISH_MARKET: &str = include_str!("../../prompts/dish-market.pmt");
pub const MENU_MARKET: &str = include_str!("../../prompts/menu-market.pmt");
pub const FILTERS: &str = include_str!("../../prompts/filters.pmt");
pub const QUESTIONS: &str = include_str!("../../prompts/questions.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    let found = match name {
        "chat-single" => Some(CHAT_SINGLE),
        "chat-menu" => Some(CHAT_MENU),
        "summarize" => Some(SUMMARIZE),
        "dish" => Some(DISH),
        "menu" => Some(MENU),
        "modify-menu" => Some(MODIFY_MENU),
        "dish-market" => Some(DISH_MARKET),
        "menu-market" => Some(MENU_MARKET),
        "filters" => Some(FILTERS),
        "questions" => Some(QUESTIONS),
        _ => None,
    };
    if found.is_none() {
        debug!("get_embedded: no match found");
    }
    found
}
