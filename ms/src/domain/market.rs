//! Cost and margin reports

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketTrend {
    #[default]
    Stable,
    Rising,
    Falling,
}

/// Per-ingredient cost line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientCost {
    pub ingredient: String,
    pub quantity_used: String,
    /// e.g. "€30.00 / 700ml"
    pub market_unit_price: String,
    pub calculated_cost: f64,
    #[serde(default)]
    pub market_trend: MarketTrend,
    #[serde(default)]
    pub abv_content: String,
    #[serde(default)]
    pub calories: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalProfile {
    pub final_abv: String,
    pub total_calories: u32,
    #[serde(default)]
    pub dilution_factor: String,
}

/// Cost report for a single dish
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub total_pour_cost: f64,
    pub suggested_menu_price: f64,
    pub profit_margin_percentage: f64,
    pub cost_breakdown: Vec<IngredientCost>,
    #[serde(default)]
    pub nutritional_profile: NutritionalProfile,
    #[serde(default)]
    pub marketing_hook: String,
    #[serde(default)]
    pub pricing_strategy_note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishFinancialSummary {
    pub dish_name: String,
    pub pour_cost: f64,
    #[serde(default)]
    pub key_expensive_ingredients: Vec<String>,
}

/// Cost report for a whole menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuMarketReport {
    pub overall_pour_cost: f64,
    pub recommended_price_per_pax: f64,
    pub target_margin: f64,
    #[serde(default)]
    pub financial_narrative: String,
    #[serde(default)]
    pub dishes_breakdown: Vec<DishFinancialSummary>,
}

/// Either kind of cost report, as handed to the export boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostReport {
    Dish(MarketReport),
    Menu(MenuMarketReport),
}
