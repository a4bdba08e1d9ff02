//! Tool definitions whose input schemas are the structured shapes we want back
//!
//! Kept to the JSON Schema subset all three providers accept: no `$ref`,
//! no `oneOf`, enums only on strings.

use serde_json::{Value, json};

use crate::llm::ToolDefinition;

pub const READY_TOOL: &str = "ready_to_materialize";
pub const SUMMARY_TOOL: &str = "emit_summary";
pub const RECIPE_TOOL: &str = "emit_recipe";
pub const MENU_TOOL: &str = "emit_menu";
pub const MARKET_TOOL: &str = "emit_market_report";
pub const MENU_MARKET_TOOL: &str = "emit_menu_market_report";
pub const OPTIONS_TOOL: &str = "emit_options";

fn string() -> Value {
    json!({"type": "string"})
}

fn strings() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({"type": "object", "properties": properties, "required": required})
}

pub fn ready_to_materialize() -> ToolDefinition {
    ToolDefinition::new(
        READY_TOOL,
        "Signal that the conversation holds enough detail to generate the result",
        object(json!({}), &[]),
    )
}

pub fn summary() -> ToolDefinition {
    ToolDefinition::new(
        SUMMARY_TOOL,
        "Emit the structured summary of the conversation",
        object(
            json!({
                "ingredients": strings(),
                "constraints": strings(),
                "concept_abstract": string(),
            }),
            &["ingredients", "constraints"],
        ),
    )
}

fn sage() -> Value {
    object(json!({"headline": string(), "analysis": string()}), &["headline", "analysis"])
}

fn recipe_schema() -> Value {
    let meta = object(
        json!({
            "dish_name": string(),
            "concept_summary": string(),
            "preparation_time_minutes": {"type": "integer"},
            "difficulty_level": {
                "type": "string",
                "enum": ["Principiante", "Didatta", "Appassionato", "Professionista"]
            },
            "philosophical_pillar_alignment": string(),
            "abv_estimate": string(),
            "calories_estimate": {"type": "integer"},
            "category": string(),
        }),
        &["dish_name", "concept_summary", "difficulty_level"],
    );
    let council = object(
        json!({"scientist": sage(), "artist": sage(), "historian": sage(), "philosopher": sage()}),
        &["scientist", "artist", "historian", "philosopher"],
    );
    let ingredient = object(
        json!({"name": string(), "quantity": string(), "notes": string()}),
        &["name", "quantity"],
    );
    let step = object(
        json!({"step_number": {"type": "integer"}, "instruction": string(), "technical_note": string()}),
        &["step_number", "instruction"],
    );
    let prep = object(
        json!({"name": string(), "ingredients": strings(), "instructions": string(), "yield_note": string()}),
        &["name", "ingredients", "instructions"],
    );
    let synthesis = object(
        json!({
            "rationale": string(),
            "ingredients": {"type": "array", "items": ingredient},
            "steps": {"type": "array", "items": step},
            "glassware_guide": object(
                json!({"glass_type": string(), "ice_type": string(), "garnish_detail": string()}),
                &["glass_type", "ice_type", "garnish_detail"],
            ),
            "sensory_profile": object(
                json!({"taste_balance": string(), "texture_map": string()}),
                &["taste_balance", "texture_map"],
            ),
            "homemade_preps": {"type": "array", "items": prep},
        }),
        &["rationale", "ingredients", "steps"],
    );

    object(
        json!({"meta": meta, "sages_council": council, "maestro_synthesis": synthesis}),
        &["meta", "sages_council", "maestro_synthesis"],
    )
}

pub fn recipe() -> ToolDefinition {
    ToolDefinition::new(RECIPE_TOOL, "Emit the complete recipe", recipe_schema())
}

pub fn menu() -> ToolDefinition {
    let concept = object(
        json!({
            "title": string(),
            "description": string(),
            "seasonality": string(),
            "philosophical_theme": string(),
        }),
        &["title", "description"],
    );
    ToolDefinition::new(
        MENU_TOOL,
        "Emit the complete menu",
        object(
            json!({"concept": concept, "courses": {"type": "array", "items": recipe_schema()}}),
            &["concept", "courses"],
        ),
    )
}

pub fn market_report() -> ToolDefinition {
    let line = object(
        json!({
            "ingredient": string(),
            "quantity_used": string(),
            "market_unit_price": string(),
            "calculated_cost": {"type": "number"},
            "market_trend": {"type": "string", "enum": ["STABLE", "RISING", "FALLING"]},
            "abv_content": string(),
            "calories": {"type": "integer"},
        }),
        &["ingredient", "quantity_used", "market_unit_price", "calculated_cost"],
    );
    let nutrition = object(
        json!({"final_abv": string(), "total_calories": {"type": "integer"}, "dilution_factor": string()}),
        &["final_abv", "total_calories"],
    );
    ToolDefinition::new(
        MARKET_TOOL,
        "Emit the cost report for one recipe",
        object(
            json!({
                "total_pour_cost": {"type": "number"},
                "suggested_menu_price": {"type": "number"},
                "profit_margin_percentage": {"type": "number"},
                "cost_breakdown": {"type": "array", "items": line},
                "nutritional_profile": nutrition,
                "marketing_hook": string(),
                "pricing_strategy_note": string(),
            }),
            &[
                "total_pour_cost",
                "suggested_menu_price",
                "profit_margin_percentage",
                "cost_breakdown",
            ],
        ),
    )
}

pub fn menu_market_report() -> ToolDefinition {
    let dish = object(
        json!({
            "dish_name": string(),
            "pour_cost": {"type": "number"},
            "key_expensive_ingredients": strings(),
        }),
        &["dish_name", "pour_cost"],
    );
    ToolDefinition::new(
        MENU_MARKET_TOOL,
        "Emit the cost report for a whole menu",
        object(
            json!({
                "overall_pour_cost": {"type": "number"},
                "recommended_price_per_pax": {"type": "number"},
                "target_margin": {"type": "number"},
                "financial_narrative": string(),
                "dishes_breakdown": {"type": "array", "items": dish},
            }),
            &["overall_pour_cost", "recommended_price_per_pax", "target_margin"],
        ),
    )
}

pub fn options() -> ToolDefinition {
    ToolDefinition::new(
        OPTIONS_TOOL,
        "Emit a short list of options",
        object(json!({"options": strings()}), &["options"]),
    )
}
