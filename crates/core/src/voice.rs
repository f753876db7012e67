//! Voice-to-launch parsing.
//!
//! The language model is asked to turn a free-form spoken request into a
//! small JSON object. [`parse_product_reply`] turns its raw reply into a
//! validated [`ParsedProduct`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::naming::launch_slug;

/// Instruction sent as the system message with every voice request.
pub const VOICE_SYSTEM_PROMPT: &str = r#"You are a product parser. Convert voice input into JSON format with these exact fields:
{
  "product": "Product Name",
  "slug": "product-slug",
  "price": 5000,
  "description": "Product description"
}

Generate a URL-safe slug from the product name. Price should be in Nigerian Naira. Keep descriptions concise but compelling."#;

/// Sampling temperature for voice parsing requests.
pub const VOICE_TEMPERATURE: f64 = 0.3;

/// Completion token cap for voice parsing requests.
pub const VOICE_MAX_TOKENS: u32 = 500;

/// The four fields every parsed reply must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["product", "slug", "price", "description"];

/// Product data extracted from a language-model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProduct {
    pub product: String,
    pub slug: String,
    pub price: f64,
    pub description: String,
}

/// Parse and validate a language-model reply.
///
/// Returns [`CoreError::Parse`] if the reply is not JSON and
/// [`CoreError::Validation`] if any required field is missing, blank, or
/// zero. The slug is normalised to canonical slug form.
pub fn parse_product_reply(reply: &str) -> Result<ParsedProduct, CoreError> {
    let value: Value = serde_json::from_str(reply.trim())
        .map_err(|e| CoreError::Parse(format!("Failed to parse model response as JSON: {e}")))?;

    let product = text_field(&value, "product");
    let slug = text_field(&value, "slug");
    let price = price_field(&value);
    let description = text_field(&value, "description");

    let (Some(product), Some(slug), Some(price), Some(description)) =
        (product, slug, price, description)
    else {
        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match *field {
                "price" => price_field(&value).is_none(),
                other => text_field(&value, other).is_none(),
            })
            .collect();
        return Err(CoreError::Validation(format!(
            "Missing required fields in parsed data: {}",
            missing.join(", ")
        )));
    };

    if price < 0.0 {
        return Err(CoreError::Validation(format!(
            "price must be a positive number (got {price})"
        )));
    }

    let slug = launch_slug(&slug);
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "slug contains no URL-safe characters".into(),
        ));
    }

    Ok(ParsedProduct {
        product,
        slug,
        price,
        description,
    })
}

fn text_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accepts a JSON number or a numeric string; zero counts as missing.
fn price_field(value: &Value) -> Option<f64> {
    let price = match value.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (price.is_finite() && price != 0.0).then_some(price)
}
