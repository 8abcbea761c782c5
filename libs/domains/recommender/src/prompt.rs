//! Prompt rendering for the chat model

use crate::error::{RecommenderError, RecommenderResult};

pub const SYSTEM_PROMPT: &str = "You are an AI assistant functioning as a recommendation system for an ecommerce website. Be specific and limit your answers to the requested format.";

/// Key the model is asked to put its suggestions under
pub const RESPONSE_KEY: &str = "next_items";

/// `a`, `a, and b`, `a, b, and c`
pub fn join_items(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

/// English word for small counts, digits otherwise
pub fn count_word(n: usize) -> String {
    const WORDS: [&str; 11] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    ];
    WORDS
        .get(n)
        .map(|w| w.to_string())
        .unwrap_or_else(|| n.to_string())
}

pub fn user_prompt(items: &[String], suggestion_count: usize) -> RecommenderResult<String> {
    if items.is_empty() {
        return Err(RecommenderError::InvalidInput(
            "items must contain at least one purchased item".to_string(),
        ));
    }

    Ok(format!(
        "A user bought {} in that order. What {} items would he/she be likely to purchase next? \
         Express your response as a JSON object with a key of '{}' and a value representing your array of recommended items.",
        join_items(items),
        count_word(suggestion_count),
        RESPONSE_KEY
    ))
}

/// System and user instructions in the instruction-tuned chat format
pub fn build_prompt(items: &[String], suggestion_count: usize) -> RecommenderResult<String> {
    let user = user_prompt(items, suggestion_count)?;
    Ok(format!(
        "[INST] <<SYS>>\n{}\n<</SYS>>\n{}[/INST]",
        SYSTEM_PROMPT, user
    ))
}
