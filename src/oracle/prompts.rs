//! Prompt text for the three AI-backed features.

use crate::data::record::Record;

/// Persona used when answering questions about a single record.
pub const ORACLE_SYSTEM_INSTRUCTION: &str = "You are a world-class Pokémon expert, a 'Poké-Oracle'. \
Answer questions concisely, in 2-3 sentences, and in a style that would fit a classic Pokémon \
game's Pokedex or an NPC's dialogue.";

pub const IMAGE_FAILURE_MESSAGE: &str =
    "Failed to generate. The AI might be busy. Try a different prompt.";
pub const ANALYSIS_FAILURE_MESSAGE: &str =
    "An error occurred while analyzing the team. The AI might be down.";
pub const ORACLE_FAILURE_MESSAGE: &str = "The Poké-Oracle is resting. Please try again later.";

/// A free-text completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub contents: String,
    pub system_instruction: Option<String>,
}

/// Prompt for synthesizing a new creature from a user description.
pub fn image_prompt(description: &str) -> String {
    format!(
        "A new Pokémon monster based on this description: \"{}\". \
         Neo-brutalist pixel art style, on a plain white background.",
        description.trim()
    )
}

/// Prompt for analyzing a team, built from each member's name and types.
pub fn team_analysis_prompt(members: &[String]) -> TextPrompt {
    TextPrompt {
        contents: format!(
            "Analyze the following Pokémon team: {}. Provide a concise, expert analysis covering:\n\
             1. Overall Strengths: Key type advantages and strategic power.\n\
             2. Potential Weaknesses: Critical type disadvantages to watch out for.\n\
             3. Suggested Strategy: A simple, effective battle plan.",
            members.join(", ")
        ),
        system_instruction: None,
    }
}

/// Member summaries for [`team_analysis_prompt`].
pub fn team_members(team: &[&Record]) -> Vec<String> {
    team.iter().map(|r| r.summary()).collect()
}

/// Prompt for a question scoped to one record.
pub fn oracle_prompt(name: &str, question: &str) -> TextPrompt {
    TextPrompt {
        contents: format!(
            "Answer the following question about the Pokémon named {}: {}",
            name, question
        ),
        system_instruction: Some(ORACLE_SYSTEM_INSTRUCTION.to_string()),
    }
}
