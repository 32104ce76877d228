//! The frozen relevance rubric and the structured-output schema.
//!
//! The rubric text must stay byte-identical between runs so that scores from
//! different runs and different backends remain comparable. Do not edit it.

use serde_json::{json, Value};

use crate::model::Score;

/// Name under which the schema is registered with structured-output APIs.
pub const SCHEMA_NAME: &str = "Eval";

/// Description of the `score` field.
pub const SCORE_DESCRIPTION: &str = "A score representing the relevance of the generated answer.";

/// Description of the `reasoning` field.
pub const REASONING_DESCRIPTION: &str = "The reasoning for the score in 100 characters or less.";

/// Instruction sent ahead of every prompt/response pair.
pub const RUBRIC: &str = "Evaluate the relevance of the generated response to the given writing prompt on a continuous scale from poor to excellent.
A generation is considered relevant (score > poor ) if it addresses the core demands of the response, follows any requested style, 
and stays focused on the topic.

Consider the following aspects when evaluating the response:
- Style: Does the response follow the style or tone requested in the prompt?
- Completeness: Does the response sufficiently cover the prompt?
- Focus: Does the response stay on topic without introducing unnecessary or unrelated information?
- Clarity: Is the response clear and easy to understand?
- Accuracy: If the prompt requires factual information, is the response factually correct?

Use the following relevance scale:

poor - No relevance; the answer is completely unrelated or nonsensical
ok - Low relevance; minor relation to the prompt but missing key details or accuracy
good - Moderate relevance; somewhat addresses the prompt but lacks depth or focus
great - High relevance; mostly follows the prompt but may lack completeness or introduce some off-topic information
excellent - Very high relevance; thoroughly follows the prompt with minor flaws

Provide a brief reasoning for your assigned score, considering different aspects such as clarity, focus, and completeness.";

/// Render the full instruction for one pair.
///
/// Interpolation is positional, so braces or placeholder-like text inside the
/// prompt or response are passed through untouched.
pub fn render(prompt: &str, response: &str) -> String {
    format!("{RUBRIC}\n\nPrompt: {prompt}\nResponse: {response}")
}

/// JSON schema the oracle's reply must satisfy.
pub fn evaluation_schema() -> Value {
    let labels: Vec<&str> = Score::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "score": {
                "type": "string",
                "enum": labels,
                "description": SCORE_DESCRIPTION,
            },
            "reasoning": {
                "type": "string",
                "description": REASONING_DESCRIPTION,
            }
        },
        "required": ["score", "reasoning"],
        "additionalProperties": false,
    })
}
