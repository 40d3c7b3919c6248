//! Prompt construction for the inference backend

use sift_domain::Category;

/// Short definition of each category, in the order presented to the model
pub const TAXONOMY: &[(Category, &str)] = &[
    (
        Category::Narrative,
        "Executive letters, company overview, strategic vision, management discussions, \
         brand stories, qualitative descriptions",
    ),
    (
        Category::Financials,
        "Financial statements, balance sheets, income statements, cash flow, revenue numbers, \
         profit/loss, accounting data, financial ratios, earnings per share",
    ),
    (
        Category::Operations,
        "Business operations, supply chain, manufacturing, distribution, logistics, \
         production, operational procedures",
    ),
];

const INSTRUCTIONS: &str =
    "Classify the following text excerpt from a company annual or quarterly report.";

const ANSWER_CUE: &str = "Your response (one word only):";

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the classification prompt around a bounded text sample
pub struct PromptBuilder<'a> {
    sample: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder; `text` is cut to `max_sample_length` characters
    pub fn new(text: &'a str, max_sample_length: usize) -> Self {
        Self {
            sample: truncate_chars(text, max_sample_length),
        }
    }

    /// The excerpt that will be sent
    pub fn sample(&self) -> &str {
        self.sample
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let labels: Vec<&str> = TAXONOMY.iter().map(|(c, _)| c.dir_name()).collect();

        let mut prompt = String::new();
        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!(
            "You must respond with EXACTLY ONE word from this list: {}.\n\n",
            join_alternatives(&labels)
        ));

        prompt.push_str("Categories:\n");
        for (category, definition) in TAXONOMY {
            prompt.push_str(&format!("- {}: {}\n", category.dir_name(), definition));
        }
        prompt.push('\n');

        prompt.push_str("Text excerpt:\n");
        prompt.push_str(self.sample);
        prompt.push_str("\n\n");

        prompt.push_str(ANSWER_CUE);
        prompt
    }
}

/// "a, b, or c"
fn join_alternatives(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}
