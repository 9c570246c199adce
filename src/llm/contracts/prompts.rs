//! Prompt templates
//!
//! Three fixed templates: generation, explanation, repair. Only the
//! placeholder substitution is contractual; every template embeds the schema
//! document verbatim.

use crate::llm::adapters::LlmRole;

const GENERATION_TEMPLATE: &str = "You are a SQL assistant specialised in Snowflake cost and usage analysis. Translate the user's question into one SQL query over the schema below.

1. Schema rules:
   - Use only the tables and columns defined in the schema
   - Respect the declared column types
   - Join tables only on logically related keys
   - Write column names in uppercase

2. Query structure:
   - Prefer clear, efficient queries with suitable aggregations and groupings
   - Handle dates and times explicitly for temporal questions
   - Add filters and an ORDER BY where they help the answer
   - Limit the result size when the question allows it

3. Cost focus:
   - Prioritise credit usage and cost metrics
   - Include performance and warehouse utilisation metrics when relevant

4. Output format:
   - The query MUST be a single SELECT statement
   - Return ONLY the SQL query: no explanations, no commentary, no markdown

Schema:
{schema}

Generate SQL for the following question:";

const EXPLANATION_TEMPLATE: &str = "You are a Snowflake SQL expert. Explain the SQL query below for a business analyst, organised in these sections:

1. Overview:
   - The main purpose of the query
   - The kind of information it retrieves

2. Query Structure:
   - Tables used and how they relate
   - Key columns selected
   - Filtering conditions
   - Aggregations and groupings

3. Business Context:
   - How to interpret the results
   - Insights and metrics that can be derived

Query to explain:
{query}

Schema:
{schema}

Keep the explanation clear and concise, covering both the technical and the business side.";

const REPAIR_TEMPLATE: &str = "You are a SQL debugger specialised in Snowflake. The query below failed with the error shown. Fix it.

1. Error analysis:
   - Read the error message carefully
   - Identify syntax or logic problems
   - Check that every table and column exists in the schema

2. Fix requirements:
   - Keep the original intent of the query
   - Use only tables and columns defined in the schema
   - The corrected query MUST be a single SELECT statement

Original Query:
{query}

Error Message:
{error}

Schema:
{schema}

Return ONLY the corrected SQL query, without explanations or markdown:";

/// Generation prompt: system text plus the role the question is sent as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub system: String,
    pub user_role: LlmRole,
}

/// Build the NL-to-SQL generation prompt
///
/// The caller sends the question itself as the `user_role` turn.
pub fn generation_prompt(schema: &str) -> GenerationPrompt {
    GenerationPrompt {
        system: GENERATION_TEMPLATE.replace("{schema}", schema),
        user_role: LlmRole::User,
    }
}

/// Build the explanation prompt for an executed query
pub fn explanation_prompt(query: &str, schema: &str) -> String {
    fill(EXPLANATION_TEMPLATE, &[("{query}", query), ("{schema}", schema)])
}

/// Build the repair prompt for a query that failed with `error`
pub fn repair_prompt(query: &str, error: &str, schema: &str) -> String {
    fill(
        REPAIR_TEMPLATE,
        &[("{query}", query), ("{error}", error), ("{schema}", schema)],
    )
}

/// Substitute placeholders in a single left-to-right pass
///
/// Values are never rescanned, so a query or error message that happens to
/// contain `{schema}` is left alone.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some((at, key, value)) = values
        .iter()
        .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
        .min_by_key(|(at, _, _)| *at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out.push_str(rest);
    out
}
