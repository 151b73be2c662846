//! Prompt construction for SQL generation.
//!
//! Builds the single instruction string sent to the model: role, schema
//! context, hard constraints, domain logic rules, time-window formulas and
//! the verbatim question. The output is deterministic for a given question.

use crate::db::SchemaContext;

/// Instruction template for the SQL analyst prompt.
///
/// The time-window formulas are spelled out as literal T-SQL expressions;
/// models reliably copy them but invent wrong ones when asked to derive
/// them.
const PROMPT_TEMPLATE: &str = r#"You are a senior SQL Server data analyst. You generate production-safe queries.
Generate only SELECT statements.
Never generate INSERT, UPDATE, DELETE or DROP.
Never use markdown.
You strictly follow the schema.

Database Schema (SQL Server):

{schema}

Use only the columns listed in the schema above.
Do not assume additional columns.
Do not use tables that are not listed in the schema.

Logic Rules:
Exclude assets where the Status column = 'Disposed'.
When grouping by site, join Assets with Sites on SiteId.
When grouping by vendor, join with Vendors.
Only apply the IsActive = 1 filter to these tables:
Customers, Vendors, Sites, Locations, Items.
Do not assume other tables contain IsActive.

Time Logic Rules:
For this year:
YEAR(date_column) = YEAR(GETDATE())
For last month, filter using:
MONTH(date_column) = MONTH(DATEADD(MONTH, -1, GETDATE()))
AND YEAR(date_column) = YEAR(DATEADD(MONTH, -1, GETDATE()))
For quarterly reports of the current year:
YEAR(date_column) = YEAR(GETDATE())
AND DATEPART(QUARTER, date_column) = DATEPART(QUARTER, GETDATE())

Return exactly one valid SQL statement. Do not return multiple queries.
Question: {question}"#;

/// Builds the instruction string for the given question.
///
/// The question is embedded verbatim; no length limit or sanitization is
/// applied.
pub fn build_prompt(question: &str, schema: &SchemaContext) -> String {
    PROMPT_TEMPLATE
        .replace("{schema}", &schema.format_for_prompt())
        .replace("{question}", question)
}
