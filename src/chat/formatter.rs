//! Natural-language rendering of query results.

use crate::db::{QueryResult, Value};

/// Converts a result set into the answer text.
///
/// A single scalar renders as a sentence; everything else renders as one
/// comma-and-space-joined line per row, in column order. Column names are
/// not included; they remain available on the raw result metadata.
pub fn format_answer(result: &QueryResult) -> String {
    if result.rows.len() == 1 && result.rows[0].len() == 1 {
        return format!(
            "You have {} items matching your query.",
            result.rows[0][0].to_display_string()
        );
    }

    let lines = result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>();

    format!("Here are the results:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_scalar_renders_sentence() {
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("Count", "int")],
            vec![vec![Value::Int(42)]],
        );
        assert_eq!(
            format_answer(&result),
            "You have 42 items matching your query."
        );
    }

    #[test]
    fn test_tabular_renders_line_per_row() {
        let result = QueryResult::with_data(
            vec![
                ColumnInfo::new("Id", "int"),
                ColumnInfo::new("Name", "nvarchar"),
            ],
            vec![
                vec![Value::Int(1), Value::String("A".into())],
                vec![Value::Int(2), Value::String("B".into())],
            ],
        );
        assert_eq!(format_answer(&result), "Here are the results:\n1, A\n2, B");
    }

    #[test]
    fn test_single_row_many_columns_is_tabular() {
        let result = QueryResult::with_data(
            vec![
                ColumnInfo::new("SiteCode", "nvarchar"),
                ColumnInfo::new("Total", "int"),
            ],
            vec![vec![Value::String("WH1".into()), Value::Int(9)]],
        );
        assert_eq!(format_answer(&result), "Here are the results:\nWH1, 9");
    }

    #[test]
    fn test_empty_result_renders_empty_block() {
        let result = QueryResult::new();
        assert_eq!(format_answer(&result), "Here are the results:\n");
    }

    #[test]
    fn test_null_scalar_renders_null() {
        let result = QueryResult::with_data(
            vec![ColumnInfo::new("MaxCost", "money")],
            vec![vec![Value::Null]],
        );
        assert_eq!(
            format_answer(&result),
            "You have NULL items matching your query."
        );
    }
}
