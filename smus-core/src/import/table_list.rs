//! Parsing of the `--table-name` list literal.

/// Parses an optional table list written as a list literal.
///
/// Accepts JSON (`["t1", "t2"]`) and single-quoted lists (`['t1', 't2']`).
/// Anything else is taken as one table name. `None`, a blank argument and
/// an empty list all mean "every table in the database".
pub fn parse_table_list(argument: Option<&str>) -> Option<Vec<String>> {
    let argument = argument?.trim();
    if argument.is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<Vec<String>>(argument)
        .or_else(|_| serde_json::from_str::<Vec<String>>(&argument.replace('\'', "\"")))
        .unwrap_or_else(|_| vec![argument.to_string()]);

    if parsed.is_empty() { None } else { Some(parsed) }
}
