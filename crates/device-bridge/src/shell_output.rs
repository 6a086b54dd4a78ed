//! Shell Output Parsing
//!
//! Turns the text printed by `cmd`, `dumpsys`, `appops`, `settings` and
//! `content` into the values the platform services return.

use keepalive_status::{ContentRow, OpMode, QueryError, RestrictBackgroundStatus};

/// Uid of `package` from `cmd package list packages -U <package>`
///
/// The command filters by substring, so every line is checked for an
/// exact package match.
pub fn package_uid(output: &str, package: &str) -> Option<u32> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let name = fields.next()?.strip_prefix("package:")?;
        if name != package {
            return None;
        }
        fields
            .find_map(|field| field.strip_prefix("uid:"))
            .and_then(|uid| uid.split(',').next())
            .and_then(|uid| uid.parse().ok())
    })
}

/// Whether `package` appears in `dumpsys deviceidle whitelist`
pub fn in_deviceidle_whitelist(output: &str, package: &str) -> bool {
    output
        .lines()
        .filter_map(|line| line.trim().split(',').nth(1))
        .any(|name| name == package)
}

/// `<permission>: granted=<bool>` from `dumpsys package <pkg>`
pub fn permission_granted(output: &str, permission: &str) -> bool {
    let prefix = format!("{}: granted=", permission);
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .any(|rest| rest.starts_with("true"))
}

/// Mode from `appops get <pkg> <op>`
pub fn app_op_mode(output: &str) -> Result<OpMode, QueryError> {
    let output = output.trim();

    if output.starts_with("Error") || output.contains("Unknown operation") {
        return Err(QueryError::Unsupported(output.to_string()));
    }
    if output.is_empty() || output.starts_with("No operations") {
        return Ok(OpMode::Default);
    }

    let mode = output
        .lines()
        .find_map(|line| line.split_once(": ").map(|(_, rest)| rest))
        .and_then(|rest| rest.split(|c: char| c == ';' || c.is_whitespace()).next())
        .ok_or_else(|| QueryError::Failed(format!("unrecognized appops output: {}", output)))?;

    match mode {
        "allow" => Ok(OpMode::Allowed),
        "ignore" => Ok(OpMode::Ignored),
        "deny" => Ok(OpMode::Errored),
        "default" => Ok(OpMode::Default),
        "foreground" => Ok(OpMode::Foreground),
        other => Err(QueryError::Failed(format!("unrecognized appops mode: {}", other))),
    }
}

/// Combine `cmd netpolicy get restrict-background` with the whitelist
/// from `cmd netpolicy list restrict-background-whitelist`
pub fn restrict_background_status(
    status_output: &str,
    whitelist_output: &str,
    uid: u32,
) -> Result<RestrictBackgroundStatus, QueryError> {
    let status = status_output
        .trim()
        .strip_prefix("Restrict background status:")
        .map(str::trim)
        .ok_or_else(|| QueryError::Unsupported(status_output.trim().to_string()))?;

    match status {
        "disabled" => Ok(RestrictBackgroundStatus::Disabled),
        "enabled" => {
            let whitelisted = whitelist_output
                .split(|c: char| c == ':' || c.is_whitespace())
                .filter_map(|token| token.parse::<u32>().ok())
                .any(|listed| listed == uid);
            if whitelisted {
                Ok(RestrictBackgroundStatus::Whitelisted)
            } else {
                Ok(RestrictBackgroundStatus::Enabled)
            }
        }
        other => Err(QueryError::Failed(format!("unrecognized restrict-background status: {}", other))),
    }
}

/// `settings get secure background_data`; unset means allowed
pub fn background_data_setting(output: &str) -> bool {
    output.trim() != "0"
}

/// First row from `content query`
pub fn first_content_row(output: &str) -> Result<Option<ContentRow>, QueryError> {
    let output = output.trim();

    if output.starts_with("No result found") {
        return Ok(None);
    }

    let Some(line) = output.lines().find(|line| line.starts_with("Row:")) else {
        return Err(QueryError::Failed(output.lines().next().unwrap_or("empty output").to_string()));
    };

    // "Row: 0 pkgname=com.example, currentstate=0"
    let columns = line
        .trim_start_matches("Row:")
        .trim_start()
        .split_once(' ')
        .map(|(_, columns)| columns)
        .unwrap_or("");

    let row = split_columns(columns)
        .into_iter()
        .filter_map(|pair| pair.split_once('='))
        .fold(ContentRow::new(), |row, (column, value)| row.with(column.trim(), value));

    Ok(Some(row))
}

/// Split `a=1, b=x, y, c=2` at the `, ` separators that start a new column
///
/// `content query` does not escape values, so a value that itself contains
/// `, <name>=` is still split there.
fn split_columns(columns: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(offset) = columns[search..].find(", ") {
        let separator = search + offset;
        if starts_with_column(&columns[separator + 2..]) {
            parts.push(&columns[start..separator]);
            start = separator + 2;
        }
        search = separator + 2;
    }

    parts.push(&columns[start..]);
    parts
}

fn starts_with_column(s: &str) -> bool {
    let name_len = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    name_len > 0 && !s.starts_with(|c: char| c.is_ascii_digit()) && s[name_len..].starts_with('=')
}

/// Bind `?` placeholders as quoted SQL literals
pub fn bind_selection(selection: &str, args: &[&str]) -> String {
    let mut args = args.iter();
    let mut bound = String::with_capacity(selection.len());

    for c in selection.chars() {
        if c == '?' {
            if let Some(arg) = args.next() {
                bound.push('\'');
                bound.push_str(&arg.replace('\'', "''"));
                bound.push('\'');
                continue;
            }
        }
        bound.push(c);
    }

    bound
}
