/// Shell-like argument splitting for raw command input.
///
/// Handles:
/// - Whitespace-separated arguments
/// - Quoted strings (single and double quotes)
/// - Escape sequences within double quotes
pub fn split_arguments(input: &str) -> Vec<String> {
    split(input).0
}

/// Splits `input`, also reporting whether it ended inside an open quote.
fn split(input: &str) -> (Vec<String>, bool) {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;
    // An explicit "" is still an argument.
    let mut quoted = false;

    for ch in input.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_double_quote => {
                escape_next = true;
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                quoted = true;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                quoted = true;
            }
            ' ' | '\t' if !in_single_quote && !in_double_quote => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    (args, in_single_quote || in_double_quote)
}

/// Splits raw input for a completion request.
///
/// Input that is empty or ends in whitespace gets a trailing empty argument,
/// the partial word the player is about to type. Whitespace inside an open
/// quote belongs to the quoted partial instead.
pub fn split_for_completion(input: &str) -> Vec<String> {
    let (mut args, open_quote) = split(input);
    if !open_quote && (input.is_empty() || input.ends_with([' ', '\t'])) {
        args.push(String::new());
    }
    args
}
