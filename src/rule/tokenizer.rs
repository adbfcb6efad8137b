//! Rule string tokenizer

/// Split a rule string into tokens
///
/// Parentheses always stand alone; everything else is separated by
/// whitespace. Quoted literals are not special-cased, so `name = 'Ada King'`
/// yields the two tokens `'Ada` and `King'` and will not parse as a single
/// comparison.
pub fn tokenize(rule: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in rule.chars() {
        match c {
            '(' | ')' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
