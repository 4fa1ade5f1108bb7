//! Accessor naming conventions
//!
//! Mutators are recognized as `set_<member>` or `set<Member>`. The matching
//! state is looked up as a field `<member>` and as an accessor under the bare
//! member name, `get_`/`is_` prefixed forms, and their camel-case equivalents.

/// The member a mutator writes, or `None` when `name` is not mutator-shaped.
pub fn mutator_member(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("set_") {
        return if rest.is_empty() { None } else { Some(rest.to_string()) };
    }
    let rest = name.strip_prefix("set")?;
    let first = rest.chars().next()?;
    if !first.is_uppercase() {
        return None;
    }
    Some(uncapitalize(rest))
}

/// Field names that may back `member`.
pub fn field_candidates(member: &str) -> Vec<String> {
    let snake = to_snake_case(member);
    if snake == member {
        vec![member.to_string()]
    } else {
        vec![member.to_string(), snake]
    }
}

/// Accessor names that may read `member`, most idiomatic first.
pub fn accessor_candidates(member: &str) -> Vec<String> {
    let snake = to_snake_case(member);
    let capitalized = capitalize(member);
    let mut names = vec![
        snake.clone(),
        format!("get_{}", snake),
        format!("is_{}", snake),
        format!("get{}", capitalized),
        format!("is{}", capitalized),
        member.to_string(),
    ];
    let mut seen = std::collections::HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
    names
}

/// Whether `name` looks like a string conversion.
pub fn is_string_conversion_name(name: &str) -> bool {
    name.starts_with("to_string") || name.starts_with("toString")
}

fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
