// Cross-cutting prompt fragments. Each feature keeps its own prompts.rs and
// builds on these.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_RULES: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model from inventing facts about the candidate or the posting.
pub const NO_INVENTION_RULE: &str = "\
    Use only information present in the input. \
    Do NOT infer, interpolate, or invent details. \
    If the input does not support a value, leave it empty.";

/// Substitutes `{name}` placeholders in `template` in a single pass.
///
/// Values are never rescanned, so user text that happens to contain a
/// placeholder is inserted literally. Braces that do not name a known
/// placeholder (JSON examples in the template) are kept as written.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
