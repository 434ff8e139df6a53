use crate::error::{BotError, Result};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Substitute `{{Field}}` references with values from `fields`.
///
/// Field names are matched exactly, so run the template through
/// [`transform_placeholders`](super::extract::transform_placeholders) first.
pub fn render_template(template: &str, fields: &[(&str, &str)]) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open.find(CLOSE).ok_or_else(|| {
            BotError::Template(format!(
                "unclosed placeholder near {:?}",
                truncate(&rest[start..], 20)
            ))
        })?;

        let name = after_open[..end].trim();
        let value = fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| BotError::Template(format!("can't evaluate field {:?}", name)))?;
        output.push_str(value);

        rest = &after_open[end + CLOSE.len()..];
    }

    output.push_str(rest);
    Ok(output)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_fields() {
        let rendered = render_template(
            "---\ntags: inbox\n---\n# {{Title}}\n\n{{Title}} body",
            &[("Title", "Buy Milk")],
        )
        .unwrap();
        assert_eq!(rendered, "---\ntags: inbox\n---\n# Buy Milk\n\nBuy Milk body");
    }

    #[test]
    fn test_render_without_placeholders() {
        assert_eq!(render_template("plain", &[]).unwrap(), "plain");
    }

    #[test]
    fn test_render_unknown_field_fails() {
        let err = render_template("{{Author}}", &[("Title", "x")]).unwrap_err();
        assert!(matches!(err, BotError::Template(_)));
        assert!(err.to_string().contains("Author"));
    }

    #[test]
    fn test_render_unclosed_placeholder_fails() {
        let err = render_template("# {{Title", &[("Title", "x")]).unwrap_err();
        assert!(matches!(err, BotError::Template(_)));
    }
}
