use std::borrow::Cow;

use memchr::memmem;

use super::rules::CompiledRules;

/// Wrap `line` in the color of the last highlight rule whose phrase it
/// contains (ASCII case-insensitive), followed by a single reset marker.
/// Lines without a match, or any line when color is disabled, come back
/// borrowed and unchanged.
pub fn render<'a>(line: &'a [u8], rules: &CompiledRules) -> Cow<'a, [u8]> {
    if !rules.color || rules.highlights.is_empty() {
        return Cow::Borrowed(line);
    }

    let lowered = line.to_ascii_lowercase();
    let Some(rule) = rules
        .highlights
        .iter()
        .rev()
        .find(|h| memmem::find(&lowered, &h.phrase).is_some())
    else {
        return Cow::Borrowed(line);
    };

    let mut out = Vec::with_capacity(rule.start.len() + line.len() + rules.reset.len());
    out.extend_from_slice(&rule.start);
    out.extend_from_slice(line);
    out.extend_from_slice(&rules.reset);
    Cow::Owned(out)
}
