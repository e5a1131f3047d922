use crate::message::ArgValue;

/// Substitutes `{name}` placeholders in `tmpl`.
///
/// Arguments are applied in order and each replaces only the first remaining
/// occurrence of its token. Arguments without a matching token are ignored.
pub(crate) fn apply_args<'a, I>(tmpl: &str, args: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a ArgValue)>,
{
    let mut out = tmpl.to_string();
    if !out.contains('{') {
        return out;
    }

    let mut token = String::new();
    for (name, value) in args {
        token.clear();
        token.push('{');
        token.push_str(name);
        token.push('}');

        if let Some(pos) = out.find(token.as_str()) {
            out.replace_range(pos..pos + token.len(), &value.to_string());
        }
    }
    out
}
