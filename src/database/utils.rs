use regex::Regex;
use std::sync::OnceLock;

/// Collapses whitespace and rewrites `?` placeholders to Postgres `$1, $2, ...`.
pub fn sql(query: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    re.replace_all(&cleaned, |_: &regex::Captures| {
        param_index += 1;
        format!("${}", param_index)
    })
    .into_owned()
}
