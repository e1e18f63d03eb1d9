use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback may be given as `{{ env.VAR | default("value") }}`;
/// it is used when the variable is unset. A placeholder without a fallback
/// whose variable is unset is an error. Comment lines are passed through
/// unchanged so commented-out secrets do not fail the load.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| {
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("placeholder pattern is valid")
    });

    let mut missing: Option<String> = None;

    let expanded: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_owned();
            }

            re.replace_all(line, |caps: &Captures<'_>| {
                let var = &caps[1];
                match std::env::var(var) {
                    Ok(value) => value,
                    Err(_) => match caps.get(2) {
                        Some(fallback) => fallback.as_str().to_owned(),
                        None => {
                            missing.get_or_insert_with(|| var.to_owned());
                            String::new()
                        }
                    },
                }
            })
            .into_owned()
        })
        .collect();

    if let Some(var) = missing {
        anyhow::bail!("environment variable not found: `{var}`");
    }

    let mut output = expanded.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
