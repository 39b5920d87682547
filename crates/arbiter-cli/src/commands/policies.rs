use arbiter_policy::PolicyRegistry;

pub fn list(selected: &str) -> anyhow::Result<()> {
    let registry = PolicyRegistry::with_defaults();
    print!("{}", format_policies(&registry, selected));
    Ok(())
}

fn format_policies(registry: &PolicyRegistry, selected: &str) -> String {
    let mut out = String::new();
    for name in registry.names() {
        let marker = if name == selected { "*" } else { " " };
        let default = if name == registry.default_name() { " (default)" } else { "" };
        out.push_str(&format!("{marker} {name}{default}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_selected_and_default() {
        let out = format_policies(&PolicyRegistry::with_defaults(), "proportion");
        assert_eq!(out, "* proportion (default)\n");
    }

    #[test]
    fn unknown_selection_marks_nothing() {
        let out = format_policies(&PolicyRegistry::with_defaults(), "drf");
        assert!(!out.contains('*'));
    }
}
