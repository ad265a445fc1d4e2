use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::path::PathBuf;
use regex::{Captures, Regex};

/// Loads mail bodies from the configured template directory.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    dir: Option<PathBuf>,
}

impl TemplateLoader {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Read `<template_dir>/<name>`, substituting `vars` when given.
    pub async fn load(&self, name: &str, vars: Option<&HashMap<String, String>>) -> Result<String> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| anyhow!("paths.template_dir is not configured"))?;
        let path = dir.join(name);
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read template '{}'", path.display()))?;

        Ok(match vars {
            Some(vars) => render_template(&content, vars),
            None => content,
        })
    }
}

/// Substitute `${name}` and `$name` placeholders.
/// Unknown names are left as written and `$$` yields a literal `$`.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let re = Regex::new(r"\$(?:(\$)|\{([_A-Za-z][_A-Za-z0-9]*)\}|([_A-Za-z][_A-Za-z0-9]*))")
        .expect("static regex");

    re.replace_all(template, |caps: &Captures| {
        if caps.get(1).is_some() {
            return "$".to_string();
        }
        let name = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()).unwrap_or_default();
        vars.get(name)
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
