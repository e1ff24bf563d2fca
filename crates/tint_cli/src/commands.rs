//! Subcommand implementations
//!
//! Every command reads the theme document from disk, runs one engine
//! operation, and writes the document back when it changed. Output goes to
//! the supplied writer so tests can capture it.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use tint_theme::{
    rgb_triple_to_hex, schema, variables::is_valid_variable_name, DomSnapshot, ScopeResolver,
    StyleTree, ThemeSession, VariableMap,
};

use crate::cli::{Command, OverridesAction};
use crate::config::{TintConfig, CONFIG_FILE};

/// Resolved project paths and settings
pub struct Project {
    pub config: TintConfig,
    pub config_path: PathBuf,
    pub theme_path: PathBuf,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self> {
        let config = TintConfig::load_from_dir(root)?;
        let config_path = if root.is_file() {
            root.to_path_buf()
        } else {
            root.join(CONFIG_FILE)
        };
        let theme_path = config.theme_path(root);
        Ok(Self {
            config,
            config_path,
            theme_path,
        })
    }

    fn read_theme(&self) -> Result<ThemeSession> {
        if !self.theme_path.exists() {
            bail!(
                "No theme document at {}. Run `tint init` to create one.",
                self.theme_path.display()
            );
        }
        let css = fs::read_to_string(&self.theme_path)
            .with_context(|| format!("Failed to read {}", self.theme_path.display()))?;
        Ok(ThemeSession::new(css))
    }

    fn write_theme(&self, session: &ThemeSession) -> Result<()> {
        if let Some(parent) = self.theme_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.theme_path, session.css())
            .with_context(|| format!("Failed to write {}", self.theme_path.display()))?;
        info!("Updated {}", self.theme_path.display());
        Ok(())
    }
}

pub fn run(project: &Project, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Init { force } => init(project, force, out),
        Command::Vars { all } => vars(project, all, out),
        Command::Get { name } => get(project, &name, out),
        Command::SetColor { name, hex } => set_color(project, &name, &hex),
        Command::Set { name, value } => set_value(project, &name, &value),
        Command::Overrides { action } => overrides(project, action, out),
        Command::Inspect {
            snapshot,
            select,
            scoped,
            json,
        } => inspect(project, &snapshot, &select, scoped, json, out),
    }
}

fn init(project: &Project, force: bool, out: &mut impl Write) -> Result<()> {
    if project.theme_path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            project.theme_path.display()
        );
    }
    project.write_theme(&ThemeSession::new(VariableMap::new().serialize()))?;
    writeln!(out, "Created {}", project.theme_path.display())?;

    if !project.config_path.exists() {
        fs::write(&project.config_path, project.config.to_toml()?)
            .with_context(|| format!("Failed to write {}", project.config_path.display()))?;
        writeln!(out, "Created {}", project.config_path.display())?;
    }
    Ok(())
}

fn vars(project: &Project, all: bool, out: &mut impl Write) -> Result<()> {
    let session = project.read_theme()?;
    let parsed = session.variables();

    for entry in schema::entries() {
        let value = parsed.get(entry.name).unwrap_or(entry.default);
        writeln!(out, "--{}: {}", entry.name, value)?;
    }
    if all {
        for (name, value) in parsed.iter() {
            if !schema::is_schema_variable(name) {
                writeln!(out, "--{}: {}", name, value)?;
            }
        }
    }
    Ok(())
}

fn get(project: &Project, name: &str, out: &mut impl Write) -> Result<()> {
    let session = project.read_theme()?;
    let name = name.trim_start_matches("--");

    let (name, value) = match session.value(name) {
        Some(value) => (name.to_string(), value),
        None => {
            let color = schema::color_variable_name(name);
            match session.value(&color) {
                Some(value) => (color, value),
                None => bail!("Unknown variable '{}'", name),
            }
        }
    };

    writeln!(out, "{value}")?;
    let is_color = schema::entry(&name).is_some_and(|e| e.is_color_triple())
        || schema::VariableFamily::of(&name) == Some(schema::VariableFamily::Color);
    if is_color {
        let hex = rgb_triple_to_hex(&value);
        if !hex.is_empty() {
            writeln!(out, "{hex}")?;
        }
    }
    Ok(())
}

fn set_color(project: &Project, name: &str, hex: &str) -> Result<()> {
    if tint_theme::hex_to_rgb_triple(hex).is_none() {
        bail!("Invalid hex color '{}'", hex);
    }
    let mut session = project.read_theme()?;
    session.update_color(name, hex);
    project.write_theme(&session)
}

fn set_value(project: &Project, name: &str, value: &str) -> Result<()> {
    let bare = name.trim_start_matches("--");
    if !is_valid_variable_name(bare) {
        bail!("Invalid variable name '{}'", name);
    }
    let mut session = project.read_theme()?;
    session.update_value(bare, value);
    project.write_theme(&session)
}

fn overrides(project: &Project, action: OverridesAction, out: &mut impl Write) -> Result<()> {
    let mut session = project.read_theme()?;
    match action {
        OverridesAction::List => {
            let rules = session.override_rules();
            if rules.is_empty() {
                writeln!(out, "No override rules")?;
            }
            for rule in rules {
                writeln!(out, "{rule}")?;
            }
            Ok(())
        }
        OverridesAction::Upsert {
            selector,
            properties,
        } => {
            session.upsert_override(&selector, &properties);
            project.write_theme(&session)
        }
        OverridesAction::Delete { selector } => {
            let selector = selector.trim();
            if !session.override_rules().iter().any(|r| r.selector == selector) {
                bail!("No override rule for '{}'", selector);
            }
            session.delete_override(selector);
            project.write_theme(&session)
        }
    }
}

fn inspect(
    project: &Project,
    snapshot: &Path,
    select: &str,
    scoped: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let text = fs::read_to_string(snapshot)
        .with_context(|| format!("Failed to read {}", snapshot.display()))?;
    let dom = DomSnapshot::from_json(&text)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
    let node = dom
        .query_selector(select)
        .with_context(|| format!("Invalid selector '{}'", select))?
        .with_context(|| format!("No element matches '{}'", select))?;

    // Override rules are optional context: no theme document means none
    let document = if project.theme_path.exists() {
        project.read_theme()?.into_css()
    } else {
        String::new()
    };

    let resolver = ScopeResolver::with_config(&dom, project.config.resolver.clone());
    let path = resolver.element_path(node);
    let variables = if scoped {
        resolver.scoped_variables(&resolver.selection_path(node))
    } else {
        resolver.element_variables(node)
    };
    let rules = resolver.matching_override_rules(node, &document);

    if json {
        let overrides: Vec<_> = rules
            .iter()
            .map(|r| serde_json::json!({ "selector": r.selector, "properties": r.properties }))
            .collect();
        let report = serde_json::json!({
            "element": dom.tag_name(node),
            "path": path,
            "variables": variables,
            "overrides": overrides,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "{path}")?;
    writeln!(out)?;
    if variables.is_empty() {
        writeln!(out, "No theme variables in scope")?;
    } else {
        writeln!(out, "Variables:")?;
        for var in &variables {
            if var.value == var.computed_value {
                writeln!(out, "  {}: {}", var.name, var.value)?;
            } else {
                writeln!(
                    out,
                    "  {}: {} (computed: {})",
                    var.name, var.value, var.computed_value
                )?;
            }
        }
    }
    if !rules.is_empty() {
        writeln!(out)?;
        writeln!(out, "Override rules:")?;
        for rule in &rules {
            writeln!(out, "  {rule}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tint_theme::OVERRIDE_MARKER;

    fn exec(project: &Project, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(project, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn project(dir: &Path) -> Project {
        Project::load(dir).unwrap()
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        exec(&project, Command::Init { force: false }).unwrap();
        assert!(exec(&project, Command::Init { force: false }).is_err());
        exec(&project, Command::Init { force: true }).unwrap();

        let css = fs::read_to_string(&project.theme_path).unwrap();
        assert_eq!(css, VariableMap::new().serialize());
        let reloaded = TintConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(reloaded, project.config);
    }

    #[test]
    fn test_commands_require_theme() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let err = exec(&project, Command::Vars { all: false }).unwrap_err();
        assert!(err.to_string().contains("tint init"));
    }

    #[test]
    fn test_edit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        exec(&project, Command::Init { force: false }).unwrap();

        exec(
            &project,
            Command::Overrides {
                action: OverridesAction::Upsert {
                    selector: ".btn".into(),
                    properties: "color: red".into(),
                },
            },
        )
        .unwrap();
        exec(
            &project,
            Command::SetColor {
                name: "primary".into(),
                hex: "#ff8040".into(),
            },
        )
        .unwrap();
        exec(
            &project,
            Command::Set {
                name: "--oui-rounded".into(),
                value: "7px".into(),
            },
        )
        .unwrap();

        let css = fs::read_to_string(&project.theme_path).unwrap();
        assert!(css.contains(OVERRIDE_MARKER));
        assert!(css.contains("--oui-rounded: 7px;"));

        let got = exec(&project, Command::Get { name: "primary".into() }).unwrap();
        assert_eq!(got, "255 128 64\n#ff8040\n");
        let got = exec(&project, Command::Get { name: "oui-rounded".into() }).unwrap();
        assert_eq!(got, "7px\n");

        let listed = exec(
            &project,
            Command::Overrides {
                action: OverridesAction::List,
            },
        )
        .unwrap();
        assert_eq!(listed, ".btn { color: red }\n");

        exec(
            &project,
            Command::Overrides {
                action: OverridesAction::Delete {
                    selector: ".btn".into(),
                },
            },
        )
        .unwrap();
        let css = fs::read_to_string(&project.theme_path).unwrap();
        assert!(!css.contains(OVERRIDE_MARKER));
    }

    #[test]
    fn test_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        exec(&project, Command::Init { force: false }).unwrap();

        let bad_hex = Command::SetColor {
            name: "primary".into(),
            hex: "#nothex".into(),
        };
        assert!(exec(&project, bad_hex).is_err());
        let bad_name = Command::Set {
            name: "a; b".into(),
            value: "1".into(),
        };
        assert!(exec(&project, bad_name).is_err());
        let missing = Command::Overrides {
            action: OverridesAction::Delete {
                selector: ".nope".into(),
            },
        };
        assert!(exec(&project, missing).is_err());
        assert!(exec(&project, Command::Get { name: "nope-x".into() }).is_err());
    }

    #[test]
    fn test_vars_all_lists_extras() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        exec(&project, Command::Init { force: false }).unwrap();
        exec(
            &project,
            Command::Set {
                name: "oui-color-glow".into(),
                value: "1 2 3".into(),
            },
        )
        .unwrap();

        let schema_only = exec(&project, Command::Vars { all: false }).unwrap();
        assert_eq!(schema_only.lines().count(), schema::entries().len());
        assert!(!schema_only.contains("glow"));

        let all = exec(&project, Command::Vars { all: true }).unwrap();
        assert!(all.ends_with("--oui-color-glow: 1 2 3\n"));
    }

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        exec(&project, Command::Init { force: false }).unwrap();
        exec(
            &project,
            Command::Overrides {
                action: OverridesAction::Upsert {
                    selector: ".btn:hover".into(),
                    properties: "color: red".into(),
                },
            },
        )
        .unwrap();

        let snapshot = dir.path().join("dom.json");
        fs::write(
            &snapshot,
            r#"{
                "root": {"tag": "html", "children": [
                    {"tag": "body", "children": [
                        {"tag": "div", "id": "app", "style": "--oui-rounded: 2px", "children": [
                            {"tag": "button", "classes": ["btn"]}
                        ]}
                    ]}
                ]},
                "stylesheets": [{"css": ".btn { border-radius: var(--oui-rounded); }"}]
            }"#,
        )
        .unwrap();

        let text = exec(
            &project,
            Command::Inspect {
                snapshot: snapshot.clone(),
                select: ".btn".into(),
                scoped: false,
                json: false,
            },
        )
        .unwrap();
        assert_eq!(
            text,
            "#app > .btn\n\nVariables:\n  --oui-rounded: 2px\n\nOverride rules:\n  .btn:hover { color: red }\n"
        );

        let json = exec(
            &project,
            Command::Inspect {
                snapshot,
                select: "#app".into(),
                scoped: true,
                json: true,
            },
        )
        .unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["path"], "#app");
        assert_eq!(report["variables"][0]["name"], "--oui-rounded");
        assert_eq!(report["overrides"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_inspect_theme_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        let snapshot = dir.path().join("dom.json");
        fs::write(
            &snapshot,
            r#"{"root": {"tag": "html", "children": [{"tag": "body"}]}}"#,
        )
        .unwrap();
        let inspect = || Command::Inspect {
            snapshot: snapshot.clone(),
            select: "body".into(),
            scoped: false,
            json: true,
        };

        // No theme document yet: inspect still works, with no override rules
        let json = exec(&project, inspect()).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["overrides"].as_array().map(Vec::len), Some(0));

        fs::write(&project.theme_path, [0xff, 0xfe, b':', b'r', 0x80]).unwrap();
        let err = exec(&project, inspect()).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
