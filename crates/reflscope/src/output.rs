use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use reflscope_schema::AssemblySnapshot;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SnapshotOutput<'a> {
    assembly_name: &'a str,
    timestamp: &'a str,
    type_count: usize,
    received_at: String,
    snapshot: &'a AssemblySnapshot,
}

pub fn print_snapshot(snapshot: &AssemblySnapshot, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SnapshotOutput {
                assembly_name: &snapshot.assembly_name,
                timestamp: &snapshot.timestamp,
                type_count: snapshot.types.len(),
                received_at: now_unix_seconds(),
                snapshot,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!(
                "assembly {} (timestamp {}, {} types)",
                display_or_dash(&snapshot.assembly_name),
                display_or_dash(&snapshot.timestamp),
                snapshot.types.len()
            );
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "TYPE", "NAMESPACE", "KIND", "BASE", "FIELDS", "METHODS", "PROPS",
                ]);
            for ty in &snapshot.types {
                table.add_row(vec![
                    ty.name.clone(),
                    display_or_dash(&ty.namespace),
                    ty.kind().label().to_string(),
                    display_or_dash(&ty.base_type),
                    ty.fields.len().to_string(),
                    ty.methods.len().to_string(),
                    ty.properties.len().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "assembly {} @ {}",
                display_or_dash(&snapshot.assembly_name),
                display_or_dash(&snapshot.timestamp)
            );
            for ty in &snapshot.types {
                let qualifier = if ty.full_name.is_empty() {
                    ty.name.clone()
                } else {
                    ty.full_name.clone()
                };
                println!("  {} {}", ty.kind().label(), qualifier);
                if !ty.base_type.is_empty() {
                    println!("    : {}", ty.base_type);
                }
                for field in &ty.fields {
                    println!(
                        "    field {}: {}{}",
                        field.name,
                        field.field_type,
                        flag_suffix(&[
                            ("public", field.is_public),
                            ("static", field.is_static),
                            ("readonly", field.is_read_only),
                        ])
                    );
                }
                for method in &ty.methods {
                    let params: Vec<String> = method
                        .parameters
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.parameter_type))
                        .collect();
                    println!(
                        "    method {}({}) -> {}{}",
                        method.name,
                        params.join(", "),
                        method.return_type,
                        flag_suffix(&[
                            ("public", method.is_public),
                            ("static", method.is_static),
                        ])
                    );
                }
                for prop in &ty.properties {
                    println!(
                        "    prop {}: {}{}",
                        prop.name,
                        prop.property_type,
                        flag_suffix(&[("get", prop.can_read), ("set", prop.can_write)])
                    );
                }
            }
        }
        OutputFormat::Raw => {
            // The snapshot alone, wire-shaped key names.
            println!(
                "{}",
                serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn flag_suffix(flags: &[(&str, bool)]) -> String {
    let set: Vec<&str> = flags
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" [{}]", set.join(", "))
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_suffix_lists_only_set_flags() {
        assert_eq!(flag_suffix(&[("a", false), ("b", false)]), "");
        assert_eq!(flag_suffix(&[("a", true), ("b", false)]), " [a]");
        assert_eq!(flag_suffix(&[("a", true), ("b", true)]), " [a, b]");
    }

    #[test]
    fn empty_strings_display_as_dash() {
        assert_eq!(display_or_dash(""), "-");
        assert_eq!(display_or_dash("NS"), "NS");
    }
}
