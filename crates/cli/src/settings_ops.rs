// Settings commands: load the file into an AppModule, act, save on mutation

use std::path::Path;

use partview_app::{AppModule, MessageType};
use partview_config::{FileStore, PropertyEnumeration, Variant};
use partview_io::Format;

use crate::CliError;

/// Print warnings and errors collected in the message log, then clear it
fn flush_messages(app: &AppModule) {
    for message in app.message_log().snapshot() {
        if matches!(message.message_type, MessageType::Warning | MessageType::Error) {
            eprintln!("{}: {}", message.message_type, message.text);
        }
    }
    app.clear_message_log();
}

fn open(path: &Path) -> Result<(AppModule, FileStore), CliError> {
    let store = FileStore::open(path)
        .map_err(|e| CliError::store(format!("cannot read {}: {}", path.display(), e)))?;
    let mut app = AppModule::new();
    app.load_settings(&store);
    flush_messages(&app);
    Ok((app, store))
}

/// Write every setting back. Keys unknown to this build are left in the file.
fn save(app: &AppModule, store: &mut FileStore) -> Result<(), CliError> {
    let report = app.save_settings(store);
    flush_messages(app);
    store
        .save()
        .map_err(|e| CliError::store(format!("cannot write {}: {}", store.path().display(), e)))?;
    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::partial(format!("{} setting(s) could not be saved", report.failures.len())))
    }
}

pub fn cmd_show(path: &Path, all: bool, json: bool) -> Result<(), CliError> {
    let (app, _) = open(path)?;
    let mut rows: Vec<(String, String)> = Vec::new();
    app.settings().root().visit_properties(|key, property| {
        if all || property.meta().user_visible {
            rows.push((key.to_string(), property.display_value()));
        }
    });

    if json {
        let object: serde_json::Map<String, serde_json::Value> = rows
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        let text = serde_json::to_string_pretty(&object).map_err(|e| CliError::partial(e.to_string()))?;
        println!("{}", text);
    } else {
        for (key, value) in rows {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

pub fn cmd_get(path: &Path, key: &str) -> Result<(), CliError> {
    let (app, _) = open(path)?;
    if let Some(property) = app.settings().find_property(key) {
        println!("{}", property.display_value());
        return Ok(());
    }
    // A group prints all of its properties
    let group = app.settings().find_group(key).ok_or_else(|| CliError::unknown_key(key))?;
    group.visit_properties(|name, property| println!("{} = {}", name, property.display_value()));
    Ok(())
}

/// Turn user text into a variant for the setting at `key`
fn parse_value(app: &AppModule, key: &str, text: &str) -> Result<Variant, CliError> {
    if let Some(item) = app
        .settings()
        .property::<PropertyEnumeration>(key)
        .and_then(|p| p.enumeration().find_by_name(text.trim()))
    {
        return Ok(Variant::Enum(item.value));
    }
    let current = app
        .setting_variant(key)
        .ok_or_else(|| CliError::unknown_key(key))?
        .map_err(|e| CliError::invalid_value(format!("{}: {}", key, e)))?;
    current
        .parse_like(text)
        .ok_or_else(|| CliError::invalid_value(format!("cannot read '{}' as a {} value", text, current.type_name())))
}

pub fn cmd_set(path: &Path, key: &str, text: &str) -> Result<(), CliError> {
    let (mut app, mut store) = open(path)?;
    let variant = parse_value(&app, key, text)?;
    match app.set_setting(key, &variant) {
        Ok(true) => {}
        Ok(false) => return Err(CliError::unknown_key(key)),
        Err(e) => return Err(CliError::invalid_value(format!("{}: {}", key, e))),
    }
    save(&app, &mut store)?;
    log::debug!("Set {} = {}", key, variant);
    Ok(())
}

pub fn cmd_reset(path: &Path, group: Option<&str>) -> Result<(), CliError> {
    let (mut app, mut store) = open(path)?;
    match group {
        Some(group) => {
            if !app.settings_mut().reset_group(group) {
                return Err(CliError::unknown_key(group));
            }
        }
        None => app.settings_mut().reset_all(),
    }
    save(&app, &mut store)
}

/// Reader/writer parameter groups of `format`, registered by this build or
/// present in the settings file
fn parameter_groups(app: &AppModule, store: &FileStore, format: Format) -> Vec<&'static str> {
    let in_file = |kind: &str| {
        let prefix = format!("io/{}/{}/", format.id(), kind);
        store.entries().iter().any(|(key, _)| key.starts_with(&prefix))
    };
    let mut groups = Vec::new();
    if app.settings().find_reader_parameters(format.id()).is_some() || in_file("reader") {
        groups.push("reader");
    }
    if app.settings().find_writer_parameters(format.id()).is_some() || in_file("writer") {
        groups.push("writer");
    }
    groups
}

pub fn cmd_formats(path: &Path) -> Result<(), CliError> {
    let (app, store) = open(path)?;
    for format in Format::ALL {
        let groups = parameter_groups(&app, &store, format);
        let line = format!(
            "{:<6} {:<22} {:<28} {}",
            format.id(),
            format.name(),
            format.file_suffixes().join(", "),
            groups.join(", ")
        );
        println!("{}", line.trim_end());
    }
    Ok(())
}
