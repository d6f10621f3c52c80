//! File-level extraction and rebuild flows
//!
//! Ties the pieces together: read a container (from a file or an archive
//! entry), hand it to one of the external representations, and push edited
//! text back, preferring the in-place archive fast path. Every flow
//! validates fully before the first destructive write.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::archive::{self, Archive, ReplaceOutcome};
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::locale::{ContainerFile, Locale};
use crate::message::MessageContainer;

/// Parse a container file and write it out in the chosen representation.
///
/// For [`ExportFormat::Tree`] the output path is a directory; for the
/// document formats the extension is appended to it.
///
/// # Errors
///
/// Propagates parse, codec and IO errors.
pub fn extract_container(
    container_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    table_names: Option<Vec<String>>,
    locale: Locale,
    format: ExportFormat,
) -> Result<()> {
    let container_path = container_path.as_ref();
    info!(container = %container_path.display(), %locale, %format, "extracting container");

    let blob = fs::read(container_path)?;
    let container = MessageContainer::parse_named(&blob, locale, table_names)?;
    write_representation(&container, out_path.as_ref(), format)
}

/// Read back a container from any of the external representations.
///
/// # Errors
///
/// Propagates the format-specific import errors.
pub fn import_representation(
    path: impl AsRef<Path>,
    locale: Locale,
    format: ExportFormat,
) -> Result<MessageContainer> {
    match format {
        ExportFormat::Tree => export::import_tree(path, locale),
        ExportFormat::Json => export::import_json(path, locale),
        ExportFormat::Xml => export::import_xml(path, locale),
    }
}

/// Rebuild a container file from an external representation.
///
/// # Errors
///
/// Propagates import, codec and IO errors.
pub fn rebuild_container(
    input_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    locale: Locale,
    format: ExportFormat,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let container = import_representation(input_path, locale, format)?;
    let blob = container.encode()?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_path, blob)?;

    info!(out = %out_path.display(), "rebuilt container");
    Ok(())
}

/// Rebuild a container from a representation and place it back into its
/// archive entry, rebuilding the whole archive only if the slot overflows.
///
/// # Errors
///
/// Propagates import and codec errors, and the archive validation,
/// capacity and IO errors of [`archive::replace_entry`].
pub fn replace_in_archive(
    input_path: impl AsRef<Path>,
    archive_dir: impl AsRef<Path>,
    toc_names: &[String],
    file: ContainerFile,
    locale: Locale,
    format: ExportFormat,
) -> Result<ReplaceOutcome> {
    let container = import_representation(input_path, locale, format)?;
    let blob = container.encode()?;
    let entry_name = file.file_name(locale);

    info!(entry = %entry_name, size = blob.len(), "replacing archive entry");
    archive::replace_entry(archive_dir, toc_names, &entry_name, &blob)
}

/// Extract every text container of a locale from an archive directory into
/// the chosen representation, one output per container.
///
/// # Errors
///
/// Propagates archive validation, parse and IO errors.
pub fn extract_locale_containers(
    archive_dir: impl AsRef<Path>,
    toc_names: &[String],
    table_names: Option<Vec<String>>,
    locale: Locale,
    out_dir: impl AsRef<Path>,
    format: ExportFormat,
) -> Result<()> {
    let out_dir = out_dir.as_ref();
    let archive = Archive::open(archive_dir, toc_names)?;
    let config = locale.config();

    let mut entry_names = vec![config.message_file_name()];
    entry_names.extend(config.event_file_names());

    fs::create_dir_all(out_dir)?;
    for entry_name in entry_names {
        let blob = archive.read(&entry_name)?;
        let container = MessageContainer::parse_named(&blob, locale, table_names.clone())?;
        let stem = entry_name.split('.').next().unwrap_or(&entry_name);
        write_representation(&container, &out_dir.join(stem), format)?;
    }

    Ok(())
}

fn write_representation(
    container: &MessageContainer,
    out_path: &Path,
    format: ExportFormat,
) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    match format {
        ExportFormat::Tree => export::export_tree(container, out_path),
        ExportFormat::Json => {
            export::export_json(container, out_path.with_extension("json"))
        }
        ExportFormat::Xml => export::export_xml(container, out_path.with_extension("xml")),
    }
}
