use anyhow::{Context, Result};
use log::{debug, info, warn};
use mhtml_decode::{DecodedPart, Snapshot};
use std::fs;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

pub const MANIFEST: &str = "manifest.tsv";

/// Decode a snapshot and write each part into the output directory.
/// Nothing is written if the snapshot cannot be decoded.
/// Blank parts are skipped. Returns the number of parts written.
pub fn unpack<R: BufRead>(reader: R, output: &Path) -> Result<usize> {
    let snapshot = Snapshot::from_reader(reader).context("Cannot decode snapshot")?;
    fs::create_dir_all(output)
        .with_context(|| format!("Cannot create output directory {}", output.display()))?;
    let manifest_path = output.join(MANIFEST);
    let file = File::create(&manifest_path)
        .with_context(|| format!("Cannot create {}", manifest_path.display()))?;
    let mut manifest = BufWriter::new(file);
    let mut written = 0;
    for (index, part) in snapshot.iter().enumerate() {
        if part.is_blank() {
            debug!("Skipping blank part {}", index);
            continue;
        }
        if part.location().is_empty() {
            warn!("Part {} has no Content-Location", index);
        }
        let name = file_name(index, part);
        let path = output.join(&name);
        fs::write(&path, part.data())
            .with_context(|| format!("Cannot write {}", path.display()))?;
        writeln!(
            manifest,
            "{}\t{}\t{}\t{}",
            index,
            name,
            part.content_type(),
            part.location()
        )?;
        info!("{} -> {} ({} bytes)", part.location(), name, part.data().len());
        written += 1;
    }
    manifest.flush()?;
    Ok(written)
}

// Derive a file name from the last path segment of the part location
fn file_name(index: usize, part: &DecodedPart) -> String {
    let location = part.location();
    let path = location
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let path = path.split_once("://").map_or(path, |(_, rest)| {
        rest.split_once('/').map_or("", |(_, p)| p)
    });
    let segment = path.rsplit('/').next().unwrap_or_default();
    let mut name: String = segment
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    name = name.trim_start_matches('.').to_owned();
    if name.is_empty() {
        name = "part".to_owned();
    }
    if !name.contains('.') {
        if let Some(ext) = part.mime_type().as_deref().and_then(extension) {
            name.push('.');
            name.push_str(ext);
        }
    }
    format!("{:03}-{}", index, name)
}

fn extension(mime_type: &str) -> Option<&'static str> {
    let ext = match mime_type {
        "text/html" => "html",
        "text/css" => "css",
        "text/plain" => "txt",
        "text/javascript" | "application/javascript" => "js",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "image/webp" => "webp",
        "font/woff2" => "woff2",
        _ => return None,
    };
    Some(ext)
}
