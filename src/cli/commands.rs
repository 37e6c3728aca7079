//! Command execution. All output goes to the writer passed in.

use std::io::Write;
use std::path::Path;

use anyhow::{
    Context as _,
    bail,
};

use super::Commands;
use crate::config::TranseditSettings;
use crate::document::{
    GenerateOptions,
    TranslationDocument,
    search,
    stats,
    to_document_json,
    to_locale_json,
};
use crate::input::{
    infer_language_from_filename,
    parse_optional_locale_json,
    read_locale_file,
};
use crate::review::ReviewService;
use crate::share::{
    BlobService,
    share_id_url,
    share_url,
};
use crate::store::{
    SnapshotStore,
    StoredProject,
};

/// Run one command against `service`.
///
/// # Errors
/// Any failure of the command, with context for the user.
pub async fn execute<S: SnapshotStore, B: BlobService>(
    command: Commands,
    service: &mut ReviewService<S>,
    blobs: &B,
    settings: &TranseditSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Create { source, target, source_lang, target_lang, title, id } => {
            let request = CreateRequest { source: &source, target: target.as_deref(), source_lang, target_lang };
            let doc = create(service, settings, request, title.as_deref(), id.as_deref())?;
            writeln!(out, "Created {}", doc.id)?;
            write_summary(out, &doc)?;
        }
        Commands::Import { file } => {
            let doc = service
                .import_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            writeln!(out, "Imported {}", doc.id)?;
            write_summary(out, &doc)?;
        }
        Commands::List => {
            for project in service.list()? {
                write_row(out, &project)?;
            }
        }
        Commands::Show { id } => {
            let doc = service.open(&id)?;
            write_summary(out, &doc)?;
            for key in doc.keys() {
                let marker = if doc.translation(key).trim().is_empty() { "[ ]" } else { "[x]" };
                writeln!(out, "{marker} {key}")?;
            }
        }
        Commands::Stats { id, json } => {
            let stats = stats(&service.open(&id)?);
            if json {
                writeln!(out, "{}", serde_json::to_string(&stats)?)?;
            } else {
                writeln!(out, "{}/{} ({}%)", stats.translated, stats.total, stats.percent)?;
            }
        }
        Commands::Translate { id, key, value } => {
            let doc = service.translate(&id, &key, &value)?;
            write_summary(out, &doc)?;
        }
        Commands::Search { id, query } => {
            let doc = service.open(&id)?;
            for key in search(&doc, &query) {
                writeln!(out, "{key}\t{}\t{}", doc.source.get(key).map_or("", String::as_str), doc.translation(key))?;
            }
        }
        Commands::Export { id, document, locale: _, output } => {
            let doc = service.open(&id)?;
            let json = if document { to_document_json(&doc)? } else { to_locale_json(&doc.target)? };
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{json}\n"))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => writeln!(out, "{json}")?,
            }
        }
        Commands::Share { id, upload } => {
            let url = if upload {
                let remote_id = service.share_upload(blobs, &id).await?;
                share_id_url(&settings.share_base_url, &remote_id)?
            } else {
                share_url(&settings.share_base_url, &service.open(&id)?)?
            };
            writeln!(out, "{url}")?;
        }
        Commands::Open { link } => {
            let doc = service.open_link(blobs, &link).await?;
            writeln!(out, "Opened {}", doc.id)?;
            write_summary(out, &doc)?;
        }
        Commands::Snapshot { id, note } => {
            let snapshot = service.snapshot(&id, note)?;
            writeln!(out, "{}", snapshot.id)?;
        }
        Commands::Snapshots { id } => {
            for snapshot in service.snapshots(&id)? {
                let stamp = snapshot.at.to_rfc3339();
                writeln!(out, "{}\t{stamp}\t{}", snapshot.id, snapshot.note.unwrap_or_default())?;
            }
        }
        Commands::Restore { id, snapshot_id } => {
            let doc = service.restore(&id, &snapshot_id)?;
            writeln!(out, "Restored {snapshot_id}")?;
            write_summary(out, &doc)?;
        }
        Commands::Delete { id } => {
            service.delete(&id)?;
            writeln!(out, "Deleted {id}")?;
        }
    }
    Ok(())
}

/// Locale files and language hints given to `create`.
struct CreateRequest<'a> {
    source: &'a Path,
    target: Option<&'a Path>,
    source_lang: Option<String>,
    target_lang: Option<String>,
}

/// Languages come from the flags, then the file names, then the settings
/// (source only).
fn create<S: SnapshotStore>(
    service: &mut ReviewService<S>,
    settings: &TranseditSettings,
    request: CreateRequest<'_>,
    title: Option<&str>,
    id: Option<&str>,
) -> anyhow::Result<TranslationDocument> {
    let source_value = read_locale_file(request.source)?;
    let target_value = request.target.map(read_optional_locale).transpose()?.flatten();
    let source_lang = request
        .source_lang
        .or_else(|| infer_language_from_filename(request.source))
        .unwrap_or_else(|| settings.default_source_language.clone());
    let Some(target_lang) =
        request.target_lang.or_else(|| request.target.and_then(infer_language_from_filename))
    else {
        bail!("Cannot tell the target language; pass --target-lang");
    };

    let options = GenerateOptions::new(&source_value, &source_lang, &target_lang)
        .with_target(target_value.as_ref())
        .with_id(id)
        .with_title(title);
    Ok(service.create(options)?)
}

/// Target locale files may be empty, meaning nothing translated yet.
fn read_optional_locale(path: &Path) -> anyhow::Result<Option<serde_json::Value>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_optional_locale_json(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// `<title> (<id>)` and the progress line.
fn write_summary(out: &mut impl Write, doc: &TranslationDocument) -> std::io::Result<()> {
    let stats = stats(doc);
    writeln!(out, "{} ({})", doc.meta.display_title(), doc.id)?;
    writeln!(out, "{}/{} translated ({}%)", stats.translated, stats.total, stats.percent)
}

/// One `list` line: id, title, progress and last update.
fn write_row(out: &mut impl Write, project: &StoredProject) -> std::io::Result<()> {
    let stats = stats(&project.clone().into_document());
    writeln!(
        out,
        "{}\t{}\t{}%\t{}",
        project.id,
        project.meta.display_title(),
        stats.percent,
        project.updated_at.to_rfc3339()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::flat::unflatten;
    use crate::share::MemoryBlobService;
    use crate::store::MemoryStore;
    use crate::test_utils::fixed_time;

    struct Harness {
        service: ReviewService<MemoryStore>,
        blobs: MemoryBlobService,
        settings: TranseditSettings,
        temp_dir: TempDir,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                service: ReviewService::with_clock(MemoryStore::new(), fixed_time),
                blobs: MemoryBlobService::new(),
                settings: TranseditSettings::default(),
                temp_dir: TempDir::new().unwrap(),
            }
        }

        fn write(&self, name: &str, content: &str) -> std::path::PathBuf {
            let path = self.temp_dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        async fn run(&mut self, command: Commands) -> anyhow::Result<String> {
            let mut out = Vec::new();
            execute(command, &mut self.service, &self.blobs, &self.settings, &mut out).await?;
            Ok(String::from_utf8(out).unwrap())
        }

        async fn create(&mut self) {
            let source = self.write("en.json", r#"{ "a": { "b": "Hello" }, "c": "Bye" }"#);
            let target = self.write("ko.json", r#"{ "a": { "b": "안녕" } }"#);
            self.run(Commands::Create {
                source,
                target: Some(target),
                source_lang: None,
                target_lang: None,
                title: None,
                id: Some("p1".to_string()),
            })
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_infers_languages() {
        let mut h = Harness::new();

        h.create().await;

        let doc = h.service.open("p1").unwrap();
        assert_eq!(doc.meta.source_language_code, "en");
        assert_eq!(doc.meta.target_language_code, "ko");
    }

    #[tokio::test]
    async fn test_create_without_target_language_fails() {
        let mut h = Harness::new();
        let source = h.write("strings.json", r#"{ "a": "Hi" }"#);

        let result = h
            .run(Commands::Create {
                source,
                target: None,
                source_lang: None,
                target_lang: None,
                title: None,
                id: None,
            })
            .await;

        assert_that!(result, err(displays_as(contains_substring("--target-lang"))));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_create_with_empty_target_file() {
        let mut h = Harness::new();
        let source = h.write("en.json", r#"{ "a": "Hi" }"#);
        let target = h.write("ja.json", "");

        let out = h
            .run(Commands::Create {
                source,
                target: Some(target),
                source_lang: None,
                target_lang: None,
                title: Some("Landing".to_string()),
                id: Some("p2".to_string()),
            })
            .await
            .unwrap();

        expect_that!(out, contains_substring("Landing (p2)"));
        expect_that!(out, contains_substring("0/1 translated (0%)"));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_stats_and_show() {
        let mut h = Harness::new();
        h.create().await;

        let stats = h.run(Commands::Stats { id: "p1".to_string(), json: true }).await.unwrap();
        let show = h.run(Commands::Show { id: "p1".to_string() }).await.unwrap();

        expect_that!(stats.trim(), eq(r#"{"total":2,"translated":1,"percent":50}"#));
        expect_that!(show, contains_substring("[x] a.b"));
        expect_that!(show, contains_substring("[ ] c"));
    }

    #[tokio::test]
    async fn test_translate_then_export_locale() {
        let mut h = Harness::new();
        h.create().await;
        h.run(Commands::Translate { id: "p1".to_string(), key: "c".to_string(), value: "잘가".to_string() })
            .await
            .unwrap();

        let out = h
            .run(Commands::Export { id: "p1".to_string(), document: false, locale: false, output: None })
            .await
            .unwrap();

        let exported: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(exported, json!({ "a": { "b": "안녕" }, "c": "잘가" }));
        assert_eq!(exported, unflatten(&h.service.open("p1").unwrap().target));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_export_document_to_file_and_import() {
        let mut h = Harness::new();
        h.create().await;
        let path = h.temp_dir.path().join("p1.transedit");

        h.run(Commands::Export {
            id: "p1".to_string(),
            document: true,
            locale: false,
            output: Some(path.clone()),
        })
        .await
        .unwrap();
        h.run(Commands::Delete { id: "p1".to_string() }).await.unwrap();
        let out = h.run(Commands::Import { file: path }).await.unwrap();

        expect_that!(out, contains_substring("Imported p1"));
        expect_that!(out, contains_substring("1/2 translated (50%)"));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_share_link_opens_elsewhere() {
        let mut h = Harness::new();
        h.create().await;
        let link = h.run(Commands::Share { id: "p1".to_string(), upload: false }).await.unwrap();

        let mut other = Harness::new();
        let out = other.run(Commands::Open { link: link.trim().to_string() }).await.unwrap();

        expect_that!(link, starts_with("https://transedit.app/review#data="));
        expect_that!(out, contains_substring("Opened p1"));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_share_upload_prints_share_id_link() {
        let mut h = Harness::new();
        h.create().await;

        let link = h.run(Commands::Share { id: "p1".to_string(), upload: true }).await.unwrap();

        expect_that!(link, starts_with("https://transedit.app/review?shareId="));
        assert_eq!(h.blobs.len().await, 1);
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_search_lists_matches() {
        let mut h = Harness::new();
        h.create().await;

        let out = h.run(Commands::Search { id: "p1".to_string(), query: "안녕".to_string() }).await.unwrap();

        expect_that!(out.trim(), eq("a.b\tHello\t안녕"));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_snapshot_restore() {
        let mut h = Harness::new();
        h.create().await;
        let snapshot_id =
            h.run(Commands::Snapshot { id: "p1".to_string(), note: None }).await.unwrap().trim().to_string();
        h.run(Commands::Translate { id: "p1".to_string(), key: "a.b".to_string(), value: "x".to_string() })
            .await
            .unwrap();

        let listed = h.run(Commands::Snapshots { id: "p1".to_string() }).await.unwrap();
        h.run(Commands::Restore { id: "p1".to_string(), snapshot_id: snapshot_id.clone() }).await.unwrap();

        expect_that!(listed, starts_with(snapshot_id.as_str()));
        expect_that!(h.service.open("p1").unwrap().translation("a.b"), eq("안녕"));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_list_rows() {
        let mut h = Harness::new();
        h.create().await;

        let out = h.run(Commands::List).await.unwrap();

        expect_that!(out, starts_with("p1\ten → ko\t50%\t"));
    }

    #[tokio::test]
    async fn test_open_unknown_project_fails() {
        let mut h = Harness::new();

        let result = h.run(Commands::Show { id: "missing".to_string() }).await;

        assert_that!(result, err(displays_as(contains_substring("Project not found: missing"))));
    }
}
