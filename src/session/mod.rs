//! One conversion run.
//!
//! Phases, in order:
//!
//! 1. **Roots** - vault and project must exist
//! 2. **Target** - detect (or take) the generator, load its permalinks
//! 3. **Folders** - map vault folders to `content/`, optional clean
//! 4. **Discover** - parse notes and collect link targets (parallel)
//! 5. **Index** - merge catalog fragments, compute every note's URL
//! 6. **Validate** - report links to notes outside the run
//! 7. **Attachments** - assign names, copy
//! 8. **Link words** - build the registry
//! 9. **Rewrite** - rewrite, inject link words, render, write (parallel)
//!
//! Discovery and rewriting are the only parallel phases; everything between
//! them runs on the merged, read-only results.

mod discover;
mod error;
mod report;

pub use discover::Discovered;
pub use error::ConvertError;
pub use report::Report;

use crate::attachment::{assign_names, copy_all};
use crate::config::{FrontmatterChoice, NotepressConfig};
use crate::core::{RunMode, SsgKind};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::link::LinkCatalog;
use crate::linkword::{LinkWord, LinkWordRegistry};
use crate::logger::ProgressLine;
use crate::meta::frontmatter::{FrontmatterFormat, render};
use crate::meta::normalize::layout;
use crate::permalink::{PageInfo, PermalinkProvider, detect_ssg, provider_for};
use crate::rewrite::{Destinations, Rewriter};
use crate::utils::plural::plural_count;
use crate::vault::Vault;
use crate::{debug, log};
use anyhow::{Context, Result};
use discover::discover;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Session<'a> {
    config: &'a NotepressConfig,
    mode: RunMode,
    diag: Diagnostics,
    /// Draw progress lines (off for JSON output and tests).
    progress: bool,
}

/// Discovery results merged in note order.
struct Index {
    notes: Vec<Discovered>,
    catalog: LinkCatalog,
    /// Notes whose destination another note already took.
    shadowed: Vec<bool>,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a NotepressConfig, mode: RunMode) -> Self {
        Self {
            config,
            mode,
            diag: Diagnostics::new(),
            progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    pub fn run(self) -> Result<Report> {
        let vault_root = self.config.vault_root();
        let project = self.config.project_root();
        check_root("vault", vault_root)?;
        check_root("project", project)?;

        let ssg = match SsgKind::from_choice(self.config.project.ssg) {
            Some(ssg) => ssg,
            None => detect_ssg(project),
        };
        let format = match self.config.project.frontmatter {
            FrontmatterChoice::Auto => ssg.frontmatter(),
            FrontmatterChoice::Yaml => FrontmatterFormat::Yaml,
            FrontmatterChoice::Toml => FrontmatterFormat::Toml,
        };
        let provider = provider_for(ssg, project);
        log!(self.mode.name(); "{} -> {} ({})", vault_root.display(), project.display(), ssg.name());

        let vault = Vault::open(self.config);
        if self.mode.writes() && self.config.project.clean {
            let attachments_dir = self.config.attachment.target_dir(project);
            let removed = vault.clean(project, &[attachments_dir])?;
            log!("clean"; "{} removed", plural_count(removed, "file"));
        }

        let mut report = Report::new(ssg);
        let index = self.discover_all(&vault);
        report.notes = index.notes.len();

        let mut destinations = Destinations {
            attachment_prefix: format!("{}/", self.config.attachment.url_prefix()),
            ..Destinations::default()
        };
        for note in &index.notes {
            destinations
                .notes
                .insert(note.source.clone(), permalink(&*provider, note));
        }
        self.validate_note_links(&index.catalog, &destinations, &vault);

        let attachments = assign_names(
            index.catalog.attachments().filter_map(|l| l.source.as_deref()),
            vault_root,
            self.config.attachment.naming,
            &self.config.slug,
            &self.diag,
        );
        report.attachments = if self.mode.writes() {
            copy_all(&attachments, &self.config.attachment, project, &self.diag, self.progress)?
        } else {
            attachments.len()
        };
        destinations.attachments = attachments
            .into_iter()
            .map(|a| (a.source, a.name))
            .collect();

        let registry = self.build_registry(&index.notes, &destinations);
        report.conflicts = registry.conflicts().to_vec();

        let rewriter = Rewriter::new(&index.catalog, &destinations);
        let (converted, links_added) = self.rewrite_all(&index, &rewriter, &registry, ssg, format);
        report.converted = converted;
        report.links_added = links_added;

        report.absorb(self.diag.drain());
        Ok(report)
    }

    // ========================================================================
    // discovery
    // ========================================================================

    fn discover_all(&self, vault: &Vault) -> Index {
        let sources = vault.notes();
        log!("discover"; "{} in {}",
            plural_count(sources.len(), "note"),
            plural_count(vault.folders().len(), "folder"));

        let bar = self
            .progress
            .then(|| ProgressLine::new("discover", &[("notes", sources.len())]));
        let results: Vec<_> = sources
            .par_iter()
            .map(|source| {
                let result = discover(source, vault.root(), &self.config.slug, &self.diag);
                if let Some(bar) = &bar {
                    bar.inc("notes");
                }
                result
            })
            .collect();
        if let Some(bar) = bar {
            bar.finish();
        }

        let mut notes = Vec::with_capacity(results.len());
        let mut catalog = LinkCatalog::new();
        for result in results {
            match result {
                Ok(mut note) => {
                    catalog.merge(std::mem::take(&mut note.catalog));
                    notes.push(note);
                }
                Err(e) => {
                    let path = note_path_of(&e);
                    self.diag
                        .error(DiagnosticKind::NoteFailed, path.as_deref(), format!("{:#}", anyhow::Error::from(e)));
                }
            }
        }
        debug!("discover"; "{} distinct link targets", catalog.len());

        let shadowed = self.find_duplicate_destinations(&notes);
        Index {
            notes,
            catalog,
            shadowed,
        }
    }

    /// Mark notes whose destination an earlier note already claimed.
    fn find_duplicate_destinations(&self, notes: &[Discovered]) -> Vec<bool> {
        let mut claimed: FxHashMap<&Path, &Path> = FxHashMap::default();
        notes
            .iter()
            .map(|note| match claimed.get(note.dest.as_path()) {
                Some(first) => {
                    self.diag.warn(
                        DiagnosticKind::DuplicateDestination,
                        Some(note.source.as_path()),
                        format!(
                            "destination `{}` already taken by {}, not written",
                            note.dest.display(),
                            first.display()
                        ),
                    );
                    true
                }
                None => {
                    claimed.insert(note.dest.as_path(), note.source.as_path());
                    false
                }
            })
            .collect()
    }

    /// Warn about links to notes that are not converted.
    fn validate_note_links(&self, catalog: &LinkCatalog, destinations: &Destinations, vault: &Vault) {
        for link in catalog.notes() {
            let Some(source) = &link.source else {
                continue;
            };
            if destinations.notes.contains_key(source) {
                continue;
            }
            let reason = vault.exclusion_reason(source);
            self.diag.warn(
                DiagnosticKind::ExcludedNote,
                Some(link.referrer.as_path()),
                format!("linked note `{}` will not be converted: {}", link.uri, reason),
            );
        }
    }

    // ========================================================================
    // link words
    // ========================================================================

    fn build_registry(&self, notes: &[Discovered], destinations: &Destinations) -> LinkWordRegistry {
        let mut registry = LinkWordRegistry::new(self.config.linking.quota());
        for note in notes {
            let Some(url) = destinations.notes.get(&note.source) else {
                continue;
            };
            for word in &note.link_words {
                registry.register(
                    LinkWord {
                        word: word.clone(),
                        url: url.clone(),
                        owner: note.source.clone(),
                        priority: note.link_priority,
                    },
                    &self.diag,
                );
            }
        }
        debug!("linkword"; "{} registered, {} conflicting",
            plural_count(registry.len(), "word"),
            registry.conflicts().len());
        registry
    }

    // ========================================================================
    // rewrite
    // ========================================================================

    /// Rewrite every note; returns (notes converted, links added).
    fn rewrite_all(
        &self,
        index: &Index,
        rewriter: &Rewriter,
        registry: &LinkWordRegistry,
        ssg: SsgKind,
        format: FrontmatterFormat,
    ) -> (usize, usize) {
        let content_dir = self.config.content_dir();
        let bar = self
            .progress
            .then(|| ProgressLine::new("rewrite", &[("notes", index.notes.len())]));

        let results: Vec<Option<usize>> = index
            .notes
            .par_iter()
            .zip(index.shadowed.par_iter())
            .map(|(note, &shadowed)| {
                let result = if shadowed {
                    None
                } else {
                    self.rewrite_note(note, rewriter, registry, ssg, format, &content_dir)
                };
                if let Some(bar) = &bar {
                    bar.inc("notes");
                }
                result
            })
            .collect();
        if let Some(bar) = bar {
            bar.finish();
        }

        let converted = results.iter().filter(|r| r.is_some()).count();
        let links_added = results.iter().flatten().sum();
        (converted, links_added)
    }

    /// Rewrite, render and (in convert mode) write one note.
    ///
    /// Returns the number of link-word links added, `None` on failure.
    fn rewrite_note(
        &self,
        note: &Discovered,
        rewriter: &Rewriter,
        registry: &LinkWordRegistry,
        ssg: SsgKind,
        format: FrontmatterFormat,
        content_dir: &Path,
    ) -> Option<usize> {
        let body = rewriter.rewrite_body(&note.body);
        let (body, added) = registry.apply(&body, &note.source, &note.link_words);

        let mut meta = note.meta.clone();
        rewriter.rewrite_meta(&mut meta);
        layout(&mut meta, &note.facts, ssg);

        let rendered = match render(&meta, &body, format) {
            Ok(rendered) => rendered,
            Err(source) => {
                self.fail(ConvertError::Frontmatter {
                    path: note.source.clone(),
                    source,
                });
                return None;
            }
        };

        if self.mode.writes() {
            let dest = content_dir.join(&note.dest);
            if let Err(e) = write_file(&dest, &rendered) {
                self.fail(e);
                return None;
            }
            debug!("write"; "{} -> {}", note.source.display(), dest.display());
        }
        Some(added)
    }

    fn fail(&self, err: ConvertError) {
        let path = note_path_of(&err);
        self.diag.error(
            DiagnosticKind::NoteFailed,
            path.as_deref(),
            format!("{:#}", anyhow::Error::from(err)),
        );
    }
}

fn check_root(kind: &'static str, path: &Path) -> Result<(), ConvertError> {
    if path.as_os_str().is_empty() || !path.is_dir() {
        return Err(ConvertError::MissingRoot {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn permalink(provider: &dyn PermalinkProvider, note: &Discovered) -> String {
    provider.permalink(&PageInfo {
        rel_path: &note.dest,
        slug: &note.slug,
        title: &note.facts.title,
        date: note.facts.date,
        lang: note.facts.lang.as_deref(),
    })
}

fn note_path_of(err: &ConvertError) -> Option<PathBuf> {
    match err {
        ConvertError::MissingRoot { .. } => None,
        ConvertError::Read { path, .. }
        | ConvertError::Frontmatter { path, .. }
        | ConvertError::Write { path, .. } => Some(path.clone()),
    }
}

fn write_file(dest: &Path, content: &str) -> Result<(), ConvertError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, content)
    };
    write().map_err(|source| ConvertError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

/// Run a session, logging phases as they go.
pub fn run(config: &NotepressConfig, mode: RunMode, progress: bool) -> Result<Report> {
    let session = Session::new(config, mode);
    let session = if progress { session } else { session.quiet() };
    session
        .run()
        .with_context(|| format!("{} failed", mode.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::meta::frontmatter::parse;
    use tempfile::TempDir;

    struct Fixture {
        vault: TempDir,
        project: TempDir,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let vault = TempDir::new().unwrap();
            let project = TempDir::new().unwrap();
            for (name, body) in files {
                let path = vault.path().join(name);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, body).unwrap();
            }
            Self { vault, project }
        }

        fn config(&self) -> NotepressConfig {
            test_config(self.vault.path(), self.project.path())
        }

        fn run(&self, config: &NotepressConfig, mode: RunMode) -> Report {
            Session::new(config, mode).quiet().run().unwrap()
        }

        fn output(&self, rel: &str) -> String {
            fs::read_to_string(self.project.path().join("content").join(rel)).unwrap()
        }
    }

    #[test]
    fn test_convert_hugo() {
        let f = Fixture::new(&[
            ("notes/a.md", "---\ntitle: A\ndate: 2024-01-02\n---\nsee [[b]] and ![](img.PNG)\n"),
            ("notes/b.md", "---\ntitle: B\ndate: 2024-01-03\nlink_words: [Widget]\n---\nbody\n"),
            ("notes/img.PNG", "png"),
            ("notes/c.md", "---\ntitle: C\ndate: 2024-01-04\n---\na widget here\n"),
        ]);
        let report = f.run(&f.config(), RunMode::Convert);

        assert_eq!(report.ssg, SsgKind::Hugo);
        assert_eq!(report.notes, 3);
        assert_eq!(report.converted, 3);
        assert_eq!(report.attachments, 1);
        assert_eq!(report.links_added, 1);
        assert!(!report.has_errors(), "{:?}", report.errors);

        let a = f.output("notes/a.md");
        assert!(a.contains("see [b](/posts/b/) and ![](/attachments/notes-img.png)"), "{a}");
        let c = f.output("notes/c.md");
        assert!(c.contains("a [widget](/posts/b/) here"), "{c}");

        let doc = parse(&a).unwrap();
        assert_eq!(doc.format, Some(FrontmatterFormat::Yaml));
        assert_eq!(doc.meta.get_str("title"), Some("A"));

        assert!(f.project.path().join("static/attachments/notes-img.png").exists());
    }

    #[test]
    fn test_convert_zola() {
        let f = Fixture::new(&[
            ("blog/a.md", "---\ntitle: A\nlang: fr\ncover: b.md\n---\n[b](b.md#Intro)\n"),
            ("blog/b.md", "---\ntitle: B\n---\nbody\n"),
        ]);
        let mut config = f.config();
        config.vault.folders = vec!["blog>posts".into()];
        fs::write(f.project.path().join("config.toml"), "base_url = 'https://x.org'\n").unwrap();

        let report = f.run(&config, RunMode::Convert);
        assert_eq!(report.ssg, SsgKind::Zola);

        let a = f.output("posts/a.fr.md");
        assert!(a.starts_with("+++\n"), "{a}");
        assert!(a.contains("[b](/posts/b/#intro)"), "{a}");
        let doc = parse(&a).unwrap();
        assert!(!doc.meta.contains_key("lang"));
        let extra = doc.meta.get("extra").and_then(|v| v.as_mapping()).unwrap();
        assert_eq!(extra.get_str("cover"), Some("/posts/b/"));
    }

    #[test]
    fn test_check_writes_nothing() {
        let f = Fixture::new(&[("a.md", "[x](missing.md) [[b]]\n"), ("b.md", "b\n")]);
        let report = f.run(&f.config(), RunMode::Check);

        assert_eq!(report.notes, 2);
        assert_eq!(report.converted, 2);
        assert_eq!(
            report
                .warnings
                .iter()
                .filter(|w| w.kind == DiagnosticKind::UnresolvedLink)
                .count(),
            1
        );
        assert!(!f.project.path().join("content").exists());
    }

    #[test]
    fn test_excluded_note_link() {
        let f = Fixture::new(&[("a/one.md", "[two](../b/two.md)\n"), ("b/two.md", "two\n")]);
        let mut config = f.config();
        config.vault.folders = vec!["a>posts".into()];
        let report = f.run(&config, RunMode::Convert);

        let excluded: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.kind == DiagnosticKind::ExcludedNote)
            .collect();
        assert_eq!(excluded.len(), 1);
        assert!(excluded[0].message.contains("not in the `folders` scope"));
        assert!(f.output("posts/one.md").contains("[two](#)"));
    }

    #[test]
    fn test_note_failure_does_not_stop_batch() {
        let f = Fixture::new(&[("a.md", "---\n: [\n---\nx\n"), ("b.md", "fine\n")]);
        let report = f.run(&f.config(), RunMode::Convert);
        assert_eq!(report.notes, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, DiagnosticKind::NoteFailed);
        assert!(f.output("posts/b.md").contains("fine"));
    }

    #[test]
    fn test_code_after_unclosed_fence_untouched() {
        let f = Fixture::new(&[
            ("a.md", "~~~\nunclosed\n\n```\n[x](b.md) widget\n```\n[y](b.md)\n"),
            ("b.md", "---\nlink_words: [widget]\n---\nb\n"),
        ]);
        let report = f.run(&f.config(), RunMode::Convert);

        let a = f.output("posts/a.md");
        assert!(a.contains("```\n[x](b.md) widget\n```"), "{a}");
        assert!(a.contains("[y](/posts/b/)"), "{a}");
        assert_eq!(report.links_added, 0);
    }

    #[test]
    fn test_missing_root() {
        let f = Fixture::new(&[]);
        let config = test_config(&f.vault.path().join("nope"), f.project.path());
        let err = Session::new(&config, RunMode::Check).quiet().run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MissingRoot { kind: "vault", .. })
        ));
    }

    #[test]
    fn test_duplicate_destination() {
        let f = Fixture::new(&[
            ("x.md", "---\nslug: same\n---\none\n"),
            ("y.md", "---\nslug: same\n---\ntwo\n"),
        ]);
        let report = f.run(&f.config(), RunMode::Convert);
        assert_eq!(report.converted, 1);
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.kind == DiagnosticKind::DuplicateDestination)
        );
        assert!(f.output("posts/same.md").contains("one"));
    }
}
