//! Page generation: feeds Markdown files through the converter and writes
//! finished pages built from an HTML template.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Config, TemplateConfig};
use crate::error::SiteError;

/// Counts reported after a full site build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub assets: usize,
}

/// Clear the output directory, copy static assets, then generate every page.
pub fn build_site(config: &Config) -> Result<BuildSummary, SiteError> {
    let paths = &config.paths;
    clear_directory(&paths.output)?;
    let assets = copy_directory(&paths.static_dir, &paths.output)?;
    let pages = generate_all_pages(
        &paths.content,
        &paths.template,
        &paths.output,
        &config.site.base_path,
        &config.template,
    )?;
    info!(pages, assets, output = %paths.output.display(), "site built");
    Ok(BuildSummary { pages, assets })
}

/// Fill the template with a page title and body, then point root-relative
/// links at `base_path`. Each placeholder is replaced once.
pub fn render_page(
    template: &str,
    title: &str,
    content: &str,
    base_path: &str,
    placeholders: &TemplateConfig,
) -> String {
    for placeholder in [&placeholders.title_placeholder, &placeholders.content_placeholder] {
        if !template.contains(placeholder.as_str()) {
            warn!(placeholder = %placeholder, "template is missing a placeholder");
        }
    }

    template
        .replacen(&placeholders.title_placeholder, title, 1)
        .replacen(&placeholders.content_placeholder, content, 1)
        .replace("href=\"/", &format!("href=\"{base_path}"))
        .replace("src=\"/", &format!("src=\"{base_path}"))
}

/// Convert one Markdown file and write it as `dest_dir/index.html`.
pub fn generate_page(
    source: &Path,
    template_path: &Path,
    dest_dir: &Path,
    base_path: &str,
    placeholders: &TemplateConfig,
) -> Result<PathBuf, SiteError> {
    info!(
        from = %source.display(),
        to = %dest_dir.display(),
        template = %template_path.display(),
        "generating page"
    );

    let markdown = read(source)?;
    let page_error = |source_err| SiteError::Page {
        path: source.to_path_buf(),
        source: source_err,
    };
    let title = crate::extract_title(&markdown).map_err(page_error)?;
    let content = crate::markdown_to_html(&markdown).map_err(page_error)?;

    let template = read(template_path)?;
    let page = render_page(&template, &title, &content, base_path, placeholders);

    create_dir(dest_dir)?;
    let dest = dest_dir.join("index.html");
    fs::write(&dest, page).map_err(|source| SiteError::Write {
        path: dest.clone(),
        source,
    })?;
    Ok(dest)
}

/// Generate a page for every `.md` file under `content_dir`, mirroring each
/// file's parent directory under `dest_dir`. Returns the number of pages.
pub fn generate_all_pages(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
    base_path: &str,
    placeholders: &TemplateConfig,
) -> Result<usize, SiteError> {
    let sources = find_markdown_files(content_dir)?;
    for source in &sources {
        let relative = source
            .parent()
            .and_then(|parent| parent.strip_prefix(content_dir).ok())
            .unwrap_or_else(|| Path::new(""));
        generate_page(
            source,
            template_path,
            &dest_dir.join(relative),
            base_path,
            placeholders,
        )?;
    }
    Ok(sources.len())
}

/// All Markdown files below `dir`, in sorted order.
pub fn find_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut files = Vec::new();
    collect_markdown_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SiteError> {
    for path in list_dir(dir)? {
        if path.is_dir() {
            collect_markdown_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    Ok(())
}

/// Remove everything inside `path`, keeping the directory itself.
pub fn clear_directory(path: &Path) -> Result<(), SiteError> {
    if !path.exists() {
        return Ok(());
    }
    for child in list_dir(path)? {
        let removed = if child.is_dir() {
            fs::remove_dir_all(&child)
        } else {
            fs::remove_file(&child)
        };
        removed.map_err(|source| SiteError::Write {
            path: child.clone(),
            source,
        })?;
    }
    debug!(path = %path.display(), "cleared directory");
    Ok(())
}

/// Recursively copy `source` into `target`. Returns the number of files copied.
pub fn copy_directory(source: &Path, target: &Path) -> Result<usize, SiteError> {
    if !source.exists() {
        warn!(path = %source.display(), "static directory does not exist, nothing copied");
        return Ok(0);
    }
    create_dir(target)?;

    let mut copied = 0;
    for from in list_dir(source)? {
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = target.join(name);
        if from.is_dir() {
            copied += copy_directory(&from, &to)?;
        } else {
            debug!(from = %from.display(), to = %to.display(), "copying");
            fs::copy(&from, &to).map_err(|source| SiteError::Write {
                path: to.clone(),
                source,
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let read_err = |source| SiteError::Read {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()).map_err(read_err))
        .collect()
}

fn read(path: &Path) -> Result<String, SiteError> {
    fs::read_to_string(path).map_err(|source| SiteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), SiteError> {
    fs::create_dir_all(path).map_err(|source| SiteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"<html><head><title>{{ Title }}</title><link href="/index.css" rel="stylesheet"></head><body>{{ Content }}</body></html>"#;

    #[test]
    fn render_page_fills_placeholders() {
        let page = render_page(
            TEMPLATE,
            "Home",
            "<div><p>hi</p></div>",
            "/",
            &TemplateConfig::default(),
        );
        assert_eq!(
            page,
            r#"<html><head><title>Home</title><link href="/index.css" rel="stylesheet"></head><body><div><p>hi</p></div></body></html>"#
        );
    }

    #[test]
    fn render_page_rewrites_root_relative_links() {
        let page = render_page(
            TEMPLATE,
            "Home",
            r#"<div><p><a href="/blog">b</a><img src="/a.png" alt="a"></img><a href="https://x.dev">x</a></p></div>"#,
            "/site/",
            &TemplateConfig::default(),
        );
        assert!(page.contains(r#"href="/site/index.css""#));
        assert!(page.contains(r#"<a href="/site/blog">"#));
        assert!(page.contains(r#"src="/site/a.png""#));
        assert!(page.contains(r#"href="https://x.dev""#));
    }

    #[test]
    fn render_page_replaces_each_placeholder_once() {
        let page = render_page(
            "{{ Title }} {{ Title }}",
            "T",
            "",
            "/",
            &TemplateConfig::default(),
        );
        assert_eq!(page, "T {{ Title }}");
    }

    #[test]
    fn render_page_custom_placeholders() {
        let placeholders = TemplateConfig {
            title_placeholder: "%TITLE%".to_string(),
            content_placeholder: "%BODY%".to_string(),
        };
        assert_eq!(
            render_page("<h1>%TITLE%</h1>%BODY%", "T", "<p>b</p>", "/", &placeholders),
            "<h1>T</h1><p>b</p>"
        );
    }

    #[test]
    fn copy_missing_directory_copies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            copy_directory(&dir.path().join("nope"), &dir.path().join("out")).unwrap(),
            0
        );
    }

    #[test]
    fn clear_directory_keeps_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("a.html"), "a").unwrap();
        fs::write(root.join("nested/b.html"), "b").unwrap();

        clear_directory(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }
}
