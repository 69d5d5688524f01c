use agent_docs_core::catalog::StaticChangeCatalog;
use agent_docs_core::contract::MockChangeCatalog;
use agent_docs_core::format::{format_v1, format_v2, sanitize_field, FormatVariant};
use agent_docs_core::registry::{SkillRegistry, SkillSpec};
use agent_docs_core::tree::build_tree;
use std::fs::{create_dir_all, write};
use std::path::Path;
use tempfile::tempdir;

fn nextjs(version: &str) -> SkillSpec {
    SkillSpec {
        id: "nextjs".to_string(),
        display_name: "Next.js".to_string(),
        version: version.to_string(),
        framework: None,
        priority: Vec::new(),
    }
}

fn docs_fixture(root: &Path) {
    create_dir_all(root.join("01-app/02-routing/03-deep")).unwrap();
    create_dir_all(root.join("01-app/03-empty-files/04-nested")).unwrap();
    write(root.join("01-app/index.mdx"), "# App\n\nThe App Router.").unwrap();
    write(root.join("01-app/02-routing/layouts.mdx"), "# Layouts").unwrap();
    write(root.join("01-app/02-routing/pages.md"), "# Pages").unwrap();
    write(root.join("01-app/02-routing/03-deep/too-deep.mdx"), "# Deep").unwrap();
    write(root.join("01-app/03-empty-files/04-nested/inner.md"), "# Inner").unwrap();
    write(root.join("README.md"), "# Readme").unwrap();
}

#[test]
fn test_format_v1_layout() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    docs_fixture(root);
    let tree = build_tree(root, false);

    let index = format_v1(&nextjs("14.0.0"), &tree, root);
    let lines: Vec<&str> = index.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[Next.js Docs Index]|root: ./.agent-docs/nextjs",
            "|IMPORTANT: Prefer retrieval-led reasoning over pre-training-led reasoning for Next.js tasks.",
            "|01-app:{index.mdx}",
            "|01-app/02-routing:{layouts.mdx,pages.md}",
            "|{README.md}",
        ]
    );
}

#[test]
fn test_format_v1_root_is_display_convention_not_real_path() {
    let tmp = tempdir().unwrap();
    let index = format_v1(&nextjs("14.0.0"), &[], tmp.path());
    assert!(index.starts_with("[Next.js Docs Index]|root: ./.agent-docs/nextjs\n"));
    assert!(!index.contains(&*tmp.path().to_string_lossy()));
    assert_eq!(index.lines().count(), 2);
}

#[test]
fn test_format_v2_layout_with_catalog() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    docs_fixture(root);
    let tree = build_tree(root, true);

    let mut catalog = MockChangeCatalog::new();
    catalog
        .expect_breaking_changes()
        .withf(|framework, major| framework == "nextjs" && *major == 16)
        .return_const(vec!["cookies()/headers() are now async".to_string()]);
    catalog
        .expect_new_apis()
        .withf(|framework, major| framework == "nextjs" && *major == 16)
        .return_const((1..=7).map(|i| format!("api{i}()")).collect::<Vec<_>>());

    let index = format_v2(&nextjs("16.0.0"), &tree, root, &catalog);
    let lines: Vec<&str> = index.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[Next.js Docs Index]|v16.0.0|root:./.agent-docs/nextjs",
            "|PREFER retrieval over pre-training for Next.js tasks.",
            "|BREAKING: cookies()/headers() are now async",
            "|NEW: api1()",
            "|NEW: api2()",
            "|NEW: api3()",
            "|NEW: api4()",
            "|NEW: api5()",
            "|01-app:{index}",
        ]
    );
}

#[test]
fn test_format_v2_uses_registry_framework_for_catalog_lookup() {
    let mut skill = nextjs("15.1.0");
    skill.id = "next-canary".to_string();
    skill.framework = Some("nextjs".to_string());

    let index = format_v2(&skill, &[], Path::new("/docs"), &StaticChangeCatalog::builtin());
    assert!(index.contains("|BREAKING: "), "got:\n{index}");
    assert!(index.contains("root:./.agent-docs/next-canary"));
}

#[test]
fn test_format_v2_unknown_version_has_no_release_lines() {
    let index = format_v2(
        &nextjs("canary"),
        &[],
        Path::new("/docs"),
        &StaticChangeCatalog::builtin(),
    );
    assert_eq!(index.lines().count(), 2);
}

#[test]
fn test_format_v2_framework_missing_from_catalog_has_no_release_lines() {
    let astro = SkillRegistry::builtin().skill("astro", "4.2.0");
    let index = format_v2(&astro, &[], Path::new("/docs"), &StaticChangeCatalog::builtin());
    assert!(index.starts_with("[Astro Docs Index]|v4.2.0|"));
    assert!(!index.contains("|BREAKING:"));
    assert!(!index.contains("|NEW:"));
    assert_eq!(index.lines().count(), 2);
}

#[test]
fn test_format_v2_does_not_render_extracted_content() {
    // Headings and paragraphs are collected for v2 but not part of the layout yet.
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    create_dir_all(root.join("guide")).unwrap();
    write(root.join("guide/intro.md"), "# Welcome Heading\n\nDistinctive paragraph text.").unwrap();
    let tree = build_tree(root, true);
    assert_eq!(tree[0].children[0].headings, vec!["Welcome Heading"]);

    let index = format_v2(&nextjs("1.0.0"), &tree, root, &StaticChangeCatalog::empty());
    assert!(!index.contains("Welcome Heading"));
    assert!(!index.contains("Distinctive paragraph"));
    assert!(index.ends_with("|guide:{intro}"));
}

#[test]
fn test_render_dispatches_on_variant() {
    let catalog = StaticChangeCatalog::empty();
    let v1 = FormatVariant::V1.render(&nextjs("1.0.0"), &[], Path::new("/d"), &catalog);
    let v2 = FormatVariant::V2.render(&nextjs("1.0.0"), &[], Path::new("/d"), &catalog);
    assert!(v1.contains("|IMPORTANT:"));
    assert!(v2.contains("|PREFER retrieval"));
    assert_eq!(FormatVariant::V1.header_floor(), 3);
    assert_eq!(FormatVariant::V2.header_floor(), 5);
}

#[test]
fn test_format_variant_from_str() {
    assert_eq!(FormatVariant::from("v1"), FormatVariant::V1);
    assert_eq!(FormatVariant::from("semantic"), FormatVariant::V2);
    assert_eq!(FormatVariant::from("bogus"), FormatVariant::V2);
}

#[test]
fn test_sanitize_field_breaks_delimiters() {
    assert_eq!(sanitize_field("a|b\nc"), "a_b_c");
    let cleaned = sanitize_field("x<!---->y");
    assert!(!cleaned.contains("<!--"));
    assert!(!cleaned.contains("-->"));
    assert_eq!(sanitize_field("<Form> component"), "<Form> component");
}
