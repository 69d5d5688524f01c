use agent_docs_core::inject::{
    inject_index, inject_into_file, InjectError, SECTION_END, SECTION_START,
};
use std::fs;
use tempfile::tempdir;

const INDEX: &str = "[Next.js Docs Index]|root: ./.agent-docs/nextjs\n|01-app:{index.mdx}";

#[test]
fn test_inject_appends_section_to_manifest_without_one() {
    let manifest = "# Agents\n\nBe nice.";
    let out = inject_index(manifest, INDEX).unwrap();
    assert_eq!(
        out,
        format!("# Agents\n\nBe nice.\n\n{SECTION_START}\n{INDEX}\n{SECTION_END}\n")
    );
}

#[test]
fn test_inject_into_empty_manifest() {
    let out = inject_index("", INDEX).unwrap();
    assert_eq!(out, format!("{SECTION_START}\n{INDEX}\n{SECTION_END}\n"));
}

#[test]
fn test_inject_replaces_existing_section_and_preserves_surroundings() {
    let manifest = format!("intro\n{SECTION_START}\nold index\n{SECTION_END}\noutro\n");
    let out = inject_index(&manifest, INDEX).unwrap();
    assert_eq!(out, format!("intro\n{SECTION_START}\n{INDEX}\n{SECTION_END}\noutro\n"));

    let again = inject_index(&out, INDEX).unwrap();
    assert_eq!(again, out, "re-injecting the same index is a no-op");
}

#[test]
fn test_inject_rejects_index_with_sentinel() {
    let bad = format!("{INDEX}\n{SECTION_END}");
    assert!(matches!(inject_index("", &bad), Err(InjectError::SentinelInIndex)));
}

#[test]
fn test_inject_rejects_unbalanced_manifest() {
    let manifest = format!("intro\n{SECTION_START}\nno end");
    assert!(matches!(
        inject_index(&manifest, INDEX),
        Err(InjectError::UnbalancedSentinels)
    ));
    let reversed = format!("{SECTION_END}\n{SECTION_START}\n");
    assert!(matches!(
        inject_index(&reversed, INDEX),
        Err(InjectError::UnbalancedSentinels)
    ));
}

#[test]
fn test_inject_into_file_creates_missing_manifest() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("AGENTS.md");
    inject_into_file(&path, INDEX).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(INDEX));
    assert!(content.starts_with(SECTION_START));
}
