use go2md_flowdoc::{
    process_dir, FlowDocConfig, FlowDocError, FlowRenderer, OutlineRenderer, Rendering,
    RunSettings, RunSummary,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn settings_for(dir: &Path, project_root: &Path, search_roots: Vec<PathBuf>) -> RunSettings {
    let config = FlowDocConfig {
        project_root: Some(project_root.to_path_buf()),
        search_roots,
        include_gopath: false,
        include_goroot: false,
        ..FlowDocConfig::default()
    };
    config.resolve(dir).unwrap()
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const BLA_GO: &str = "package bla

// Bla does X.
//
// flow:
//     in -> [foo] -> out
func Bla() {
\tfoo()
}

func foo() {}

func bar() {}
";

#[test]
fn test_documents_single_flow() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("bla.go"), BLA_GO);

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            flows: 1,
            parts: 3,
            documents_written: 1,
            documents_failed: 0,
        }
    );

    let markdown = fs::read_to_string(temp.path().join("bla.md")).unwrap();
    assert_eq!(
        markdown,
        "# Flow Documentation For File: bla.go\n\n\
         ## Flow: Bla\n\
         Bla does X.\n\n\
         ![Flow: Bla](./Bla.svg)\n\n\
         Components | Data\n\
         ---------- | -----\n\
         [foo](bla.go#L11-L11) | \n\n"
    );

    let svg = fs::read_to_string(temp.path().join("Bla.svg")).unwrap();
    assert!(svg.contains("in -&gt; [foo] -&gt; out"));
}

#[test]
fn test_flows_in_one_document_link_to_each_other() {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("chain.go"),
        "package chain

// First starts.
//
// flow:
//     in -> [Second] -> out
//
// Trailing words.
func First() {}

// Second_in continues.
//
// flow:
//     in -> [helper] -> out
func Second_in() {}

func helper() {}
",
    );

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();
    assert_eq!(summary.flows, 2);
    assert_eq!(summary.documents_written, 1);

    let markdown = fs::read_to_string(temp.path().join("chain.md")).unwrap();
    assert_eq!(
        markdown,
        "# Flow Documentation For File: chain.go\n\n\
         ## Flow: First\n\
         First starts.\n\n\
         ![Flow: First](./First.svg)\n\n\
         Components | Data\n\
         ---------- | -----\n\
         [Second](#flow-second) | \n\n\
         Trailing words.\n\
         ## Flow: Second\n\
         Second_in continues.\n\n\
         ![Flow: Second](./Second.svg)\n\n\
         Components | Data\n\
         ---------- | -----\n\
         [helper](chain.go#L17-L17) | \n\n"
    );
    assert!(temp.path().join("First.svg").is_file());
    assert!(temp.path().join("Second.svg").is_file());
}

#[test]
fn test_cross_module_references() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("proj");
    let gopath = temp.path().join("gopath/src");
    fs::create_dir_all(project.join(".git")).unwrap();

    write(
        &project.join("vendor/example.com/org/util/util.go"),
        "package util

// Process runs the pipeline.
//
// flow:
//     in -> [step] -> out
func Process() {}

func step() {}

type Item struct {
\tName string
}
",
    );
    write(
        &gopath.join("github.com/o/r/data/data.go"),
        "package data\n\ntype Record struct{}\n",
    );
    write(
        &project.join("pkg/main.go"),
        "package main

import (
\t\"example.com/org/util\"
\t\"fmt\"
\trec \"github.com/o/r/data\"
)

// Run wires everything.
//
// flow:
//     (rec.Record)-> [util.Process] -> (util.Item)-> [fmt.Println] -> [missing]
func Run() {
\tfmt.Println(util.Item{}, rec.Record{})
}
",
    );

    let settings = settings_for(&project.join("pkg"), &project, vec![gopath.clone()]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();
    assert_eq!(summary.documents_written, 1);
    assert_eq!(summary.documents_failed, 0);

    let markdown = fs::read_to_string(project.join("pkg/main.md")).unwrap();
    let table = markdown
        .split_once("---------- | -----\n")
        .map(|(_, rows)| rows)
        .unwrap();
    assert_eq!(
        table,
        "missing | [rec.Record](https://github.com/o/r/blob/master/data/data.go#L3-L3)\n\
         fmt.Println | [util.Item](../vendor/example.com/org/util/util.go#L11-L13)\n\
         [util.Process](../vendor/example.com/org/util/util.md#flow-process) | \n\n"
    );
}

#[test]
fn test_local_links_outside_project() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("proj");
    let gopath = temp.path().join("gopath/src");
    write(
        &gopath.join("github.com/o/r/data/data.go"),
        "package data\n\ntype Record struct{}\n",
    );
    write(
        &project.join("main.go"),
        "package main

import \"github.com/o/r/data\"

// Run reads.
//
// flow:
//     (data.Record)-> [sink]
func Run() {}
",
    );

    let mut settings = settings_for(&project, &project, vec![gopath.clone()]);
    settings.local_links = true;
    process_dir(&settings, &OutlineRenderer).unwrap();

    let markdown = fs::read_to_string(project.join("main.md")).unwrap();
    let expected = gopath.canonicalize().unwrap().join("github.com/o/r/data/data.go");
    assert!(markdown.contains(&format!("[data.Record]({}#L3-L3)", expected.display())));
}

#[cfg(unix)]
#[test]
fn test_symlinked_search_root_links_inside_project() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("real/go/src/github.com/me/proj");
    fs::create_dir_all(project.join(".git")).unwrap();
    write(&project.join("sub/sub.go"), "package sub\n\nfunc Helper() {}\n");
    write(
        &project.join("main.go"),
        "package main

import \"github.com/me/proj/sub\"

// Run delegates.
//
// flow:
//     in -> [sub.Helper] -> out
func Run() {
\tsub.Helper()
}
",
    );
    let home = temp.path().join("home");
    std::os::unix::fs::symlink(temp.path().join("real"), &home).unwrap();

    let settings = settings_for(&project, &project, vec![home.join("go/src")]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();
    assert_eq!(summary.documents_written, 1);

    let markdown = fs::read_to_string(project.join("main.md")).unwrap();
    assert!(
        markdown.contains("[sub.Helper](sub/sub.go#L3-L3) | \n"),
        "unexpected document:\n{markdown}"
    );
}

#[test]
fn test_unparsable_import_stays_plain_text() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("proj");
    fs::create_dir_all(project.join(".git")).unwrap();
    write(&project.join("vendor/example.com/bad/bad.go"), "package bad\n\nfunc {\n");
    write(
        &project.join("main.go"),
        "package main

import \"example.com/bad\"

// Run calls into a broken package.
//
// flow:
//     in -> [bad.Thing] -> out
func Run() {}
",
    );

    let settings = settings_for(&project, &project, vec![]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();
    assert_eq!(summary.documents_written, 1);
    assert_eq!(summary.documents_failed, 0);

    let markdown = fs::read_to_string(project.join("main.md")).unwrap();
    assert!(
        markdown.ends_with("---------- | -----\nbad.Thing | \n\n"),
        "unexpected document:\n{markdown}"
    );
}

/// Rejects every flow whose name starts with `Broken`
struct PickyRenderer;

impl FlowRenderer for PickyRenderer {
    fn image_extension(&self) -> &str {
        "txt"
    }

    fn render(&self, flow: &str, name: &str) -> go2md_flowdoc::Result<Rendering> {
        if name.starts_with("Broken") {
            return Err(FlowDocError::render(name, "cannot draw this"));
        }
        Ok(Rendering {
            image: flow.as_bytes().to_vec(),
            ..Rendering::default()
        })
    }
}

#[test]
fn test_render_failure_only_aborts_its_document() {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("a.go"),
        "package demo\n\n// Broken fails.\n//\n// flow:\n//     in -> out\nfunc Broken() {}\n",
    );
    write(
        &temp.path().join("b.go"),
        "package demo\n\n// Good works.\n//\n// flow:\n//     in -> out\nfunc Good() {}\n",
    );

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    let summary = process_dir(&settings, &PickyRenderer).unwrap();

    assert_eq!(summary.flows, 2);
    assert_eq!(summary.documents_written, 1);
    assert_eq!(summary.documents_failed, 1);
    assert!(!temp.path().join("a.md").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("b.md")).unwrap(),
        "# Flow Documentation For File: b.go\n\n\
         ## Flow: Good\n\
         Good works.\n\n\
         ![Flow: Good](./Good.txt)\n\n"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("Good.txt")).unwrap(),
        "in -> out\n"
    );
}

#[test]
fn test_render_failure_keeps_earlier_sections() {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("a.go"),
        "package demo

// Good works.
//
// flow:
//     in -> out
func Good() {}

// Broken_later fails.
//
// flow:
//     in -> out
func Broken_later() {}

// After is never reached.
//
// flow:
//     in -> out
func After() {}
",
    );

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    let summary = process_dir(&settings, &PickyRenderer).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            flows: 3,
            parts: 3,
            documents_written: 0,
            documents_failed: 1,
        }
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("a.md")).unwrap(),
        "# Flow Documentation For File: a.go\n\n\
         ## Flow: Good\n\
         Good works.\n\n\
         ![Flow: Good](./Good.txt)\n\n"
    );
    assert!(temp.path().join("Good.txt").is_file());
    assert!(!temp.path().join("After.txt").exists());
}

#[test]
fn test_units_without_flows_produce_nothing() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("plain.go"), "package plain\n\nfunc Helper() {}\n");
    write(
        &temp.path().join("plain_test.go"),
        "package plain\n\n// T.\n//\n// flow:\n//     a -> b\nfunc T() {}\n",
    );

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    let summary = process_dir(&settings, &OutlineRenderer).unwrap();

    assert_eq!(summary.flows, 0);
    assert_eq!(summary.documents_written, 0);
    assert!(!temp.path().join("plain.md").exists());
    assert!(!temp.path().join("plain_test.md").exists());
}

#[test]
fn test_syntax_error_aborts_run() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("bad.go"), "package bad\n\nfunc (\n");

    let settings = settings_for(temp.path(), temp.path(), vec![]);
    assert!(matches!(
        process_dir(&settings, &OutlineRenderer),
        Err(FlowDocError::Parse(_))
    ));
}
