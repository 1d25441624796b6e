//! End-to-end tests: workbooks on disk -> generator -> files on disk

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use sheetconf::prelude::*;
use sheetconf::report::Event;
use sheetconf::{CellValue, MoveConfig};

/// Write a workbook whose sheets are given as rows of cells
fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<CellValue>>)]) {
    let mut workbook = Workbook::empty();
    for (title, rows) in sheets {
        let sheet = workbook.push_worksheet(title).unwrap();
        for (row, values) in rows.iter().enumerate() {
            sheet
                .set_row_values(row as u32, values.iter().cloned())
                .unwrap();
        }
    }
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    XlsxWriter::write_file(&workbook, path).unwrap();
}

fn row<const N: usize>(cells: [CellValue; N]) -> Vec<CellValue> {
    cells.to_vec()
}

fn item_sheet() -> Vec<Vec<CellValue>> {
    vec![
        row(["id".into(), "!cost".into(), "$displayName".into()]),
        row(["int".into(), "int".into(), "string".into()]),
        row(["Id".into(), "Price".into(), "Name".into()]),
        row([1.into(), 5.into(), "Sword".into()]),
    ]
}

fn skill_sheet() -> Vec<Vec<CellValue>> {
    vec![
        row(["key".into(), "power".into(), "#design note".into(), "effects".into()]),
        row(["string".into(), "float".into(), "".into(), "json".into()]),
        row([]),
        row([
            "fireball".into(),
            2.5.into(),
            "too strong?".into(),
            r#"{"burn":3}"#.into(),
        ]),
    ]
}

struct Project {
    _tmp: tempfile::TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("excel")).unwrap();
        Self { _tmp: tmp, root }
    }

    fn input(&self) -> PathBuf {
        self.root.join("excel")
    }

    fn output(&self) -> PathBuf {
        self.root.join("out")
    }

    fn config(&self) -> Config {
        Config::new(self.input(), self.output())
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.output().join(relative)).unwrap()
    }
}

/// Every file below `dir` with its content, sorted by path
fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push((path.clone(), fs::read(&path).unwrap()));
            }
        }
    }
    files.sort();
    files
}

#[test]
fn test_item_scenario() {
    let project = Project::new();
    write_workbook(
        &project.input().join("items.xlsx"),
        &[("#Item", item_sheet())],
    );

    let summary = Generator::new(project.config())
        .run(&mut MemoryReporter::new())
        .unwrap();

    assert_eq!(summary.sheets, vec!["Item".to_string()]);
    assert_eq!(summary.files_written, 6 + 6);

    assert_eq!(
        project.read("client/json/Item.json"),
        r#"{"1":{"id":1,"displayName":"Sword"}}"#
    );
    assert_eq!(
        project.read("server/json/Item.json"),
        r#"{"1":{"id":1,"cost":5}}"#
    );
    assert_eq!(project.read("client/json/init.json"), r#"{"Item":true}"#);
    assert_eq!(project.read("server/json/init.json"), r#"{"Item":true}"#);

    assert_eq!(
        project.read("server/lua/Item.lua"),
        "return {\n\t[1] = {\n\t\tid = 1,\n\t\tcost = 5,\n\t},\n}"
    );
    assert_eq!(
        project.read("client/lua/init.lua"),
        "return {\n\tItem = true,\n}"
    );
    assert_eq!(
        project.read("client/xml/Item.xml"),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<xml><1><id>1</id><displayName>Sword</displayName></1></xml>"
    );
}

#[test]
fn test_multiple_workbooks_and_skipped_sheets() {
    let project = Project::new();
    write_workbook(
        &project.input().join("b_skills.xlsx"),
        &[("#Skill", skill_sheet()), ("scratch", item_sheet())],
    );
    write_workbook(
        &project.input().join("nested").join("a_items.xlsx"),
        &[("#Item", item_sheet())],
    );
    // Office lock files are never opened
    fs::write(project.input().join("~$b_skills.xlsx"), "locked").unwrap();

    let mut reporter = MemoryReporter::new();
    let summary = Generator::new(project.config()).run(&mut reporter).unwrap();

    assert_eq!(summary.sheets, vec!["Skill".to_string(), "Item".to_string()]);
    assert!(!project.output().join("client/json/scratch.json").exists());
    assert_eq!(
        project.read("server/json/Skill.json"),
        r#"{"fireball":{"key":"fireball","power":2.5,"effects":{"burn":3}}}"#
    );
    assert_eq!(
        project.read("server/json/init.json"),
        r#"{"Skill":true,"Item":true}"#
    );

    let workbooks: Vec<&Event> = reporter
        .events()
        .iter()
        .filter(|e| matches!(e, Event::WorkbookStarted { .. }))
        .collect();
    assert_eq!(workbooks.len(), 2);
    assert!(matches!(
        reporter.events().last(),
        Some(Event::RunCompleted { sheets: 2, .. })
    ));
}

#[test]
fn test_event_sequence() {
    let project = Project::new();
    write_workbook(
        &project.input().join("items.xlsx"),
        &[("#Item", item_sheet())],
    );
    let mut config = project.config();
    config.formats = vec![Format::Json];

    let mut reporter = MemoryReporter::new();
    Generator::new(config).run(&mut reporter).unwrap();

    assert_eq!(
        reporter.untimed(),
        vec![
            Event::RunStarted {
                input: project.input()
            },
            Event::WorkbookStarted {
                file: project.input().join("items.xlsx")
            },
            Event::FormatWritten {
                sheet: "Item".into(),
                format: Format::Json,
                elapsed: Default::default(),
            },
            Event::SheetExported {
                name: "Item".into(),
                file: project.input().join("items.xlsx"),
                rows: 1,
            },
            Event::ManifestWritten {
                target: Target::Client,
                format: Format::Json,
                sheets: 1,
            },
            Event::ManifestWritten {
                target: Target::Server,
                format: Format::Json,
                sheets: 1,
            },
            Event::RunCompleted {
                sheets: 1,
                files_written: 4,
                elapsed: Default::default(),
            },
        ]
    );
    assert!(!project.output().join("client/lua").exists());
}

#[test]
fn test_reruns_are_byte_identical() {
    let project = Project::new();
    write_workbook(
        &project.input().join("items.xlsx"),
        &[("#Item", item_sheet()), ("#Skill", skill_sheet())],
    );
    let generator = Generator::new(project.config());

    generator.run(&mut MemoryReporter::new()).unwrap();
    let first = snapshot(&project.output());
    generator.run(&mut MemoryReporter::new()).unwrap();
    let second = snapshot(&project.output());

    assert_eq!(first.len(), 2 * 3 * 3);
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_sheet_name_aborts_the_run() {
    let project = Project::new();
    write_workbook(&project.input().join("a.xlsx"), &[("#Item", item_sheet())]);
    write_workbook(&project.input().join("b.xlsx"), &[("#Item", item_sheet())]);

    let mut reporter = MemoryReporter::new();
    let err = Generator::new(project.config())
        .run(&mut reporter)
        .unwrap_err();

    match err {
        Error::DuplicateSheetName {
            name,
            first,
            second,
        } => {
            assert_eq!(name, "Item");
            assert_eq!(first, project.input().join("a.xlsx"));
            assert_eq!(second, project.input().join("b.xlsx"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!project.output().exists());
    assert!(matches!(
        reporter.events().last(),
        Some(Event::RunFailed { .. })
    ));
}

#[test]
fn test_duplicate_id_aborts_the_run() {
    let project = Project::new();
    let mut rows = item_sheet();
    rows.push(row([1.into(), 7.into(), "Axe".into()]));
    write_workbook(&project.input().join("items.xlsx"), &[("#Item", rows)]);

    let err = Generator::new(project.config())
        .run(&mut MemoryReporter::new())
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateId { .. }));
    assert!(err.to_string().contains("items.xlsx"));
}

#[test]
fn test_failed_run_leaves_previous_output_untouched() {
    let project = Project::new();
    let workbook = project.input().join("items.xlsx");
    write_workbook(&workbook, &[("#Item", item_sheet())]);
    let generator = Generator::new(project.config());
    generator.run(&mut MemoryReporter::new()).unwrap();
    let before = snapshot(&project.output());

    // A later sheet in the same workbook breaks; the valid one must not be
    // rewritten either
    let mut broken = skill_sheet();
    broken.push(row(["icebolt".into(), 1.into(), "".into(), "{oops".into()]));
    let mut changed_items = item_sheet();
    changed_items[3][2] = "Great Sword".into();
    write_workbook(
        &workbook,
        &[("#Item", changed_items), ("#Skill", broken)],
    );

    let err = generator.run(&mut MemoryReporter::new()).unwrap_err();

    assert!(matches!(err, Error::InvalidJson { ref key, .. } if key == "effects"));
    assert_eq!(snapshot(&project.output()), before);
}

#[test]
fn test_move_merges_into_destinations() {
    let project = Project::new();
    write_workbook(
        &project.input().join("items.xlsx"),
        &[("#Item", item_sheet())],
    );
    let client_dest = project.root.join("game").join("config");
    let server_dest = project.root.join("server");
    fs::create_dir_all(&client_dest).unwrap();
    fs::write(client_dest.join("handwritten.lua"), "return {}").unwrap();
    fs::write(client_dest.join("Item.lua"), "stale").unwrap();

    let mut config = project.config();
    config.move_to = Some(MoveConfig {
        client: Some([(Format::Lua, vec![client_dest.clone()])].into_iter().collect()),
        server: Some([(Format::Json, vec![server_dest.clone()])].into_iter().collect()),
    });

    let mut reporter = MemoryReporter::new();
    Generator::new(config).run(&mut reporter).unwrap();

    assert_eq!(
        fs::read_to_string(client_dest.join("handwritten.lua")).unwrap(),
        "return {}"
    );
    assert_eq!(
        fs::read_to_string(client_dest.join("Item.lua")).unwrap(),
        project.read("client/lua/Item.lua")
    );
    assert!(client_dest.join("init.lua").is_file());
    assert_eq!(
        fs::read_to_string(server_dest.join("Item.json")).unwrap(),
        r#"{"1":{"id":1,"cost":5}}"#
    );

    let moves: Vec<&Event> = reporter
        .events()
        .iter()
        .filter(|e| matches!(e, Event::MoveCompleted { .. }))
        .collect();
    assert_eq!(
        moves,
        vec![
            &Event::MoveCompleted {
                target: Target::Client,
                destinations: 1
            },
            &Event::MoveCompleted {
                target: Target::Server,
                destinations: 1
            },
        ]
    );
}

#[test]
fn test_config_file_drives_the_run() {
    let project = Project::new();
    write_workbook(
        &project.input().join("items.xlsx"),
        &[("#Item", item_sheet())],
    );
    let config_path = project.root.join("config.json");
    fs::write(
        &config_path,
        r#"{"input": "excel", "output": "out", "formats": ["lua"]}"#,
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    Generator::new(config)
        .run(&mut MemoryReporter::new())
        .unwrap();

    assert!(project.output().join("server/lua/Item.lua").is_file());
    assert!(!project.output().join("server/json").exists());
}
