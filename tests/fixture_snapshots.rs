//! End-to-end fixture runs checked against inline snapshots

use flex_layout::layout::Direction;
use flex_layout::{run, run_with_format, OutputFormat, Settings};

fn viewport(width: f32, height: f32) -> Settings {
    Settings {
        width: Some(width),
        height: Some(height),
        ..Settings::default()
    }
}

#[test]
fn test_row_with_padding_tree_dump() {
    let dump = run_with_format(
        r#"
        node root [flex-direction: row, width: 100, height: 40, padding: 5] {
            node a [flex-grow: 1]
            node b [width: 30, margin-left: 5]
        }
        "#,
        &Settings::default(),
        OutputFormat::Tree,
    )
    .unwrap();

    insta::assert_snapshot!(dump, @r###"
    <div layout="width: 100; height: 40; top: 0; left: 0;" style="flex-direction: row; padding-all: 5px; width: 100px; height: 40px; " >
      <div layout="width: 55; height: 30; top: 5; left: 5;" style="flex-grow: 1; " ></div>
      <div layout="width: 30; height: 30; top: 5; left: 65;" style="margin-left: 5px; width: 30px; " ></div>
    </div>
    "###);
}

#[test]
fn test_wrapped_text_and_absolute_badge() {
    let report = run(
        r#"
        node root [width: 100, height: 100, align-items: flex-start] {
            text label "hello world"
            node badge [position: absolute, right: 0, top: 0, width: 10, height: 10]
        }
        "#,
        &Settings::default(),
    )
    .unwrap();

    insta::assert_snapshot!(report, @r###"
    root: left 0, top 0, width 100, height 100
    label: left 0, top 0, width 100, height 20
    badge: left 90, top 0, width 10, height 10
    "###);
}

#[test]
fn test_rtl_row() {
    let settings = Settings {
        direction: Direction::Rtl,
        ..viewport(100.0, 20.0)
    };
    let report = run(
        "node root [flex-direction: row] { node a [width: 30] node b [width: 20] }",
        &settings,
    )
    .unwrap();

    insta::assert_snapshot!(report, @r###"
    root: left 0, top 0, width 100, height 20
    a: left 70, top 0, width 30, height 20
    b: left 50, top 0, width 20, height 20
    "###);
}

#[test]
fn test_display_none_subtree_is_zeroed() {
    let report = run(
        r#"
        node root [flex-direction: row] {
            node hidden [display: none, width: 40] { node inner [width: 10, height: 10] }
            node shown [width: 40]
        }
        "#,
        &viewport(100.0, 30.0),
    )
    .unwrap();

    insta::assert_snapshot!(report, @r###"
    root: left 0, top 0, width 100, height 30
    hidden: left 0, top 0, width 0, height 0
    inner: left 0, top 0, width 0, height 0
    shown: left 0, top 0, width 40, height 30
    "###);
}

#[test]
fn test_wrapping_lines_with_align_content_center() {
    let report = run(
        r#"
        node root [flex-direction: row, flex-wrap: wrap, align-content: center] {
            node a [width: 60, height: 20]
            node b [width: 60, height: 20]
            node c [width: 30, height: 10]
        }
        "#,
        &viewport(100.0, 100.0),
    )
    .unwrap();

    insta::assert_snapshot!(report, @r###"
    root: left 0, top 0, width 100, height 100
    a: left 0, top 30, width 60, height 20
    b: left 0, top 50, width 60, height 20
    c: left 60, top 50, width 30, height 10
    "###);
}
