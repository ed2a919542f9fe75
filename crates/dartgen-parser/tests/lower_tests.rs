//! Tests for the domain model produced by lowering: lookup helpers, parent
//! merge semantics and import heuristics.

use std::path::Path;

use dartgen_parser::{Directive, SourceFile, parse_source};

fn parse(text: &str) -> SourceFile {
    parse_source(text, Path::new("lib/model/item.dart")).expect("input should parse")
}

#[test]
fn file_path_is_preserved_for_diagnostics() {
    let file = parse("class Item {}\n");
    assert_eq!(file.file_path, Path::new("lib/model/item.dart"));
    assert!(file.ensure_final_newline);
}

#[test]
fn class_lookup_ignores_generic_markers() {
    let file = parse("abstract class Cache<T> {\n  int capacity = 16;\n}\n");
    assert!(file.get_class_by_name("Cache").is_some());
    assert!(file.get_class_by_name("Cache<T>").is_some());
    assert!(file.get_class_by_name("Missing").is_none());
}

#[test]
fn mutable_lookup_allows_in_place_edits() {
    let mut file = parse("class Item {\n  int a = 1;\n}\n");
    file.get_class_by_name_mut("Item")
        .expect("class exists")
        .member_variables
        .clear();
    assert!(file.classes[0].member_variables.is_empty());
}

#[test]
fn parent_merge_appends_without_deduplication() {
    let file = parse(
        "class Parent {\n  String id = '';\n  int a = 1;\n}\n\
         class Child extends Parent {\n  String id = '';\n  int b = 2;\n}\n",
    );
    let parent = file.get_class_by_name("Parent").unwrap().clone();
    let mut child = file.get_class_by_name("Child").unwrap().clone();

    child.extend_variables(&parent);
    let names: Vec<&str> = child
        .member_variables
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    // Own fields first, then every parent field, duplicates included.
    assert_eq!(names, vec!["id", "b", "id", "a"]);
}

#[test]
fn has_field_matches_exact_names() {
    let file = parse("class Item {\n  DateTime created = DateTime.now();\n}\n");
    let class = &file.classes[0];
    assert!(class.has_field("created"));
    assert!(!class.has_field("create"));
}

#[test]
fn find_import_for_class_matches_filename_component() {
    let file = parse(
        "import 'package:repository/model/abstract_item.dart';\n\
         import 'package:repository/model/inventory.dart';\n\
         import 'package:util/helpers.dart';\n\
         class Inventory extends Item {}\n",
    );
    // `abstract_item.dart` contains `item` so the shorter class name matches
    // it; the heuristic is a candidate, not a guarantee.
    assert_eq!(
        file.find_import_for_class("Item"),
        Some("package:repository/model/abstract_item.dart")
    );
    assert_eq!(
        file.find_import_for_class("Inventory"),
        Some("package:repository/model/inventory.dart")
    );
    assert_eq!(file.find_import_for_class("Nothing"), None);
}

#[test]
fn find_import_is_case_insensitive() {
    let file = parse("import 'package:repository/model/household.dart';\nclass A {}\n");
    assert_eq!(
        file.find_import_for_class("Household"),
        Some("package:repository/model/household.dart")
    );
}

#[test]
fn static_modifier_merges_into_function_return_type() {
    let file = parse(
        "class Item {\n\
           static Item parse(String raw) {\n\
             return Item();\n\
           }\n\
         }\n",
    );
    let func = &file.classes[0].functions[0];
    assert_eq!(func.return_type, "static Item");
    assert_eq!(func.name, "parse");
}

#[test]
fn directives_and_annotations_coexist_on_one_field() {
    let file = parse(
        "class Item {\n\
           @JsonKey(ignore: true)\n\
           String session = ''; // directive:transient\n\
         }\n",
    );
    let var = &file.classes[0].member_variables[0];
    assert_eq!(var.annotations, vec!["@JsonKey(ignore: true)"]);
    assert!(var.has_directive(Directive::Transient));
    assert!(!var.has_directive(Directive::Unique));
}

#[test]
fn property_directive_strips_the_backing_underscore() {
    let file = parse(
        "class Item {\n\
           late String _title; // directive:property\n\
           String _plain = '';\n\
           int _ = 0; // directive:property\n\
         }\n",
    );
    let vars = &file.classes[0].member_variables;
    assert_eq!(vars[0].name, "title");
    assert!(vars[0].has_directive(Directive::Property));
    // Without the directive the underscore is part of the name.
    assert_eq!(vars[1].name, "_plain");
    // A bare underscore has nothing left to expose; it stays as written.
    assert_eq!(vars[2].name, "_");
}

#[test]
fn class_body_starts_empty_after_lowering() {
    let file = parse("class Item {\n  int a = 1;\n}\n");
    assert!(file.classes[0].class_body.is_empty());
}
