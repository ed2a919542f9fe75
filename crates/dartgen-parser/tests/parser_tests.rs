//! Tests for the restricted Dart grammar: directives, classes, members,
//! opaque bodies and grammar errors.

use std::path::Path;

use dartgen_parser::{Directive, SourceFile, parse_source};

fn parse(text: &str) -> SourceFile {
    parse_source(text, Path::new("test.dart")).expect("input should parse")
}

#[test]
fn parses_imports_and_parts_into_one_set() {
    let file = parse(
        "import 'package:repository/model/item.dart';\n\
         import \"dart:convert\";\n\
         part 'item.g.dart';\n\
         class Item {}\n",
    );
    let imports: Vec<&str> = file.imports.iter().map(String::as_str).collect();
    assert_eq!(
        imports,
        vec![
            "dart:convert",
            "item.g.dart",
            "package:repository/model/item.dart",
        ]
    );
}

#[test]
fn duplicate_imports_are_deduplicated() {
    let file = parse("import 'a.dart';\nimport 'a.dart';\nclass A {}\n");
    assert_eq!(file.imports.len(), 1);
}

#[test]
fn captures_leading_comments_only_before_first_declaration() {
    let file = parse(
        "// Copyright header.\n\
         /// File docs.\n\
         import 'a.dart';\n\
         // not leading anymore\n\
         class A {}\n",
    );
    assert_eq!(
        file.leading_comments,
        vec!["// Copyright header.", "/// File docs."]
    );
}

#[test]
fn parses_fields_with_modifiers_merged_into_type() {
    let file = parse(
        "class Item {\n\
           final String title;\n\
           late int count;\n\
           static final double ratio = 0.5;\n\
           DateTime? updated;\n\
         }\n",
    );
    let class = &file.classes[0];
    let vars = &class.member_variables;
    assert_eq!(vars.len(), 4);
    assert_eq!(vars[0].ty, "final String");
    assert_eq!(vars[0].name, "title");
    assert_eq!(vars[1].ty, "late int");
    assert_eq!(vars[2].ty, "static final double");
    assert_eq!(vars[2].default_value.as_deref(), Some("0.5"));
    assert_eq!(vars[3].ty, "DateTime?");
    assert_eq!(vars[3].default_value, None);
}

#[test]
fn parses_generic_types_with_nested_arguments() {
    let file = parse("class Box {\n  Map<String, List<int>> index = {};\n}\n");
    let var = &file.classes[0].member_variables[0];
    assert_eq!(var.ty, "Map<String, List<int>>");
    assert_eq!(var.default_value.as_deref(), Some("{}"));
}

#[test]
fn parses_field_annotations_in_order() {
    let file = parse(
        "class Item {\n\
           @JsonKey(ignore: true)\n\
           @deprecated\n\
           String note = '';\n\
         }\n",
    );
    let var = &file.classes[0].member_variables[0];
    assert_eq!(
        var.annotations,
        vec!["@JsonKey(ignore: true)", "@deprecated"]
    );
}

#[test]
fn trailing_directive_comment_attaches_to_field() {
    let file = parse(
        "class Item {\n\
           String cache = ''; // directive:transient\n\
           String uid = ''; // directive:unique\n\
           String plain = ''; // just a note\n\
         }\n",
    );
    let vars = &file.classes[0].member_variables;
    assert_eq!(vars[0].directives, vec![Directive::Transient]);
    assert_eq!(vars[1].directives, vec![Directive::Unique]);
    assert!(vars[2].directives.is_empty());
}

#[test]
fn preceding_directive_comment_attaches_to_next_field() {
    let file = parse(
        "class Item {\n\
           // directive:transient\n\
           String cache = '';\n\
           String kept = '';\n\
         }\n",
    );
    let vars = &file.classes[0].member_variables;
    assert_eq!(vars[0].directives, vec![Directive::Transient]);
    assert!(vars[1].directives.is_empty());
}

#[test]
fn parses_extends_and_ignores_implements() {
    let file = parse("class Item extends Model<Item> implements Comparable<Item> {\n}\n");
    let class = &file.classes[0];
    assert_eq!(class.parent_class_name.as_deref(), Some("Model<Item>"));
}

#[test]
fn parses_abstract_class_with_generic_name() {
    let file = parse("abstract class Cache<T> {\n  final int capacity = 16;\n}\n");
    let class = &file.classes[0];
    assert_eq!(class.name, "Cache<T>");
    assert!(file.get_class_by_name("Cache").is_some());
}

#[test]
fn method_bodies_are_captured_opaquely() {
    let file = parse(
        "class Item {\n\
           String title = '';\n\
           String describe(int depth) {\n\
             if (depth > 0) { return '{...}'; }\n\
             return title;\n\
           }\n\
         }\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.member_variables.len(), 1);
    assert_eq!(class.functions.len(), 1);
    let func = &class.functions[0];
    assert_eq!(func.name, "describe");
    assert_eq!(func.return_type, "String");
    assert_eq!(func.parameters, "int depth");
    assert!(func.body.contains("return '{...}';"));
}

#[test]
fn getters_setters_and_arrow_bodies_parse_as_functions() {
    let file = parse(
        "class Item {\n\
           String _title = '';\n\
           String get title => _title;\n\
           set title(String value) {\n\
             _title = value;\n\
           }\n\
           bool get empty {\n\
             return _title.isEmpty;\n\
           }\n\
         }\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.functions.len(), 3);
    assert_eq!(class.functions[0].body, "=> _title;");
    assert_eq!(class.member_variables.len(), 1);
}

#[test]
fn parses_constructors_with_initializer_lists() {
    let file = parse(
        "class Item {\n\
           final String title;\n\
           Item(this.title);\n\
           Item.empty() : title = '' {\n\
             assert(title.isEmpty);\n\
           }\n\
           factory Item.from(String t) => Item(t);\n\
         }\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.constructors.len(), 3);

    let plain = &class.constructors[0];
    assert_eq!(plain.name, "Item");
    assert_eq!(plain.parameters, "this.title");
    assert_eq!(plain.body, None);

    let named = &class.constructors[1];
    assert_eq!(named.name, "Item.empty");
    assert_eq!(named.initializer.as_deref(), Some("title = ''"));
    assert!(named.body.as_deref().unwrap().contains("assert"));

    let factory = &class.constructors[2];
    assert_eq!(factory.name, "factory Item.from");
    assert_eq!(factory.body.as_deref(), Some("=> Item(t);"));

    // A parameterized constructor exists, so the default constructor is not
    // usable for generation.
    assert!(!class.use_default_constructor);
}

#[test]
fn set_literal_in_initializer_list_is_not_a_body() {
    let file = parse(
        "class Item {\n\
           Set<String> tags = {};\n\
           Item() : tags = {'a'};\n\
           Item.scored() : tags = {}, scores = {'a': 1} {\n\
             assert(tags.isEmpty);\n\
           }\n\
           Map<String, int> scores = {};\n\
         }\n",
    );
    let class = &file.classes[0];
    assert_eq!(class.constructors.len(), 2);

    let plain = &class.constructors[0];
    assert_eq!(plain.initializer.as_deref(), Some("tags = {'a'}"));
    assert_eq!(plain.body, None);

    let scored = &class.constructors[1];
    assert_eq!(scored.initializer.as_deref(), Some("tags = {}, scores = {'a': 1}"));
    assert!(scored.body.as_deref().unwrap().contains("assert"));
}

#[test]
fn default_constructor_flag_stays_set_without_parameterized_constructors() {
    let file = parse("class Item {\n  String title = '';\n  Item.empty();\n}\n");
    assert!(file.classes[0].use_default_constructor);
}

#[test]
fn field_of_own_class_type_is_not_a_constructor() {
    let file = parse("class Node {\n  Node? next;\n  int value = 0;\n}\n");
    let class = &file.classes[0];
    assert_eq!(class.member_variables.len(), 2);
    assert!(class.constructors.is_empty());
    assert_eq!(class.member_variables[0].ty, "Node?");
}

#[test]
fn string_escapes_survive_in_initializers() {
    let file = parse("class Item {\n  String quote = 'it\\'s';\n}\n");
    let var = &file.classes[0].member_variables[0];
    assert_eq!(var.default_value.as_deref(), Some("'it\\'s'"));
}

#[test]
fn two_classes_in_one_file_parse_in_order() {
    let file = parse(
        "class First {\n  int a = 1;\n}\n\n\
         class Second extends First {\n  int b = 2;\n}\n",
    );
    assert_eq!(file.classes.len(), 2);
    assert_eq!(file.classes[0].name, "First");
    assert_eq!(file.classes[1].name, "Second");
    assert_eq!(file.classes[1].parent_class_name.as_deref(), Some("First"));
}

#[test]
fn grammar_error_carries_location_and_expectations() {
    let err = parse_source("class Item {\n  = broken\n}\n", Path::new("lib/item.dart"))
        .expect_err("malformed input must fail");
    assert_eq!(err.file, "item.dart");
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 3);
    assert_eq!(err.unexpected, "'='");
    assert!(!err.expected.is_empty());
    assert!(err.context.contains("= broken"));

    let report = err.report();
    assert!(report.contains("Parse Error: item.dart 2:3"));
    assert!(report.contains("Unexpected: '='"));
    assert!(report.contains("Allowed:"));
}

#[test]
fn top_level_garbage_is_a_grammar_error() {
    let err = parse_source("banana;\n", Path::new("x.dart")).expect_err("must fail");
    assert_eq!(err.line, 1);
    assert_eq!(err.unexpected, "'banana'");
}

#[test]
fn unterminated_class_body_reports_end_of_file() {
    let err = parse_source("class Item {\n  int a = 1;\n", Path::new("x.dart"))
        .expect_err("must fail");
    assert_eq!(err.unexpected, "end of file");
}
