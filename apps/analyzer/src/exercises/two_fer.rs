//! Rule set for the `two-fer` exercise.
//!
//! Submissions implement `ShareWith(name string) string`, returning
//! "One for X, one for me." with X defaulting to "you".

use crate::error::RuleError;
use crate::registry::{Registry, RuleFn};
use crate::sugg::SuggestionSet;
use crate::tree::{
    descendants, doc_comment, list_arity, named_children, param_names, walk, TreeQuery,
};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::Node;

pub const SLUG: &str = "two-fer";

const SHARE_WITH: &str = "ShareWith";
const PACKAGE: &str = "twofer";

pub const MISSING_SHARE_WITH: &str = "go.two-fer.missing_share_with_function";
pub const SIGNATURE_CHANGED: &str = "go.two-fer.signature_changed";
pub const PLUS_USED: &str = "go.two-fer.plus_used";
pub const GENERALIZE_NAMES: &str = "go.two-fer.generalize_names";
pub const USE_STRING_PLACEHOLDER: &str = "go.two-fer.use_string_placeholder";
pub const MINIMAL_CONDITIONAL: &str = "go.two-fer.minimal_conditional";
pub const STUB_COMMENTS: &str = "go.two-fer.stub_comments";
pub const COMMENT_SECTION: &str = "go.two-fer.comment_section";
pub const MISSING_PACKAGE_COMMENT: &str = "go.two-fer.missing_package_comment";
pub const MISSING_FUNCTION_COMMENT: &str = "go.two-fer.missing_function_comment";
pub const WRONG_PACKAGE_COMMENT: &str = "go.two-fer.wrong_package_comment";
pub const WRONG_FUNCTION_COMMENT: &str = "go.two-fer.wrong_function_comment";
pub const STRINGS_JOIN: &str = "go.two-fer.strings_join";
pub const STRINGS_BUILDER: &str = "go.two-fer.strings_builder";
pub const EXTRA_NAME_VAR: &str = "go.two-fer.extra_name_var";
pub const EXTRA_VAR: &str = "go.two-fer.extra_var";
pub const EXTRA_FUNCTION: &str = "go.two-fer.extra_function";
pub const TRIM_SPACE: &str = "go.two-fer.trim_space";

const SEVERITY: &[(&str, u32)] = &[
    (MISSING_SHARE_WITH, 5),
    (SIGNATURE_CHANGED, 5),
    (GENERALIZE_NAMES, 5),
    (STRINGS_JOIN, 5),
    (STRINGS_BUILDER, 5),
    (MINIMAL_CONDITIONAL, 3),
    (EXTRA_FUNCTION, 2),
    (TRIM_SPACE, 1),
    (EXTRA_NAME_VAR, 1),
    (EXTRA_VAR, 1),
    (PLUS_USED, 0),
    (USE_STRING_PLACEHOLDER, 0),
    (STUB_COMMENTS, 0),
    (COMMENT_SECTION, 0),
    (MISSING_PACKAGE_COMMENT, 0),
    (MISSING_FUNCTION_COMMENT, 0),
    (WRONG_PACKAGE_COMMENT, 0),
    (WRONG_FUNCTION_COMMENT, 0),
];

/// Solutions whose shape counts as optimal.
pub const CANONICAL: &[&str] = &[
    r#"package twofer

import "fmt"

func ShareWith(name string) string {
	if name == "" {
		name = "you"
	}
	return fmt.Sprintf("One for %s, one for me.", name)
}
"#,
    r#"package twofer

import "fmt"

func ShareWith(name string) string {
	if len(name) == 0 {
		name = "you"
	}
	return fmt.Sprintf("One for %s, one for me.", name)
}
"#,
];

pub fn register() -> Registry<dyn TreeQuery> {
    let rules: [RuleFn<dyn TreeQuery>; 11] = [
        exam_main_func,
        exam_plus_used,
        exam_generalize_names,
        exam_fmt,
        exam_comments,
        exam_conditional,
        exam_strings_join,
        exam_strings_builder,
        exam_extra_variable,
        exam_extra_function,
        exam_strings_trim_space,
    ];
    Registry::new(rules.to_vec(), SEVERITY.iter().copied())
}

fn exam_main_func(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        suggs.append_unique(MISSING_SHARE_WITH);
        return;
    };
    let arity = |field: &str| main.child_by_field_name(field).map(list_arity).unwrap_or(0);
    if arity("parameters") != 1 || arity("result") != 1 {
        suggs.append_unique(SIGNATURE_CHANGED);
    }
}

fn exam_plus_used(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        suggs.append_unique(MISSING_SHARE_WITH);
        return;
    };
    let plus_used = descendants(main, "binary_expression").into_iter().any(|expr| {
        expr.child_by_field_name("operator").map(|op| op.kind()) == Some("+")
    });
    if plus_used {
        suggs.append_unique(PLUS_USED);
    }
}

fn exam_generalize_names(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        suggs.append_unique(MISSING_SHARE_WITH);
        return;
    };
    let body = pkg.text(main);
    if body.contains("Alice") || body.contains("Bob") {
        suggs.append_unique(GENERALIZE_NAMES);
    }
}

fn exam_fmt(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let sprintf_calls = pkg
        .find_by_name("Sprintf")
        .into_iter()
        .filter(|n| n.parent().map(|p| p.kind()) == Some("selector_expression"))
        .count();
    if sprintf_calls > 1 {
        suggs.append_unique(MINIMAL_CONDITIONAL);
    }

    let literals = pkg
        .find_by_kind("interpreted_string_literal")
        .into_iter()
        .chain(pkg.find_by_kind("raw_string_literal"));
    for lit in literals {
        if pkg.text(lit).contains("%v") {
            suggs.append_unique(USE_STRING_PLACEHOLDER);
        }
    }
}

fn exam_comments(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    if pkg.sources().iter().any(|s| s.contains("stub")) {
        suggs.append_unique(STUB_COMMENTS);
    }

    // Only the first file's package clause is checked.
    if let Some(clause) = pkg.find_by_kind("package_clause").first() {
        check_comment(pkg, doc_comment(*clause), suggs, DocKind::Package, PACKAGE);
    }

    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        suggs.append_unique(MISSING_SHARE_WITH);
        return;
    };
    check_comment(pkg, doc_comment(main), suggs, DocKind::Function, SHARE_WITH);
}

#[derive(Clone, Copy)]
enum DocKind {
    Package,
    Function,
}

impl DocKind {
    fn stub_phrase(self) -> &'static str {
        match self {
            DocKind::Package => "should have a package comment",
            DocKind::Function => "should have a comment",
        }
    }

    fn expected_prefix(self, name: &str) -> String {
        match self {
            DocKind::Package => format!("Package {} ", name),
            DocKind::Function => format!("{} ", name),
        }
    }

    fn missing(self) -> &'static str {
        match self {
            DocKind::Package => MISSING_PACKAGE_COMMENT,
            DocKind::Function => MISSING_FUNCTION_COMMENT,
        }
    }

    fn wrong(self) -> &'static str {
        match self {
            DocKind::Package => WRONG_PACKAGE_COMMENT,
            DocKind::Function => WRONG_FUNCTION_COMMENT,
        }
    }
}

fn check_comment(
    pkg: &dyn TreeQuery,
    comment: Option<Node<'_>>,
    suggs: &mut SuggestionSet,
    kind: DocKind,
    name: &str,
) {
    let Some(comment) = comment else {
        suggs.append_unique(kind.missing());
        suggs.append_unique(COMMENT_SECTION);
        return;
    };
    let raw = pkg.text(comment);
    let body = match raw.strip_prefix("//") {
        Some(line) => line,
        None => match raw.strip_prefix("/*") {
            Some(block) => block.trim_end_matches("*/"),
            None => {
                suggs.report_error(RuleError::unexpected(
                    "exam_comments",
                    format!("comment without // or /* marker: {:?}", raw),
                ));
                return;
            }
        },
    };
    let body = body.trim();

    if body.contains(kind.stub_phrase()) {
        suggs.append_unique(STUB_COMMENTS);
    } else if !body.starts_with(&kind.expected_prefix(name)) {
        suggs.append_unique(kind.wrong());
        suggs.append_unique(COMMENT_SECTION);
    }
}

fn output_part() -> &'static Regex {
    static OUTPUT_PART: OnceLock<Regex> = OnceLock::new();
    OUTPUT_PART.get_or_init(|| Regex::new(r", one for me\.").expect("static regex"))
}

fn exam_conditional(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        suggs.append_unique(MISSING_SHARE_WITH);
        return;
    };
    if output_part().find_iter(pkg.text(main)).count() > 1 {
        suggs.append_unique(MINIMAL_CONDITIONAL);
    }
}

fn exam_strings_join(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    if !pkg.find_by_name("Join").is_empty() {
        suggs.append_unique(STRINGS_JOIN);
    }
}

fn exam_strings_builder(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    if !pkg.find_by_name("Builder").is_empty() {
        suggs.append_unique(STRINGS_BUILDER);
    }
}

fn exam_extra_variable(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let Some(main) = pkg.func_decl(SHARE_WITH) else {
        return;
    };
    let params = param_names(pkg, main);
    let [param] = params.as_slice() else {
        suggs.append_unique(SIGNATURE_CHANGED);
        return;
    };

    // (left, right) sides of every assignment-like statement, in source order.
    let mut sides: Vec<(Vec<Node<'_>>, Vec<Node<'_>>)> = Vec::new();
    walk(main, &mut |stmt| match stmt.kind() {
        "assignment_statement" | "short_var_declaration" => {
            let side = |field: &str| {
                stmt.child_by_field_name(field)
                    .map(named_children)
                    .unwrap_or_default()
            };
            sides.push((side("left"), side("right")));
        }
        "var_spec" => {
            let names = named_children(stmt)
                .into_iter()
                .filter(|n| n.kind() == "identifier")
                .collect();
            let values = stmt
                .child_by_field_name("value")
                .map(named_children)
                .unwrap_or_default();
            sides.push((names, values));
        }
        _ => {}
    });

    for (left, right) in sides {
        for node in right {
            if node.kind() == "identifier" && pkg.text(node) == *param {
                suggs.append_unique(EXTRA_NAME_VAR);
            }
        }
        for node in left {
            if node.kind() != "identifier" {
                continue;
            }
            let var = pkg.text(node);
            if var != *param {
                suggs.append_unique_with_placeholders(EXTRA_VAR, [("name", var)]);
            }
        }
    }
}

fn exam_extra_function(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    let funcs = pkg.find_by_kind("function_declaration").len()
        + pkg.find_by_kind("method_declaration").len();
    if funcs > 1 && pkg.func_decl("main").is_none() {
        suggs.append_unique(EXTRA_FUNCTION);
    }
}

fn exam_strings_trim_space(pkg: &(dyn TreeQuery + 'static), suggs: &mut SuggestionSet) {
    if !pkg.find_by_name("TrimSpace").is_empty() {
        suggs.append_unique(TRIM_SPACE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::decide;
    use crate::models::Status;
    use crate::sugg::Comment;
    use crate::tree::GoPackage;

    const OPTIMAL: &str = r#"// Package twofer implements a solution for the two-fer exercise.
package twofer

import "fmt"

// ShareWith returns the sharing phrase for name, or for "you" when name is empty.
func ShareWith(name string) string {
	if name == "" {
		name = "you"
	}
	return fmt.Sprintf("One for %s, one for me.", name)
}
"#;

    fn run(src: &str) -> SuggestionSet {
        let pkg = GoPackage::parse_str(src).unwrap();
        let reg = register();
        let mut suggs = reg.new_suggestions();
        reg.run(&pkg, &mut suggs);
        suggs
    }

    fn run_one(rule: RuleFn<dyn TreeQuery>, src: &str) -> SuggestionSet {
        let pkg = GoPackage::parse_str(src).unwrap();
        let mut suggs = register().new_suggestions();
        rule(&pkg, &mut suggs);
        suggs
    }

    fn codes(suggs: &SuggestionSet) -> Vec<&str> {
        suggs.comments().iter().map(Comment::code).collect()
    }

    #[test]
    fn test_optimal_solution_has_no_findings() {
        let suggs = run(OPTIMAL);
        assert!(suggs.is_empty(), "unexpected: {:?}", codes(&suggs));
        assert!(suggs.errors().is_empty());
        assert_eq!(decide(1.0, &suggs).status, Status::ApproveAsOptimal);
    }

    #[test]
    fn test_uncommented_canonical_is_approved_with_comment() {
        let suggs = run(CANONICAL[0]);
        assert_eq!(
            codes(&suggs),
            vec![
                MISSING_PACKAGE_COMMENT,
                COMMENT_SECTION,
                MISSING_FUNCTION_COMMENT
            ]
        );
        assert_eq!(suggs.total_severity(), 0);
        assert_eq!(decide(1.0, &suggs).status, Status::ApproveWithComment);
    }

    #[test]
    fn test_missing_share_with_is_reported_once() {
        let suggs =
            run("// Package twofer x.\npackage twofer\n\nfunc Share(n string) string { return n }\n");
        assert_eq!(
            codes(&suggs).iter().filter(|c| **c == MISSING_SHARE_WITH).count(),
            1
        );
        assert_eq!(decide(0.0, &suggs).status, Status::DisapproveWithComment);
    }

    #[test]
    fn test_signature_changed() {
        let suggs = run_one(
            exam_main_func,
            "package twofer\n\nfunc ShareWith(a, b string) (string, error) { return a, nil }\n",
        );
        assert!(suggs.contains(SIGNATURE_CHANGED));
        let ok = run_one(exam_main_func, OPTIMAL);
        assert!(ok.is_empty());
    }

    #[test]
    fn test_plus_and_repeated_output_sentence() {
        let src = r#"package twofer

func ShareWith(name string) string {
	if name == "" {
		return "One for you, one for me."
	}
	return "One for " + name + ", one for me."
}
"#;
        assert!(run_one(exam_plus_used, src).contains(PLUS_USED));
        assert!(run_one(exam_conditional, src).contains(MINIMAL_CONDITIONAL));
        assert!(!run_one(exam_conditional, OPTIMAL).contains(MINIMAL_CONDITIONAL));
    }

    #[test]
    fn test_fmt_usage() {
        let src = r#"package twofer

import "fmt"

func ShareWith(name string) string {
	if name == "" {
		return fmt.Sprintf("One for %v, one for me.", "you")
	}
	return fmt.Sprintf("One for %v, one for me.", name)
}
"#;
        let suggs = run_one(exam_fmt, src);
        assert_eq!(codes(&suggs), vec![MINIMAL_CONDITIONAL, USE_STRING_PLACEHOLDER]);
    }

    #[test]
    fn test_hardcoded_names_and_library_shortcuts() {
        let src = r#"package twofer

import "strings"

func ShareWith(name string) string {
	name = strings.TrimSpace(name)
	if name == "Alice" {
		return strings.Join([]string{"One for Alice", "one for me."}, ", ")
	}
	var sb strings.Builder
	sb.WriteString(name)
	return sb.String()
}
"#;
        let suggs = run(src);
        assert_eq!(
            codes(&suggs),
            vec![
                GENERALIZE_NAMES,
                MISSING_PACKAGE_COMMENT,
                COMMENT_SECTION,
                MISSING_FUNCTION_COMMENT,
                STRINGS_JOIN,
                STRINGS_BUILDER,
                EXTRA_VAR,
                TRIM_SPACE,
            ]
        );
        assert_eq!(suggs.comments()[6].params()["name"], "sb");
        assert_eq!(suggs.total_severity(), 17);
        assert_eq!(decide(1.0, &suggs).status, Status::DisapproveWithComment);
    }

    #[test]
    fn test_extra_variables_carry_their_name() {
        let src = r#"package twofer

import "fmt"

func ShareWith(name string) string {
	who := name
	other := "me"
	if who == "" {
		who = "you"
	}
	return fmt.Sprintf("One for %s, one for %s.", who, other)
}
"#;
        let suggs = run_one(exam_extra_variable, src);
        assert!(suggs.contains(EXTRA_NAME_VAR));
        let extra = suggs
            .comments()
            .iter()
            .find(|c| c.code() == EXTRA_VAR)
            .unwrap();
        assert_eq!(extra.params()["name"], "who");
        assert_eq!(suggs.comments().len(), 2);
    }

    #[test]
    fn test_var_declarations_count_as_extra_variables() {
        let src = r#"package twofer

import "fmt"

func ShareWith(name string) string {
	var who = name
	var greeting string = "One for %s, one for me."
	return fmt.Sprintf(greeting, who)
}
"#;
        let suggs = run_one(exam_extra_variable, src);
        assert_eq!(codes(&suggs), vec![EXTRA_NAME_VAR, EXTRA_VAR]);
        assert_eq!(suggs.comments()[1].params()["name"], "who");
        assert_eq!(suggs.total_severity(), 2);
    }

    #[test]
    fn test_extra_function_without_main() {
        let src = "package twofer\n\nfunc ShareWith(name string) string { return greet(name) }\n\nfunc greet(n string) string { return n }\n";
        assert!(run_one(exam_extra_function, src).contains(EXTRA_FUNCTION));
        assert!(!run_one(exam_extra_function, OPTIMAL).contains(EXTRA_FUNCTION));
    }

    #[test]
    fn test_comment_checks() {
        let wrong = r#"// twofer does things.
package twofer

// This function should have a comment
func ShareWith(name string) string { return name }
"#;
        let suggs = run_one(exam_comments, wrong);
        assert_eq!(
            codes(&suggs),
            vec![WRONG_PACKAGE_COMMENT, COMMENT_SECTION, STUB_COMMENTS]
        );

        let block = "/* Package twofer ok. */\npackage twofer\n\n/* ShareWith ok. */\nfunc ShareWith(name string) string { return name }\n";
        assert!(run_one(exam_comments, block).is_empty());
    }

    #[test]
    fn test_trailing_import_comment_is_not_the_function_doc() {
        let src = r#"// Package twofer implements a solution for the two-fer exercise.
package twofer

import "fmt" // formatting
// ShareWith returns the phrase.
func ShareWith(name string) string {
	if name == "" {
		name = "you"
	}
	return fmt.Sprintf("One for %s, one for me.", name)
}
"#;
        assert!(run_one(exam_comments, src).is_empty());
        assert_eq!(decide(1.0, &run(src)).status, Status::ApproveAsOptimal);
    }

    #[test]
    fn test_stub_marker_anywhere_in_source() {
        let src = OPTIMAL.replace("import \"fmt\"", "import \"fmt\" // remove this stub note");
        assert!(run_one(exam_comments, &src).contains(STUB_COMMENTS));
    }

    #[test]
    fn test_registry_covers_every_weighted_code() {
        let reg = register();
        assert_eq!(reg.rules().len(), 11);
        assert_eq!(reg.severity().len(), SEVERITY.len());
        assert_eq!(reg.severity()[MISSING_SHARE_WITH], 5);
    }
}
