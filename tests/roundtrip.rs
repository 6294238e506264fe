use pretty_assertions::assert_eq;

use mix_syntax::mnemonic::table;
use mix_syntax::{parse_line, parse_program, Category, ParsedInstruction, ParserConfig};

fn samples(mnemonic: &str, category: Category) -> Vec<String> {
    match category {
        Category::OnlyName => vec![mnemonic.to_string()],
        Category::Field => vec![
            format!("{mnemonic} 0,1"),
            format!("{mnemonic} 3999,5(0:5)"),
            format!("{mnemonic} 0017,02(05:00)"),
        ],
        Category::NonField => vec![format!("{mnemonic} 12,4"), format!("{mnemonic} 0,1")],
        Category::Arg => vec![format!("{mnemonic} 100,2"), format!("{mnemonic} 100,2(0018)")],
    }
}

#[test]
fn canonical_rendering_is_idempotent_for_every_mnemonic() {
    for (name, mnemonic) in table() {
        for line in samples(name, mnemonic.category()) {
            let first = parse_line(&line).unwrap_or_else(|e| panic!("{line}: {e}"));
            assert_eq!(first.mnemonic(), *mnemonic, "{line}");
            let canonical = first.to_string();
            let second: ParsedInstruction = canonical.parse().unwrap();
            assert_eq!(second, first, "{line} -> {canonical}");
            assert_eq!(second.to_string(), canonical);
        }
    }
}

#[test]
fn leading_zeros_are_dropped() {
    assert_eq!(parse_line("STJ 0017,02(05:00)").unwrap().to_string(), "STJ 17,2(5:0)");
    assert_eq!(parse_line("OUT 100,2(0018)").unwrap().to_string(), "OUT 100,2(18)");
}

#[test]
fn case_insensitive_programs_render_upper_case() {
    let cfg = ParserConfig { case_insensitive: true, ..ParserConfig::default() };
    let p = parse_program("lda 1,1\nhalt\n", &cfg);
    assert_eq!(p.render().unwrap(), "LDA 1,1\nHALT\n");
}
