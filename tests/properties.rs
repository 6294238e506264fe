use pretty_assertions::assert_eq;

use mix_syntax::mnemonic::{FieldOp, JumpCondition, NonFieldOp, OnlyNameOp, Register};
use mix_syntax::operand::OperandKind;
use mix_syntax::{parse_line, Address, ErrorKind, FieldSpec, Fields, Index, ParseError, ParsedInstruction};

#[test]
fn only_name_mnemonics_stand_alone() {
    for (text, op) in [
        ("NOP", OnlyNameOp::Nop),
        ("HALT", OnlyNameOp::Halt),
        ("NUM", OnlyNameOp::Num),
        ("CHAR", OnlyNameOp::Char),
    ] {
        assert_eq!(parse_line(text).unwrap(), ParsedInstruction::only_name(op));
        for tail in [" 1,1", " 0", "(0:5)", " ", "1"] {
            let line = format!("{text}{tail}");
            assert!(parse_line(&line).is_err(), "{line} should be rejected");
        }
        let err = parse_line(&format!("{text} 10,1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedTrailingOperand);
    }
}

#[test]
fn ld1_accepts_every_address_and_index() {
    for a in 0..=3999u16 {
        for i in 1..=5u8 {
            let ins = parse_line(&format!("LD1 {a},{i}")).unwrap();
            match ins {
                ParsedInstruction::Field { op, address, index, fields } => {
                    assert_eq!(op, FieldOp::Load { register: Register::I1, negate: false });
                    assert_eq!(address.get(), a);
                    assert_eq!(index.get(), i);
                    assert_eq!(fields, FieldSpec::Default);
                }
                other => panic!("LD1 {a},{i} parsed as {other:?}"),
            }
        }
    }
}

#[test]
fn out_of_range_operands() {
    let err = parse_line("LD1 4000,1").unwrap_err();
    assert_eq!(
        err,
        ParseError::OperandRange {
            operand: OperandKind::Address,
            value: "4000".into(),
            min: 0,
            max: 3999,
            column: 5,
        }
    );
    for bad in ["0", "6"] {
        match parse_line(&format!("LD1 100,{bad}")).unwrap_err() {
            ParseError::OperandRange { operand, value, min, max, .. } => {
                assert_eq!(operand, OperandKind::Index);
                assert_eq!(value, bad);
                assert_eq!((min, max), (1, 5));
            }
            other => panic!("index {bad}: {other:?}"),
        }
    }
}

#[test]
fn field_specs_including_reversed() {
    let ins = parse_line("ADD 2000,3(0:5)").unwrap();
    assert_eq!(ins.fields(), Some(FieldSpec::Explicit(Fields::new(0, 5))));

    let ins = parse_line("ADD 2000,3(5:0)").unwrap();
    assert_eq!(
        ins,
        ParsedInstruction::field(
            FieldOp::Add,
            Address::new(2000).unwrap(),
            Index::new(3).unwrap(),
            FieldSpec::Explicit(Fields::new(5, 0)),
        )
    );
    assert!(ins.fields().and_then(|f| f.explicit()).unwrap().is_reversed());
}

#[test]
fn jump_codes_combine() {
    let jl = parse_line("JL 10,1").unwrap();
    assert_eq!(jl.mnemonic().to_string(), "JL");
    assert!(matches!(jl, ParsedInstruction::NonField { op: NonFieldOp::Jump(JumpCondition::Less), .. }));

    let jle = parse_line("JLE 10,1").unwrap();
    assert!(matches!(jle, ParsedInstruction::NonField { op: NonFieldOp::Jump(JumpCondition::LessOrEqual), .. }));

    for ok in ["JG 10,1", "JGE 10,1", "JE 10,1", "JNE 10,1", "JMP 10,1", "JXNZ 10,1", "J3P 10,1"] {
        assert!(parse_line(ok).is_ok(), "{ok}");
    }

    let err = parse_line("JX 10,1").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnknownMnemonic | ErrorKind::MalformedOperand));
    assert_eq!(err, ParseError::UnknownMnemonic { mnemonic: "JX".into(), column: 1 });
}

#[test]
fn lexical_errors_come_first() {
    let err = parse_line("LD1 2000;3").unwrap_err();
    assert_eq!(err, ParseError::Lex { ch: ';', column: 9 });
    // bad character wins over an unknown mnemonic earlier on the line
    let err = parse_line("FOO 1,1#").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lex);
}
