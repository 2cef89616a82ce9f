//! The two-pass assembler (§4.3): a single linear scan that emits bytes and
//! records unresolved label openings, followed by a fixup pass that patches
//! each opening once every label definition has been seen.

use std::collections::HashMap;

use crate::bytes::IncrementalWriter;
use crate::error::{AssemblerError, Line};
use crate::opcode::Opcode;

struct Opening {
    label: String,
    patch_offset: usize,
    line: usize,
}

/// Assembles `source` into a raw binary. The first non-empty line must be an
/// offset directive (`:<hex>`); every line after it is either blank, a
/// label definition (`:name`), or an instruction.
pub fn assemble(source: &str) -> Result<Vec<u8>, AssemblerError> {
    let mut lines = source.lines().enumerate();
    let (offset_row, offset_line) = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((index, line)) => break (index + 1, line),
            None => break (1, ""),
        }
    };
    let global_offset = parse_offset_directive(offset_line, offset_row)?;

    let mut writer = IncrementalWriter::new();
    let mut labels: HashMap<String, u64> = HashMap::new();
    let mut openings: Vec<Opening> = Vec::new();

    for (index, raw_line) in lines {
        let row = index + 1;
        let trimmed = raw_line.trim_start();
        if trimmed.trim_end().is_empty() {
            continue;
        }

        if trimmed.starts_with(':') {
            let name = trimmed[1..].trim_end();
            if name.is_empty() {
                return Err(AssemblerError::EmptyLabel { line: Line(row) });
            }
            labels.insert(name.to_string(), writer.position() as u64);
            continue;
        }

        assemble_instruction(trimmed, row, &mut writer, &mut openings)?;
    }

    for opening in &openings {
        let target = labels.get(&opening.label).ok_or_else(|| AssemblerError::UnresolvedLabel {
            label: opening.label.clone(),
            line: Some(Line(opening.line)),
        })?;
        writer.patch_u64(opening.patch_offset, target + global_offset);
    }

    Ok(writer.into_bytes())
}

fn parse_offset_directive(first_line: &str, row: usize) -> Result<u64, AssemblerError> {
    let line = Line(row);
    let rest = first_line.strip_prefix(':').ok_or_else(|| AssemblerError::MalformedOffsetDirective {
        reason: "expected the first non-empty line to start with ':'".to_string(),
        line,
    })?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(AssemblerError::MalformedOffsetDirective {
            reason: "offset value is empty".to_string(),
            line,
        });
    }
    parse_hex_u64(rest).map_err(|_| AssemblerError::MalformedOffsetDirective {
        reason: format!("\"{}\" is not a valid hexadecimal literal", rest),
        line,
    })
}

fn parse_hex_u64(text: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(text.trim_start_matches("0x").trim_start_matches("0X"), 16)
}

fn assemble_instruction(
    line_text: &str,
    row: usize,
    writer: &mut IncrementalWriter,
    openings: &mut Vec<Opening>,
) -> Result<(), AssemblerError> {
    let mut tokens = line_text.split_whitespace();
    let mnemonic = tokens.next().expect("non-blank line has at least one token");
    let args: Vec<&str> = tokens.collect();

    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AssemblerError::UnknownMnemonic {
        mnemonic: mnemonic.to_string(),
        line: Line(row),
    })?;

    if args.len() != opcode.arity() {
        return Err(AssemblerError::ArityMismatch {
            mnemonic: mnemonic.to_string(),
            expected: opcode.arity(),
            actual: args.len(),
            line: Line(row),
        });
    }

    writer.push_u16(opcode.as_u16());

    match opcode.arity() {
        0 => {}
        1 => {
            let arg = args[0];
            if let Some(label) = arg.strip_prefix(':') {
                if !opcode.accepts_label_operand() {
                    return Err(AssemblerError::InvalidLabelOperand {
                        mnemonic: mnemonic.to_string(),
                        line: Line(row),
                    });
                }
                if label.is_empty() {
                    return Err(AssemblerError::EmptyLabel { line: Line(row) });
                }
                openings.push(Opening {
                    label: label.to_string(),
                    patch_offset: writer.position(),
                    line: row,
                });
                writer.push_u64(0);
            } else {
                let value = parse_hex_u64(arg).map_err(|_| AssemblerError::MalformedHexLiteral {
                    text: arg.to_string(),
                    line: Line(row),
                })?;
                match opcode.operand_shape() {
                    crate::opcode::OperandShape::U8 => writer.push_u8(value as u8),
                    crate::opcode::OperandShape::U64 => writer.push_u64(value),
                    crate::opcode::OperandShape::None => unreachable!(),
                }
            }
        }
        _ => unreachable!("no mnemonic in this ISA takes more than one argument"),
    }

    Ok(())
}
