//! CoNLL-U reader
//!
//! Reads the ID, FORM, UPOS, HEAD and DEPREL columns. Sentences are
//! concatenated into one document-wide stream; HEAD values are
//! sentence-relative in the file and rebased to stream indices here.

use oie_core::{Pos, TokenStream, TokenStreamBuilder};

use crate::{AnnotationParser, FileType, ParserError, Result};

const MIN_COLUMNS: usize = 8;

/// CoNLL-U parser
pub struct ConlluParser;

/// Token row kept until its sentence is complete
struct Row {
    form: String,
    upos: Pos,
    deprel: String,
    head: Option<usize>,
}

impl AnnotationParser for ConlluParser {
    fn parse_str(&self, content: &str) -> Result<TokenStream> {
        let mut builder = TokenStream::builder();
        let mut sentence: Vec<Row> = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                flush_sentence(&mut builder, &mut sentence);
                continue;
            }
            if line.starts_with('#') {
                continue;
            }

            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < MIN_COLUMNS {
                return Err(ParserError::Conllu {
                    line: line_no,
                    message: format!("expected at least {MIN_COLUMNS} columns, got {}", cols.len()),
                });
            }

            // Multiword ranges (1-2) and empty nodes (1.1) carry no syntax
            let id = cols[0];
            if id.contains('-') || id.contains('.') {
                continue;
            }
            let id: usize = id.parse().map_err(|_| ParserError::Conllu {
                line: line_no,
                message: format!("invalid token id '{id}'"),
            })?;
            if id != sentence.len() + 1 {
                return Err(ParserError::Conllu {
                    line: line_no,
                    message: format!("expected token id {}, got {id}", sentence.len() + 1),
                });
            }

            let head = match cols[6] {
                "_" => None,
                h => Some(h.parse::<usize>().map_err(|_| ParserError::Conllu {
                    line: line_no,
                    message: format!("invalid head '{h}'"),
                })?),
            };

            sentence.push(Row {
                form: cols[1].to_string(),
                upos: Pos::from_tag(underscore_empty(cols[3])),
                deprel: underscore_empty(cols[7]).to_string(),
                head,
            });
        }

        flush_sentence(&mut builder, &mut sentence);
        Ok(builder.build())
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Conllu]
    }
}

fn underscore_empty(value: &str) -> &str {
    if value == "_" {
        ""
    } else {
        value
    }
}

/// Push a finished sentence, rebasing heads onto stream indices.
/// HEAD 0 becomes a self-reference; heads past the sentence end are gaps.
fn flush_sentence(builder: &mut TokenStreamBuilder, sentence: &mut Vec<Row>) {
    let base = builder.len();
    let len = sentence.len();

    for (offset, row) in sentence.drain(..).enumerate() {
        let head = match row.head {
            Some(0) => Some(base + offset),
            Some(h) if h <= len => Some(base + h - 1),
            _ => None,
        };
        builder.push(row.form, row.upos, row.deprel, head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oie_core::dep;

    const GORSUCH: &str = "\
# text = Neil Gorsuch was appointed to the Supreme Court.
1\tNeil\tNeil\tPROPN\tNNP\t_\t2\tcompound\t_\t_
2\tGorsuch\tGorsuch\tPROPN\tNNP\t_\t4\tnsubjpass\t_\t_
3\twas\tbe\tAUX\tVBD\t_\t4\tauxpass\t_\t_
4\tappointed\tappoint\tVERB\tVBN\t_\t0\tROOT\t_\t_
5\tto\tto\tADP\tIN\t_\t4\tprep\t_\t_
6\tthe\tthe\tDET\tDT\t_\t8\tdet\t_\t_
7\tSupreme\tSupreme\tPROPN\tNNP\t_\t8\tcompound\t_\t_
8\tCourt\tCourt\tPROPN\tNNP\t_\t5\tpobj\t_\t_
9\t.\t.\tPUNCT\t.\t_\t4\tpunct\t_\t_
";

    #[test]
    fn test_parse_sentence() {
        let stream = ConlluParser.parse_str(GORSUCH).unwrap();
        assert_eq!(stream.len(), 9);

        let court = stream.get(7).unwrap();
        assert_eq!(court.text, "Court");
        assert_eq!(court.pos, Pos::Propn);
        assert!(court.has_dep(dep::POBJ));
        assert_eq!(court.head, Some(4));
        assert_eq!(court.children, vec![5, 6]);

        let appointed = stream.get(3).unwrap();
        assert!(appointed.is_root());
    }

    #[test]
    fn test_heads_rebased_per_sentence() {
        let content = format!(
            "{GORSUCH}\n1\tParis\tParis\tPROPN\tNNP\t_\t2\tnsubj\t_\t_\n2\tsleeps\tsleep\tVERB\tVBZ\t_\t0\tROOT\t_\t_\n"
        );
        let stream = ConlluParser.parse_str(&content).unwrap();
        assert_eq!(stream.len(), 11);

        let paris = stream.get(9).unwrap();
        assert_eq!(paris.head, Some(10));
        assert!(stream.get(10).unwrap().is_root());
    }

    #[test]
    fn test_skips_ranges_and_empty_nodes() {
        let content = "\
1-2\tdel\t_\t_\t_\t_\t_\t_\t_\t_
1\tde\tde\tADP\t_\t_\t2\tcase\t_\t_
2\tel\tel\tDET\t_\t_\t0\tROOT\t_\t_
2.1\tx\t_\t_\t_\t_\t_\t_\t_\t_
";
        let stream = ConlluParser.parse_str(content).unwrap();
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_missing_head_is_gap() {
        let content = "1\tParis\tParis\tPROPN\t_\t_\t_\t_\t_\t_\n2\tx\tx\tX\t_\t_\t9\tdep\t_\t_\n";
        let stream = ConlluParser.parse_str(content).unwrap();
        assert_eq!(stream.get(0).unwrap().head, None);
        assert_eq!(stream.get(0).unwrap().dep, "");
        assert_eq!(stream.get(1).unwrap().head, None);
    }

    #[test]
    fn test_rejects_short_line() {
        let err = ConlluParser.parse_str("1\tParis\tPROPN\n").unwrap_err();
        assert!(matches!(err, ParserError::Conllu { line: 1, .. }));
    }

    #[test]
    fn test_rejects_out_of_order_ids() {
        let content = "1\ta\ta\tDET\t_\t_\t0\tROOT\t_\t_\n3\tb\tb\tDET\t_\t_\t1\tdet\t_\t_\n";
        let err = ConlluParser.parse_str(content).unwrap_err();
        assert!(matches!(err, ParserError::Conllu { line: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        let stream = ConlluParser.parse_str("").unwrap();
        assert!(stream.is_empty());
    }
}
