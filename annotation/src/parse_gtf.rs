use nom::bytes::complete::is_not;
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use smallvec::SmallVec;

/// Number of tab-separated columns in a GTF record.
pub const GTF_COLUMNS: usize = 9;

/// A GTF line split into its nine columns. The fields are borrowed from the
/// line; numeric columns are left unparsed so that the caller can report
/// which one is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub seqname: &'a str,
    pub source: &'a str,
    pub feature_type: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub score: &'a str,
    pub strand: &'a str,
    pub frame: &'a str,
    pub attributes: &'a str,
}

impl<'a> Record<'a> {
    pub fn is_exon(&self) -> bool {
        self.feature_type == "exon"
    }

    /// Only `+` is the positive strand; anything else counts as negative.
    pub fn is_positive_strand(&self) -> bool {
        self.strand == "+"
    }

    pub fn start(&self) -> Option<u64> {
        parse_coordinate(self.start)
    }

    pub fn end(&self) -> Option<u64> {
        parse_coordinate(self.end)
    }

    pub fn exon_attributes(&self) -> ExonAttributes<'a> {
        ExonAttributes::from_pairs(&gtf_attributes(self.attributes))
    }
}

/// Remove a trailing `#` comment from a line.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split a line into a `Record`. Returns `None` unless the line has exactly
/// nine tab-separated columns. Trailing empty columns are not counted.
pub fn split_gtf_line(line: &str) -> Option<Record<'_>> {
    let mut fields: SmallVec<[&str; GTF_COLUMNS]> = SmallVec::new();
    for field in line.trim_end_matches('\t').split('\t') {
        if fields.len() == GTF_COLUMNS {
            return None;
        }
        fields.push(field);
    }
    if fields.len() != GTF_COLUMNS {
        return None;
    }
    Some(Record {
        seqname: fields[0],
        source: fields[1],
        feature_type: fields[2],
        start: fields[3],
        end: fields[4],
        score: fields[5],
        strand: fields[6],
        frame: fields[7],
        attributes: fields[8],
    })
}

/// parse an integer from the input
fn parse_u64(input: &str) -> IResult<&str, u64> {
    map_res(digit1, str::parse::<u64>)(input)
}

/// A GTF coordinate is a positive integer.
pub fn parse_coordinate(input: &str) -> Option<u64> {
    match all_consuming(parse_u64)(input) {
        Ok((_, 0)) | Err(_) => None,
        Ok((_, value)) => Some(value),
    }
}

/// `key "value"`, with optional whitespace around either part. Neither the
/// key nor the value may contain whitespace or quotes.
fn attribute_pair(input: &str) -> IResult<&str, (&str, &str)> {
    delimited(
        multispace0,
        pair(
            is_not(" \t\r\n\""),
            preceded(
                multispace0,
                delimited(char('"'), is_not(" \t\r\n\""), char('"')),
            ),
        ),
        multispace0,
    )(input)
}

pub type AttrVec<'a> = SmallVec<[(&'a str, &'a str); 16]>;

/// Parse the attribute column. Pieces between `;` that are not a well formed
/// `key "value"` pair are skipped.
pub fn gtf_attributes(input: &str) -> AttrVec<'_> {
    input
        .split(';')
        .filter_map(|piece| {
            all_consuming(attribute_pair)(piece)
                .ok()
                .map(|(_, kv)| kv)
        })
        .collect()
}

/// The attributes of an exon record that the gene model uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExonAttributes<'a> {
    pub gene_id: Option<&'a str>,
    pub transcript_id: Option<&'a str>,
    pub gene_name: Option<&'a str>,
    pub transcript_name: Option<&'a str>,
}

impl<'a> ExonAttributes<'a> {
    /// Later occurrences of a key override earlier ones; unknown keys are
    /// ignored.
    pub fn from_pairs(pairs: &[(&'a str, &'a str)]) -> ExonAttributes<'a> {
        let mut attrs = ExonAttributes::default();
        for &(key, value) in pairs {
            match key {
                "gene_id" => attrs.gene_id = Some(value),
                "transcript_id" => attrs.transcript_id = Some(value),
                "gene_name" => attrs.gene_name = Some(value),
                "transcript_name" => attrs.transcript_name = Some(value),
                _ => {}
            }
        }
        attrs
    }
}
