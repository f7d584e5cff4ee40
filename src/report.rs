// Tabular report on standard output
use std::io::{self, Write};

use crate::types::ScoreRecord;

pub const BANNER: &str = r"
           _  __
          | |/ _|
 _ __   __| | |___  ___ __   ___  ___  ___
| '_ \ / _` |  _\ \/ / '_ \ / _ \/ __|/ _ \
| |_) | (_| | |  >  <| |_) | (_) \__ \  __/
| .__/ \__,_|_| /_/\_\ .__/ \___/|___/\___|
| |                  | |
|_|                  |_|";

pub const HEADER: &str = "Suspicious  Flat : Layered  Images  Filename";
const RULE_WIDTH: usize = 45;

pub fn format_row(record: &ScoreRecord) -> String {
    format!(
        "{:>10}  {:>4} : {:<7}  {:<6}  {}",
        u8::from(record.suspicious),
        record.flat_count,
        record.layer_count,
        record.image_count,
        record.path.display()
    )
}

/// Writes the report incrementally, one row per finished document.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn preamble(&mut self, job_size: usize) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(self.out)?;
        writeln!(self.out, "\tJob size: {}", job_size)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", HEADER)?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        self.out.flush()
    }

    pub fn row(&mut self, record: &ScoreRecord) -> io::Result<()> {
        writeln!(self.out, "{}", format_row(record))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    #[test]
    fn test_row_layout() {
        let record = ScoreRecord::new(Verdict::from_counts(0, 1), 2, "invoice.pdf");
        assert_eq!(format_row(&record), "         1     0 : 1        2       invoice.pdf");

        let record = ScoreRecord::new(Verdict::from_counts(12, 12), 0, "a.pdf");
        assert_eq!(format_row(&record), "         0    12 : 12       0       a.pdf");
    }

    #[test]
    fn test_preamble_then_rows() {
        let mut report = Report::new(Vec::new());
        report.preamble(2).unwrap();
        report
            .row(&ScoreRecord::new(Verdict::from_counts(1, 1), 0, "a.pdf"))
            .unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("\tJob size: 2\n"));
        let lines: Vec<&str> = text.lines().collect();
        let header = lines.iter().position(|l| *l == HEADER).unwrap();
        assert_eq!(lines[header + 1], "-".repeat(45));
        assert!(lines[header + 2].ends_with("a.pdf"));
    }
}
