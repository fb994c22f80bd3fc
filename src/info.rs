use crate::refs::{ObjectReferences, RefType};
use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// Document metadata written to the PDF info dictionary.
///
/// Nothing in here is derived from the clock: the creation date is only
/// written when one is supplied, so identical inputs give identical files.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub subject: Option<String>,
    /// Comma separated, which is what most readers display
    pub keywords: Vec<String>,
    /// Creation timestamp, written in UTC
    pub created: Option<NaiveDateTime>,
}

impl Info {
    pub fn new() -> Info {
        Info::default()
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Info {
        self.title = Some(title.into());
        self
    }

    pub fn with_subject<S: Into<String>>(mut self, subject: S) -> Info {
        self.subject = Some(subject.into());
        self
    }

    /// Append a keyword; blank ones are ignored
    pub fn with_keyword<S: Into<String>>(mut self, keyword: S) -> Info {
        let keyword = keyword.into();
        if !keyword.trim().is_empty() {
            self.keywords.push(keyword);
        }
        self
    }

    pub fn with_created(mut self, created: NaiveDateTime) -> Info {
        self.created = Some(created);
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject));
        }
        if !self.keywords.is_empty() {
            let keywords = self.keywords.join(", ");
            info.keywords(TextStr(&keywords));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        if let Some(created) = self.created {
            let date = PDate::new(created.year().clamp(0, 9999) as u16)
                .month(created.month() as u8)
                .day(created.day() as u8)
                .hour(created.hour() as u8)
                .minute(created.minute() as u8)
                .second(created.second() as u8)
                .utc_offset_hour(0)
                .utc_offset_minute(0);
            info.creation_date(date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keywords_are_dropped() {
        let info = Info::new()
            .with_keyword("memorial")
            .with_keyword("  ")
            .with_keyword("card-back");
        assert_eq!(info.keywords, vec!["memorial", "card-back"]);
    }

    #[test]
    fn no_date_unless_given() {
        let mut refs = ObjectReferences::new();
        let mut pdf = Pdf::new();
        Info::new().with_title("Card").write(&mut refs, &mut pdf);
        let bytes = pdf.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Card)"));
        assert!(!text.contains("/CreationDate"));
    }

    #[test]
    fn creation_date_is_written_in_utc() {
        let created = chrono::NaiveDate::from_ymd_opt(2024, 6, 9)
            .and_then(|d| d.and_hms_opt(14, 30, 5))
            .unwrap();
        let mut refs = ObjectReferences::new();
        let mut pdf = Pdf::new();
        Info::new().with_created(created).write(&mut refs, &mut pdf);
        let bytes = pdf.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/CreationDate (D:20240609143005"), "{text}");
    }
}
