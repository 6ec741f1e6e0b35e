//! Flattened message tables keyed by dotted paths such as `common.loading`

mod en_us;
mod zh_cn;

use std::collections::HashMap;

use once_cell::sync::Lazy;

type Table = HashMap<&'static str, &'static str>;

static ZH_CN: Lazy<Table> = Lazy::new(|| zh_cn::ENTRIES.iter().copied().collect());
static EN_US: Lazy<Table> = Lazy::new(|| en_us::ENTRIES.iter().copied().collect());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    ZhCn,
    EnUs,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    /// Unknown tags fall back to the default locale
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" | "en" => Locale::EnUs,
            _ => Locale::ZhCn,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    fn table(&self) -> &'static Table {
        match self {
            Locale::ZhCn => &ZH_CN,
            Locale::EnUs => &EN_US,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.table().get(key).copied()
    }

    /// Missing keys render as the key itself
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    pub fn t(&self, key: &str) -> String {
        self.translate(key).to_string()
    }
}
