use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocaleKey {
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
    #[serde(rename = "zh_CN")]
    ZhCn,
}

impl LocaleKey {
    pub const ALL: &'static [LocaleKey] = &[LocaleKey::EnUs, LocaleKey::PtBr, LocaleKey::ZhCn];

    /// Accepts `en_US` as well as the BCP 47 spelling `en-US`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().replace('-', "_");
        Self::ALL.iter().copied().find(|locale| locale.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
            Self::ZhCn => "zh_CN",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
