//! Game locales and the per-locale configuration table
//!
//! The two NTSC builds (US, JP) share one binary layout and use unsuffixed
//! container names; the PAL build carries five European languages, each with
//! its own suffixed container files.

use std::fmt;
use std::str::FromStr;

use crate::charset::FontSet;
use crate::error::Error;

/// A game localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// North American release.
    Us,
    /// Japanese release.
    Jp,
    /// PAL English.
    En,
    /// PAL French.
    Fr,
    /// PAL German.
    Ge,
    /// PAL Spanish.
    Sp,
    /// PAL Italian.
    It,
}

/// All locales, in release order.
pub const LOCALES: [Locale; 7] = [
    Locale::Us,
    Locale::Jp,
    Locale::En,
    Locale::Fr,
    Locale::Ge,
    Locale::Sp,
    Locale::It,
];

impl Locale {
    /// True for the two NTSC locales that share one packed binary layout.
    ///
    /// Packed containers address the kanji pages through extension selector
    /// bytes; the European containers never emit selectors.
    #[must_use]
    pub fn is_packed(self) -> bool {
        matches!(self, Locale::Us | Locale::Jp)
    }

    /// True for the five PAL languages.
    #[must_use]
    pub fn is_european(self) -> bool {
        !self.is_packed()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Us => "US",
            Locale::Jp => "JP",
            Locale::En => "EN",
            Locale::Fr => "FR",
            Locale::Ge => "GE",
            Locale::Sp => "SP",
            Locale::It => "IT",
        }
    }

    /// Filename tag appended to container stems for this locale.
    ///
    /// The NTSC builds use bare names; PAL containers carry a language letter.
    #[must_use]
    pub fn file_tag(self) -> &'static str {
        match self {
            Locale::Us | Locale::Jp => "",
            Locale::En => "_E",
            Locale::Fr => "_F",
            Locale::Ge => "_G",
            Locale::Sp => "_S",
            Locale::It => "_I",
        }
    }

    /// Resolve the per-locale configuration once, up front.
    #[must_use]
    pub fn config(self) -> LocaleConfig {
        let font = match self {
            Locale::Us => FontSet::Us,
            Locale::Jp => FontSet::Jp,
            _ => FontSet::Eu,
        };
        LocaleConfig { locale: self, font }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        LOCALES
            .iter()
            .copied()
            .find(|l| l.as_str() == upper)
            .ok_or_else(|| Error::InvalidDocument(format!("{s} is not a valid locale")))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration resolved from a [`Locale`] at pipeline start.
///
/// Carries everything locale-conditional in one place: the glyph font set and
/// the container file names inside the archive.
#[derive(Debug, Clone, Copy)]
pub struct LocaleConfig {
    /// The locale this configuration was resolved for.
    pub locale: Locale,
    /// Which of the three glyph font sets the containers use.
    pub font: FontSet,
}

impl LocaleConfig {
    /// Archive entry name of the in-game message container.
    #[must_use]
    pub fn message_file_name(&self) -> String {
        ContainerFile::IgMsg.file_name(self.locale)
    }

    /// Archive entry names of the five event text containers.
    #[must_use]
    pub fn event_file_names(&self) -> Vec<String> {
        ContainerFile::EVENTS
            .iter()
            .map(|f| f.file_name(self.locale))
            .collect()
    }
}

/// The six text containers stored in the archive per locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFile {
    /// In-game messages (menus, item descriptions, system text).
    IgMsg,
    /// Event text, disc chapter 0.
    Event0,
    /// Event text, disc chapter 1.
    Event1,
    /// Event text, disc chapter 2.
    Event2,
    /// Event text, disc chapter 3.
    Event3,
    /// Event text, disc chapter 4.
    Event4,
}

impl ContainerFile {
    /// The five event containers in chapter order.
    pub const EVENTS: [ContainerFile; 5] = [
        ContainerFile::Event0,
        ContainerFile::Event1,
        ContainerFile::Event2,
        ContainerFile::Event3,
        ContainerFile::Event4,
    ];

    #[must_use]
    pub fn stem(self) -> &'static str {
        match self {
            ContainerFile::IgMsg => "IG_MSG",
            ContainerFile::Event0 => "M0_EVENT",
            ContainerFile::Event1 => "M1_EVENT",
            ContainerFile::Event2 => "M2_EVENT",
            ContainerFile::Event3 => "M3_EVENT",
            ContainerFile::Event4 => "M4_EVENT",
        }
    }

    /// Archive entry name for this container under the given locale.
    #[must_use]
    pub fn file_name(self, locale: Locale) -> String {
        format!("{}{}.OBJ", self.stem(), locale.file_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("JP".parse::<Locale>().unwrap(), Locale::Jp);
        assert!("XX".parse::<Locale>().is_err());
    }

    #[test]
    fn test_container_file_names() {
        assert_eq!(ContainerFile::IgMsg.file_name(Locale::Jp), "IG_MSG.OBJ");
        assert_eq!(ContainerFile::IgMsg.file_name(Locale::Fr), "IG_MSG_F.OBJ");
        assert_eq!(ContainerFile::Event3.file_name(Locale::It), "M3_EVENT_I.OBJ");
    }

    #[test]
    fn test_packed_locales() {
        assert!(Locale::Us.is_packed());
        assert!(Locale::Jp.is_packed());
        assert!(Locale::En.is_european());
    }
}
