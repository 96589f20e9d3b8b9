// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cryptographic suite: acceptable algorithms, minimum key sizes and expiration dates.

use crate::date_format::DateFormat;
use crate::error::PolicyError;
use crate::level::Level;
use ades_validation_diagnostic::{DigestAlgorithm, EncryptionAlgorithm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Algo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Algo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), size: None }
    }

    pub fn sized(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
        }
    }
}

/// An algorithm list that may override the suite level.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListAlgo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    pub algos: Vec<Algo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationAlgo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// No date means the algorithm does not expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlgoExpirationDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub algos: Vec<ExpirationAlgo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_after_update: Option<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptographicConstraint {
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptable_encryption_algo: Option<ListAlgo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_public_key_size: Option<ListAlgo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptable_digest_algo: Option<ListAlgo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algo_expiration_date: Option<AlgoExpirationDate>,
}

impl CryptographicConstraint {
    /// Sets (or adds) the expiration date of an algorithm entry.
    ///
    /// `size` selects an encryption entry; digest entries have no size.
    pub fn set_expiration(&mut self, name: &str, size: Option<u32>, date: Option<&str>) {
        let expirations = self.algo_expiration_date.get_or_insert_with(AlgoExpirationDate::default);
        match expirations
            .algos
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name) && a.size == size)
        {
            Some(entry) => entry.date = date.map(str::to_string),
            None => expirations.algos.push(ExpirationAlgo {
                name: name.to_string(),
                size,
                date: date.map(str::to_string),
            }),
        }
    }

    pub fn set_expiration_level(&mut self, level: Level) {
        self.algo_expiration_date
            .get_or_insert_with(AlgoExpirationDate::default)
            .level = Some(level);
    }
}

/// Expiration lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// No entry configured for the algorithm.
    NotConfigured,
    /// Entry without a date.
    Never,
    At(DateTime<Utc>),
}

impl Expiration {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            Expiration::At(d) => Some(*d),
            _ => None,
        }
    }
}

/// A [`CryptographicConstraint`] with names and dates resolved.
#[derive(Debug, Clone)]
pub struct CryptographicSuite {
    level: Level,
    acceptable_encryption: Option<(Vec<EncryptionAlgorithm>, Option<Level>)>,
    acceptable_digest: Option<(Vec<DigestAlgorithm>, Option<Level>)>,
    min_key_sizes: Option<(Vec<(EncryptionAlgorithm, u32)>, Option<Level>)>,
    digest_expirations: BTreeMap<DigestAlgorithm, Option<DateTime<Utc>>>,
    encryption_expirations: Vec<(EncryptionAlgorithm, u32, Option<DateTime<Utc>>)>,
    expiration_level: Option<Level>,
    update_date: Option<DateTime<Utc>>,
    level_after_update: Option<Level>,
}

fn parse_digest(name: &str) -> Result<DigestAlgorithm, PolicyError> {
    name.parse().map_err(|_| PolicyError::UnknownAlgorithm(name.to_string()))
}

fn parse_encryption(name: &str) -> Result<EncryptionAlgorithm, PolicyError> {
    name.parse().map_err(|_| PolicyError::UnknownAlgorithm(name.to_string()))
}

impl CryptographicSuite {
    pub fn from_constraint(constraint: &CryptographicConstraint) -> Result<Self, PolicyError> {
        let acceptable_encryption = constraint
            .acceptable_encryption_algo
            .as_ref()
            .map(|list| {
                let algos = list
                    .algos
                    .iter()
                    .map(|a| parse_encryption(&a.name))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, PolicyError>((algos, list.level))
            })
            .transpose()?;

        let acceptable_digest = constraint
            .acceptable_digest_algo
            .as_ref()
            .map(|list| {
                let algos = list
                    .algos
                    .iter()
                    .map(|a| parse_digest(&a.name))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, PolicyError>((algos, list.level))
            })
            .transpose()?;

        let min_key_sizes = constraint
            .mini_public_key_size
            .as_ref()
            .map(|list| {
                let sizes = list
                    .algos
                    .iter()
                    .map(|a| -> Result<_, PolicyError> { Ok((parse_encryption(&a.name)?, a.size.unwrap_or(0))) })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, PolicyError>((sizes, list.level))
            })
            .transpose()?;

        let mut digest_expirations = BTreeMap::new();
        let mut encryption_expirations = Vec::new();
        let mut expiration_level = None;
        let mut update_date = None;
        let mut level_after_update = None;

        if let Some(expirations) = &constraint.algo_expiration_date {
            let format = match &expirations.format {
                Some(f) => DateFormat::new(f)?,
                None => DateFormat::default(),
            };
            expiration_level = expirations.level;
            level_after_update = expirations.level_after_update;
            update_date = expirations.update_date.as_deref().map(|d| format.parse(d)).transpose()?;

            for entry in &expirations.algos {
                let date = entry.date.as_deref().map(|d| format.parse(d)).transpose()?;
                if let Ok(digest) = entry.name.parse::<DigestAlgorithm>() {
                    if digest_expirations.insert(digest, date).is_some() {
                        return Err(PolicyError::DuplicateDigestEntry(digest.name().to_string()));
                    }
                    continue;
                }
                let encryption = parse_encryption(&entry.name)?;
                encryption_expirations.push((encryption, entry.size.unwrap_or(0), date));
            }
            encryption_expirations.sort_by_key(|(alg, size, _)| (*alg, *size));
        }

        Ok(Self {
            level: constraint.level,
            acceptable_encryption,
            acceptable_digest,
            min_key_sizes,
            digest_expirations,
            encryption_expirations,
            expiration_level,
            update_date,
            level_after_update,
        })
    }

    /// The suite level in force at `time`.
    pub fn level_at(&self, time: DateTime<Utc>) -> Level {
        self.adjust(self.level, time)
    }

    fn adjust(&self, level: Level, time: DateTime<Utc>) -> Level {
        match (self.update_date, self.level_after_update) {
            (Some(update), Some(after)) if time > update => after,
            _ => level,
        }
    }

    pub fn encryption_level(&self, time: DateTime<Utc>) -> Level {
        let own = self.acceptable_encryption.as_ref().and_then(|(_, l)| *l);
        self.adjust(own.unwrap_or(self.level), time)
    }

    pub fn digest_level(&self, time: DateTime<Utc>) -> Level {
        let own = self.acceptable_digest.as_ref().and_then(|(_, l)| *l);
        self.adjust(own.unwrap_or(self.level), time)
    }

    pub fn key_size_level(&self, time: DateTime<Utc>) -> Level {
        let own = self.min_key_sizes.as_ref().and_then(|(_, l)| *l);
        self.adjust(own.unwrap_or(self.level), time)
    }

    pub fn expiration_level(&self, time: DateTime<Utc>) -> Level {
        self.adjust(self.expiration_level.unwrap_or(self.level), time)
    }

    /// No list configured accepts every algorithm.
    pub fn is_encryption_acceptable(&self, algorithm: EncryptionAlgorithm) -> bool {
        self.acceptable_encryption
            .as_ref()
            .map_or(true, |(list, _)| list.iter().any(|a| a.is_equivalent(algorithm)))
    }

    pub fn is_digest_acceptable(&self, algorithm: DigestAlgorithm) -> bool {
        self.acceptable_digest
            .as_ref()
            .map_or(true, |(list, _)| list.contains(&algorithm))
    }

    /// The algorithm appears in an explicit acceptance list.
    pub fn lists_encryption(&self, algorithm: EncryptionAlgorithm) -> bool {
        self.acceptable_encryption
            .as_ref()
            .is_some_and(|(list, _)| list.iter().any(|a| a.is_equivalent(algorithm)))
    }

    pub fn lists_digest(&self, algorithm: DigestAlgorithm) -> bool {
        self.acceptable_digest
            .as_ref()
            .is_some_and(|(list, _)| list.contains(&algorithm))
    }

    pub fn min_key_size(&self, algorithm: EncryptionAlgorithm) -> Option<u32> {
        self.min_key_sizes
            .as_ref()
            .and_then(|(list, _)| list.iter().find(|(a, _)| a.is_equivalent(algorithm)).map(|(_, s)| *s))
    }

    pub fn digest_expiration(&self, algorithm: DigestAlgorithm) -> Expiration {
        match self.digest_expirations.get(&algorithm) {
            None => Expiration::NotConfigured,
            Some(None) => Expiration::Never,
            Some(Some(d)) => Expiration::At(*d),
        }
    }

    /// Entry with the greatest size not above `key_length`.
    pub fn encryption_expiration(&self, algorithm: EncryptionAlgorithm, key_length: u32) -> Expiration {
        let floor = self
            .encryption_expirations
            .iter()
            .filter(|(a, size, _)| a.is_equivalent(algorithm) && *size <= key_length)
            .max_by_key(|(_, size, _)| *size);
        match floor {
            None => Expiration::NotConfigured,
            Some((_, _, None)) => Expiration::Never,
            Some((_, _, Some(d))) => Expiration::At(*d),
        }
    }

    pub fn has_expiration_dates(&self) -> bool {
        !self.digest_expirations.is_empty() || !self.encryption_expirations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn suite() -> CryptographicConstraint {
        CryptographicConstraint {
            level: Level::Fail,
            acceptable_encryption_algo: Some(ListAlgo {
                level: None,
                algos: vec![Algo::new("RSA"), Algo::new("ECDSA")],
            }),
            mini_public_key_size: Some(ListAlgo {
                level: Some(Level::Warn),
                algos: vec![Algo::sized("RSA", 1024)],
            }),
            acceptable_digest_algo: Some(ListAlgo {
                level: None,
                algos: vec![Algo::new("SHA1"), Algo::new("SHA256")],
            }),
            algo_expiration_date: Some(AlgoExpirationDate {
                level: None,
                format: Some("yyyy".into()),
                algos: vec![
                    ExpirationAlgo { name: "SHA1".into(), size: None, date: Some("2014".into()) },
                    ExpirationAlgo { name: "SHA256".into(), size: None, date: None },
                    ExpirationAlgo { name: "RSA".into(), size: Some(786), date: Some("2009".into()) },
                    ExpirationAlgo { name: "RSA".into(), size: Some(2048), date: Some("2026".into()) },
                ],
                update_date: Some("2018".into()),
                level_after_update: Some(Level::Warn),
            }),
        }
    }

    #[test]
    fn floor_entry_selects_the_largest_size_not_above_the_key() {
        let s = CryptographicSuite::from_constraint(&suite()).unwrap();
        let y2009 = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(s.encryption_expiration(EncryptionAlgorithm::Rsa, 1023), Expiration::At(y2009));
        assert_eq!(s.encryption_expiration(EncryptionAlgorithm::RsassaPss, 1023), Expiration::At(y2009));
        assert_eq!(s.encryption_expiration(EncryptionAlgorithm::Rsa, 512), Expiration::NotConfigured);
        assert!(matches!(s.encryption_expiration(EncryptionAlgorithm::Rsa, 4096), Expiration::At(_)));
    }

    #[test]
    fn digest_entries_distinguish_never_from_missing() {
        let s = CryptographicSuite::from_constraint(&suite()).unwrap();
        assert_eq!(s.digest_expiration(DigestAlgorithm::Sha256), Expiration::Never);
        assert_eq!(s.digest_expiration(DigestAlgorithm::Sha512), Expiration::NotConfigured);
        assert!(s.is_digest_acceptable(DigestAlgorithm::Sha1));
        assert!(!s.is_digest_acceptable(DigestAlgorithm::Md5));
    }

    #[test]
    fn levels_fall_back_to_the_suite_and_switch_after_update() {
        let s = CryptographicSuite::from_constraint(&suite()).unwrap();
        let before = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(s.digest_level(before), Level::Fail);
        assert_eq!(s.key_size_level(before), Level::Warn);
        assert_eq!(s.expiration_level(after), Level::Warn);
    }

    #[test]
    fn duplicate_digest_entries_are_rejected() {
        let mut c = suite();
        c.algo_expiration_date.as_mut().unwrap().algos.push(ExpirationAlgo {
            name: "sha1".into(),
            size: None,
            date: Some("2015".into()),
        });
        assert!(matches!(
            CryptographicSuite::from_constraint(&c),
            Err(PolicyError::DuplicateDigestEntry(name)) if name == "SHA1"
        ));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut c = suite();
        c.acceptable_digest_algo.as_mut().unwrap().algos.push(Algo::new("SHA0"));
        assert!(matches!(CryptographicSuite::from_constraint(&c), Err(PolicyError::UnknownAlgorithm(_))));
    }

    #[test]
    fn set_expiration_replaces_existing_entries() {
        let mut c = suite();
        c.set_expiration("SHA1", None, Some("2013"));
        let s = CryptographicSuite::from_constraint(&c).unwrap();
        assert_eq!(
            s.digest_expiration(DigestAlgorithm::Sha1),
            Expiration::At(Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap())
        );
    }
}
