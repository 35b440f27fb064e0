//! Multi-valued profile features.
//!
//! Every profile line reads `USER_ID TOKEN TOKEN ...`, where a token is a
//! `;`-joined path whose last component is the value and whose leading
//! components form the feature name, e.g. `education;school;id;84` is the
//! value `84` of the feature `education;school;id`.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use anyhow::Context;
use crate::egonet::parse_user_id;
use crate::errors::ParseError;
use crate::graph::UserId;

const SEPARATOR: char = ';';

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Tokens
//////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureToken {
    name: String,
    value: String
}

impl FeatureToken {
    /// Splits `token` on its final separator.
    fn parse(line: usize, token: &str) -> Result<Self, ParseError> {
        let (name, value) = token.rsplit_once(SEPARATOR)
            .ok_or_else(|| ParseError::MissingFeatureValue { line, token: token.to_string() })?;
        Ok(FeatureToken { name: name.to_string(), value: value.to_string() })
    }

    /// Identifiers and display names carry no shared-attribute signal.
    fn is_excluded(&self) -> bool {
        is_excluded_name(&self.name)
    }
}

pub fn is_excluded_name(name: &str) -> bool {
    name == "id" || name.rsplit(SEPARATOR).next() == Some("name")
}

/// A profile line with only its user id parsed; the feature tokens are
/// tokenized on demand, so lines of users outside a friend set are never
/// inspected.
#[derive(Debug, Clone)]
struct ProfileLine {
    line: usize,
    user: UserId,
    tokens: String
}

impl ProfileLine {
    fn parse(line: usize, text: &str) -> Result<Option<Self>, ParseError> {
        let text = text.trim_start();
        let Some(head) = text.split_whitespace().next() else {
            return Ok(None);
        };
        let user = parse_user_id(line, head)?;
        Ok(Some(ProfileLine { line, user, tokens: text[head.len()..].to_string() }))
    }

    fn features(&self) -> Result<Vec<FeatureToken>, ParseError> {
        let mut features = Vec::new();
        for token in self.tokens.split_whitespace() {
            let feature = FeatureToken::parse(self.line, token)?;
            if !feature.is_excluded() {
                features.push(feature);
            }
        }
        Ok(features)
    }
}

fn read_profile_lines(reader: impl BufRead,
                      mut handle: impl FnMut(ProfileLine) -> Result<(), ParseError>) -> anyhow::Result<()>
{
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(parsed) = ProfileLine::parse(index + 1, &line)? {
            handle(parsed)?;
        }
    }
    Ok(())
}

fn open_profile_file(path: &Path) -> anyhow::Result<std::io::BufReader<std::fs::File>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open profile file {}", path.display()))?;
    Ok(std::io::BufReader::new(file))
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Registry
//////////////////////////////////////////////////////////////////////////////////////////////////

/// Sorted feature names; fixes the feature column order of one output table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRegistry(BTreeSet<String>);

impl FeatureRegistry {
    pub fn names(&self) -> impl Iterator<Item=&str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, name: &str) {
        if !self.0.contains(name) {
            self.0.insert(name.to_string());
        }
    }
}

impl FromIterator<String> for FeatureRegistry {
    fn from_iter<I: IntoIterator<Item=String>>(iter: I) -> Self {
        FeatureRegistry(iter.into_iter().collect())
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Per ego-network profiles
//////////////////////////////////////////////////////////////////////////////////////////////////

/// Feature value sets of the friends of one ego-network.
#[derive(Debug, Clone, Default)]
pub struct Profiles {
    values: HashMap<UserId, HashMap<String, BTreeSet<String>>>,
    registry: FeatureRegistry
}

impl Profiles {
    fn add(&mut self, user: UserId, feature: FeatureToken) {
        self.registry.insert(&feature.name);
        self.values.entry(user)
            .or_default()
            .entry(feature.name)
            .or_default()
            .insert(feature.value);
    }

    /// Reads a profile source, keeping only lines of users in `friends`.
    pub fn scan(reader: impl BufRead, friends: &BTreeSet<UserId>) -> anyhow::Result<Self> {
        let mut profiles = Profiles::default();
        read_profile_lines(reader, |line| {
            if friends.contains(&line.user) {
                for feature in line.features()? {
                    profiles.add(line.user, feature);
                }
            }
            Ok(())
        })?;
        Ok(profiles)
    }

    pub fn scan_file(path: impl AsRef<Path>, friends: &BTreeSet<UserId>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        Self::scan(open_profile_file(path)?, friends)
            .with_context(|| format!("While parsing profile file {}", path.display()))
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn values(&self, user: UserId, name: &str) -> Option<&BTreeSet<String>> {
        self.values.get(&user).and_then(|features| features.get(name))
    }

    /// Size of the intersection of the value sets of `a` and `b` for `name`.
    pub fn common_value_count(&self, a: UserId, b: UserId, name: &str) -> usize {
        match (self.values(a, name), self.values(b, name)) {
            (Some(va), Some(vb)) => va.intersection(vb).count(),
            _ => 0
        }
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Shared index
//////////////////////////////////////////////////////////////////////////////////////////////////

/// Whole profile file read once, keyed by user, and shared read-only by
/// every ego-network.
///
/// Only user ids are validated up front; a user's tokens are parsed when an
/// ego-network that contains the user restricts the index.
#[derive(Debug, Clone, Default)]
pub struct ProfileIndex {
    users: HashMap<UserId, Vec<ProfileLine>>
}

impl ProfileIndex {
    pub fn parse(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut users: HashMap<UserId, Vec<ProfileLine>> = HashMap::new();
        read_profile_lines(reader, |line| {
            users.entry(line.user).or_default().push(line);
            Ok(())
        })?;
        Ok(ProfileIndex { users })
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        Self::parse(open_profile_file(path)?)
            .with_context(|| format!("While parsing profile file {}", path.display()))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn restrict_to(&self, friends: &BTreeSet<UserId>) -> Result<Profiles, ParseError> {
        let mut profiles = Profiles::default();
        for friend in friends {
            let Some(lines) = self.users.get(friend) else {
                continue;
            };
            for line in lines {
                for feature in line.features()? {
                    profiles.add(*friend, feature);
                }
            }
        }
        Ok(profiles)
    }
}

//////////////////////////////////////////////////////////////////////////////////////////////////
//////////////////////////////////////////////////////////////////////////////////////////////////
// Strategy
//////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileMode {
    /// Parse the profile file once and share the index between ego-networks
    Index,
    /// Re-read the profile file for every ego-network
    Scan,
}

pub enum ProfileSource {
    Index { index: ProfileIndex, path: PathBuf },
    Scan(PathBuf)
}

impl ProfileSource {
    pub fn open(mode: ProfileMode, path: PathBuf) -> anyhow::Result<Self> {
        match mode {
            ProfileMode::Index => {
                let index = ProfileIndex::load(&path)?;
                log::info!("Indexed profiles of {} users from {}", index.user_count(), path.display());
                Ok(ProfileSource::Index { index, path })
            }
            ProfileMode::Scan => {
                if !path.is_file() {
                    return Err(anyhow::anyhow!("Profile file not found: {}", path.display()));
                }
                Ok(ProfileSource::Scan(path))
            }
        }
    }

    pub fn profiles_for(&self, friends: &BTreeSet<UserId>) -> anyhow::Result<Profiles> {
        match self {
            ProfileSource::Index { index, path } => index.restrict_to(friends)
                .with_context(|| format!("While parsing profile file {}", path.display())),
            ProfileSource::Scan(path) => Profiles::scan_file(path, friends)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: &str = "\
1 gender;male hometown;NYC id;1 first_name;9
10 gender;male hometown;NYC education;school;id;84 education;school;name;Harvard
20 gender;female hometown;NYC hometown;NYC education;school;id;84 education;school;id;85
30 gender;male
40 gender;male hometown;LA
";

    fn friends(ids: &[UserId]) -> BTreeSet<UserId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn tokens_split_on_last_separator() {
        let token = FeatureToken::parse(1, "education;school;id;84").unwrap();
        assert_eq!(token.name, "education;school;id");
        assert_eq!(token.value, "84");
        let token = FeatureToken::parse(1, "gender;").unwrap();
        assert_eq!(token.name, "gender");
        assert_eq!(token.value, "");
    }

    #[test]
    fn tokens_without_separator_are_rejected() {
        let err = FeatureToken::parse(7, "gender").unwrap_err();
        assert!(matches!(err, ParseError::MissingFeatureValue { line: 7, .. }));
        assert!(Profiles::scan("1 gender\n".as_bytes(), &friends(&[1])).is_err());
    }

    #[test]
    fn malformed_lines_of_non_friends_are_skipped() {
        let text = "1 gender;m\n2 gender;m\n99 brokentoken\n";
        let friend_set = friends(&[1, 2]);
        let scanned = Profiles::scan(text.as_bytes(), &friend_set).unwrap();
        assert_eq!(scanned.common_value_count(1, 2, "gender"), 1);

        let index = ProfileIndex::parse(text.as_bytes()).unwrap();
        let restricted = index.restrict_to(&friend_set).unwrap();
        assert_eq!(restricted.registry(), scanned.registry());
        assert_eq!(restricted.common_value_count(1, 2, "gender"), 1);

        let err = index.restrict_to(&friends(&[1, 99])).unwrap_err();
        assert!(matches!(err, ParseError::MissingFeatureValue { line: 3, .. }));
        assert!(Profiles::scan(text.as_bytes(), &friends(&[99])).is_err());
    }

    #[test]
    fn invalid_user_ids_are_rejected() {
        assert!(ProfileIndex::parse("x1 gender;male\n".as_bytes()).is_err());
    }

    #[test]
    fn excluded_names() {
        assert!(is_excluded_name("id"));
        assert!(is_excluded_name("name"));
        assert!(is_excluded_name("work;employer;name"));
        assert!(!is_excluded_name("education;school;id"));
        assert!(!is_excluded_name("first_name"));
        assert!(!is_excluded_name("gender"));
    }

    #[test]
    fn scan_keeps_only_friends() {
        let profiles = Profiles::scan(PROFILES.as_bytes(), &friends(&[10, 20, 30])).unwrap();
        let names = profiles.registry().names().collect::<Vec<_>>();
        assert_eq!(names, vec!["education;school;id", "gender", "hometown"]);
        assert!(profiles.values(1, "gender").is_none());
        assert!(profiles.values(40, "hometown").is_none());
        assert_eq!(profiles.values(20, "hometown").unwrap().len(), 1);
        assert_eq!(profiles.values(20, "education;school;id").unwrap().len(), 2);
    }

    #[test]
    fn registry_never_holds_excluded_names() {
        let profiles = Profiles::scan(PROFILES.as_bytes(), &friends(&[1, 10, 20, 30, 40])).unwrap();
        for name in profiles.registry().names() {
            assert!(!is_excluded_name(name), "{name} should have been dropped");
        }
        assert!(profiles.registry().names().any(|name| name == "first_name"));
    }

    #[test]
    fn common_value_counts() {
        let profiles = Profiles::scan(PROFILES.as_bytes(), &friends(&[10, 20, 30])).unwrap();
        assert_eq!(profiles.common_value_count(10, 20, "hometown"), 1);
        assert_eq!(profiles.common_value_count(20, 10, "hometown"), 1);
        assert_eq!(profiles.common_value_count(10, 20, "gender"), 0);
        assert_eq!(profiles.common_value_count(10, 30, "gender"), 1);
        assert_eq!(profiles.common_value_count(10, 30, "hometown"), 0);
        assert_eq!(profiles.common_value_count(30, 10, "hometown"), 0);
        assert_eq!(profiles.common_value_count(10, 20, "education;school;id"), 1);
        assert_eq!(profiles.common_value_count(10, 20, "unknown"), 0);
    }

    #[test]
    fn index_and_scan_agree() {
        let index = ProfileIndex::parse(PROFILES.as_bytes()).unwrap();
        assert_eq!(index.user_count(), 5);
        let friend_set = friends(&[10, 20, 40]);
        let restricted = index.restrict_to(&friend_set).unwrap();
        let scanned = Profiles::scan(PROFILES.as_bytes(), &friend_set).unwrap();
        assert_eq!(restricted.registry(), scanned.registry());
        for user in &friend_set {
            for name in scanned.registry().names() {
                assert_eq!(restricted.values(*user, name), scanned.values(*user, name));
            }
        }
    }
}
