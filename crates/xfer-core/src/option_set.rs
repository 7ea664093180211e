//! Ordered record of applied options.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::registry::TransferOption;
use crate::value::OptionValue;

/// A staged or applied option together with its value.
pub type StagedOption = (TransferOption, OptionValue);

/// Options in the order they were last set.
///
/// Setting an option again moves it to the end. Several options drive the
/// same native setting (`timeout` and `timeout_ms`, `userpwd` and
/// `username`), so replaying the set in order reproduces the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<StagedOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning the value it replaced.
    pub fn insert(&mut self, option: TransferOption, value: OptionValue) -> Option<OptionValue> {
        let index = self.entries.iter().position(|(o, _)| *o == option);
        let previous = index.map(|index| self.entries.remove(index).1);
        self.entries.push((option, value));
        previous
    }

    /// Current value of an option.
    pub fn get(&self, option: TransferOption) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(o, _)| *o == option)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, option: TransferOption) -> bool {
        self.get(option).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedOption> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot as a batch, in the order the options were last set.
    pub fn to_batch(&self) -> Vec<StagedOption> {
        self.entries.clone()
    }
}

impl Extend<StagedOption> for OptionSet {
    fn extend<I: IntoIterator<Item = StagedOption>>(&mut self, iter: I) {
        for (option, value) in iter {
            self.insert(option, value);
        }
    }
}

impl FromIterator<StagedOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = StagedOption>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        set.extend(iter);
        set
    }
}

/// Serializes as a map keyed by caller-facing option names (`"url"`).
impl Serialize for OptionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (option, value) in &self.entries {
            map.serialize_entry(&option.key(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_value_wins_and_moves_last() {
        let mut set = OptionSet::new();
        set.insert(TransferOption::ReturnTransfer, true.into());
        set.insert(TransferOption::UserAgent, "first".into());
        let old = set.insert(TransferOption::ReturnTransfer, false.into());

        assert_eq!(old, Some(OptionValue::Flag(true)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(TransferOption::UserAgent));
        assert!(!set.contains(TransferOption::Url));
        assert_eq!(set.get(TransferOption::ReturnTransfer), Some(&OptionValue::Flag(false)));
        let order: Vec<_> = set.iter().map(|(o, _)| *o).collect();
        assert_eq!(order, [TransferOption::UserAgent, TransferOption::ReturnTransfer]);
    }

    #[test]
    fn batch_follows_last_set_order() {
        let mut set = OptionSet::new();
        set.insert(TransferOption::Username, "d1".into());
        set.insert(TransferOption::UserPwd, "b:c".into());
        set.insert(TransferOption::Username, "d2".into());

        assert_eq!(
            set.to_batch(),
            vec![
                (TransferOption::UserPwd, OptionValue::from("b:c")),
                (TransferOption::Username, OptionValue::from("d2")),
            ]
        );
    }

    #[test]
    fn serializes_with_short_keys() {
        let set: OptionSet = [
            (TransferOption::Url, OptionValue::from("http://example.test/")),
            (TransferOption::Timeout, OptionValue::Number(5)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"url":"http://example.test/","timeout":5}"#);
    }
}
