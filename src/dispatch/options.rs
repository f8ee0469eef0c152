//! Typed access to resolved command options.

use crate::platform::{ChannelId, OptionData, OptionValue};
use std::collections::HashMap;

/// Name-keyed view over the options of one (sub-)command invocation.
///
/// Accessors fall back to a caller-supplied default, mirroring how
/// declarations mark options optional.
pub struct OptionsMap<'a> {
    options: HashMap<&'a str, &'a OptionData>,
}

impl<'a> OptionsMap<'a> {
    pub fn new(options: &'a [OptionValue]) -> Self {
        Self {
            options: options
                .iter()
                .map(|o| (o.name.as_str(), &o.data))
                .collect(),
        }
    }

    /// Options nested under a sub-command value.
    pub fn from_sub_option(value: &'a OptionValue) -> Self {
        Self::new(value.nested())
    }

    pub fn get_str(&self, name: &str, default: &'a str) -> &'a str {
        match self.options.get(name).copied() {
            Some(OptionData::String(s)) => s.as_str(),
            _ => default,
        }
    }

    pub fn get_i64(&self, name: &str, default: i64) -> i64 {
        match self.options.get(name).copied() {
            Some(OptionData::Integer(i)) => *i,
            _ => default,
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.options.get(name).copied() {
            Some(OptionData::Boolean(b)) => *b,
            _ => default,
        }
    }

    pub fn get_channel(&self, name: &str) -> Option<ChannelId> {
        match self.options.get(name).copied() {
            Some(OptionData::Channel(id)) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_with_defaults() {
        let options = vec![
            OptionValue {
                name: "module".into(),
                data: OptionData::String("dice".into()),
            },
            OptionValue {
                name: "sides".into(),
                data: OptionData::Integer(20),
            },
            OptionValue {
                name: "channel".into(),
                data: OptionData::Channel(ChannelId(42)),
            },
        ];
        let map = OptionsMap::new(&options);

        assert_eq!(map.get_str("module", "none"), "dice");
        assert_eq!(map.get_str("missing", "none"), "none");
        assert_eq!(map.get_i64("sides", 6), 20);
        assert_eq!(map.get_i64("missing", 6), 6);
        assert!(!map.get_bool("missing", false));
        assert_eq!(map.get_channel("channel"), Some(ChannelId(42)));
        assert_eq!(map.get_channel("module"), None);
    }
}
