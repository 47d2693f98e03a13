use curalink_common::UserProfile;

/// Lower-cased keywords drawn from a profile: conditions, then research
/// interests, then specialties. Duplicates are kept, so a term listed twice
/// counts twice when scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let keywords = profile.conditions.iter()
            .chain(&profile.research_interests)
            .chain(&profile.specialties)
            .map(|k| k.to_lowercase())
            .collect();
        Self(keywords)
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
